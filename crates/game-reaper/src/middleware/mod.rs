//! HTTP middleware for the Game Reaper.

pub mod http_metrics;

pub use http_metrics::http_metrics_middleware;
