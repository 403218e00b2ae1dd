//! HTTP middleware for the Notification Receiver.

pub mod http_metrics;

pub use http_metrics::http_metrics_middleware;
