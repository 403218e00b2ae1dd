//! HTTP request handlers for the Game Reaper.

pub mod health;
pub mod metrics;
pub mod reaper;

pub use health::{health_check, readiness_check};
pub use metrics::metrics_handler;
pub use reaper::trigger_run;
