//! HTTP request handlers for the Notification Receiver.

pub mod health;
pub mod metrics;
pub mod notifications;

pub use health::health_check;
pub use metrics::metrics_handler;
pub use notifications::{receive_notification, ACKNOWLEDGMENT};
