//! Observability for the Notification Receiver.

pub mod metrics;
