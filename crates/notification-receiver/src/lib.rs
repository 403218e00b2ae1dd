//! Notification Receiver Service Library
//!
//! Webhook endpoint for inbound push notifications. Every request is
//! acknowledged with `200 OK` and a fixed plain-text body, whatever its method
//! or payload. Payloads are counted and logged, never parsed or verified.
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `handlers` - HTTP request handlers (notifications, health, metrics)
//! - `middleware` - HTTP metrics middleware
//! - `observability` - Prometheus metrics
//! - `routes` - Axum router setup
//! - `sink` - Destination for received notifications

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod sink;
