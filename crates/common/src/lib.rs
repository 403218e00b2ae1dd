//! Common utilities shared across the Fairway backend services.

#![warn(clippy::pedantic)]

/// Module for wall-clock access that tests can pin
pub mod clock;

/// Module for environment-variable parsing helpers
pub mod config;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for SIGINT/SIGTERM handling with a drain period
pub mod shutdown;
