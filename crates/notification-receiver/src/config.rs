//! Notification Receiver configuration.
//!
//! Configuration is loaded from environment variables. There is no webhook
//! secret: the receiver performs no verification.

use common::config::{self as env, EnvVarError};
use std::collections::HashMap;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8081";

/// Default deployment region.
pub const DEFAULT_REGION: &str = "us-central1";

/// Default drain period after a shutdown signal in seconds.
pub const DEFAULT_DRAIN_SECONDS: u64 = 5;

/// Notification Receiver configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8081").
    pub bind_address: String,

    /// Deployment region identifier.
    pub region: String,

    /// Seconds to keep serving after a shutdown signal (default: 5).
    pub drain_seconds: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] EnvVarError),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Ok(Config {
            bind_address: env::string_or(vars, "BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            region: env::string_or(vars, "REGION", DEFAULT_REGION),
            drain_seconds: env::u64_or(vars, "DRAIN_SECONDS", DEFAULT_DRAIN_SECONDS)?,
        })
    }
}
