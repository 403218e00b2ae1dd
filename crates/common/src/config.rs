//! Environment-variable parsing helpers.
//!
//! Service configs load from a `HashMap<String, String>` so tests never
//! touch the process environment. These helpers keep the validation
//! messages uniform across services.

use std::collections::HashMap;
use thiserror::Error;

/// Failure to parse a single environment variable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvVarError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("{name} must be a valid positive integer, got '{value}'")]
    NotAnInteger { name: String, value: String },

    #[error("{name} must be greater than 0")]
    Zero { name: String },

    #[error("{name} must be 'true' or 'false', got '{value}'")]
    NotABool { name: String, value: String },
}

/// Fetch a required, non-empty variable.
///
/// # Errors
///
/// Returns [`EnvVarError::Missing`] if the variable is absent or blank.
pub fn required(vars: &HashMap<String, String>, name: &str) -> Result<String, EnvVarError> {
    vars.get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| EnvVarError::Missing(name.to_string()))
}

/// Fetch an optional variable, falling back to `default`.
#[must_use]
pub fn string_or(vars: &HashMap<String, String>, name: &str, default: &str) -> String {
    vars.get(name)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

/// Parse a strictly positive integer, falling back to `default` when unset.
///
/// # Errors
///
/// Returns [`EnvVarError::NotAnInteger`] for non-numeric or negative input
/// and [`EnvVarError::Zero`] for `0`.
pub fn positive_u64_or(
    vars: &HashMap<String, String>,
    name: &str,
    default: u64,
) -> Result<u64, EnvVarError> {
    let Some(value_str) = vars.get(name) else {
        return Ok(default);
    };

    let value: u64 = value_str
        .trim()
        .parse()
        .map_err(|_| EnvVarError::NotAnInteger {
            name: name.to_string(),
            value: value_str.clone(),
        })?;

    if value == 0 {
        return Err(EnvVarError::Zero {
            name: name.to_string(),
        });
    }

    Ok(value)
}

/// Parse a non-negative integer (zero allowed), falling back to `default`.
///
/// # Errors
///
/// Returns [`EnvVarError::NotAnInteger`] for non-numeric or negative input.
pub fn u64_or(vars: &HashMap<String, String>, name: &str, default: u64) -> Result<u64, EnvVarError> {
    match vars.get(name) {
        None => Ok(default),
        Some(value_str) => value_str
            .trim()
            .parse()
            .map_err(|_| EnvVarError::NotAnInteger {
                name: name.to_string(),
                value: value_str.clone(),
            }),
    }
}

/// Parse a boolean flag (`true`/`false`/`1`/`0`, case-insensitive).
///
/// # Errors
///
/// Returns [`EnvVarError::NotABool`] for anything else.
pub fn bool_or(vars: &HashMap<String, String>, name: &str, default: bool) -> Result<bool, EnvVarError> {
    let Some(value_str) = vars.get(name) else {
        return Ok(default);
    };

    match value_str.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(EnvVarError::NotABool {
            name: name.to_string(),
            value: value_str.clone(),
        }),
    }
}
