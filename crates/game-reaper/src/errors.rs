//! Game Reaper error types.
//!
//! Store failures propagate out of a reaper run unchanged; the caller (the
//! schedule loop, the run-once binary or the HTTP trigger) decides what to do
//! with them. HTTP responses carry generic messages only; the actual error is
//! logged server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Game Reaper error type.
///
/// Maps to HTTP status codes:
/// - Database, UnexpectedStatus, InvalidResponse, Injected: 503 Service Unavailable
/// - Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum ReaperError {
    /// The database could not be reached or the request timed out.
    #[error("Database request failed: {0}")]
    Database(String),

    /// The database answered with a non-success status.
    #[error("Database returned HTTP {status} for {operation}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
    },

    /// The database answered 2xx with a body we could not interpret.
    #[error("Invalid database response: {0}")]
    InvalidResponse(String),

    /// Failure raised on purpose by the in-memory store.
    #[error("Injected store failure: {0}")]
    Injected(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReaperError {
    /// Bounded label for metrics.
    pub fn status_label(&self) -> &'static str {
        match self {
            ReaperError::Database(_) => "database_error",
            ReaperError::UnexpectedStatus { .. } => "unexpected_status",
            ReaperError::InvalidResponse(_) => "invalid_response",
            ReaperError::Injected(_) => "injected",
            ReaperError::Internal(_) => "internal",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ReaperError::Internal(_) => 500,
            _ => 503,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for ReaperError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ReaperError::Internal(err) => {
                tracing::error!(target: "reaper.errors", error = %err, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                )
            }
            other => {
                tracing::warn!(target: "reaper.errors", error = %other, "Game store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_UNAVAILABLE",
                    "Game store temporarily unavailable",
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for ReaperError {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL: it may carry the auth query parameter.
        ReaperError::Database(err.without_url().to_string())
    }
}
