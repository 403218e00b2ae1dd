//! Metrics definitions for the Game Reaper.
//!
//! All metrics follow Prometheus naming conventions:
//! - `reaper_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `status`: `success` or a [`ReaperError::status_label`](crate::errors::ReaperError::status_label) value
//! - `operation`: `find_stale_games`, `delete_games`, `ping`
//! - `endpoint`: the handful of routes this service exposes, otherwise `/other`
//! - `method`: standard HTTP methods, otherwise `OTHER`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle used by `/metrics`.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("reaper_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.200, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // A run is two database round trips; tail latency is dominated by the
        // request timeout.
        .set_buckets_for_metric(
            Matcher::Prefix("reaper_run_duration".to_string()),
            &[0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000, 10.000, 30.000],
        )
        .map_err(|e| format!("Failed to set run duration buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("reaper_store_request".to_string()),
            &[0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 10.000],
        )
        .map_err(|e| format!("Failed to set store request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// Reaper Run Metrics
// ============================================================================

/// Record the completion of one reaper run.
///
/// Metric: `reaper_runs_total`, `reaper_run_duration_seconds`,
/// `reaper_games_deleted_total`
/// Labels: `status`
pub fn record_reaper_run(status: &str, deleted: usize, duration: Duration) {
    histogram!("reaper_run_duration_seconds",
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("reaper_runs_total",
        "status" => status.to_string()
    )
    .increment(1);

    if deleted > 0 {
        counter!("reaper_games_deleted_total").increment(deleted as u64);
    }
}

// ============================================================================
// Game Store Metrics
// ============================================================================

/// Record a single request against the game store.
///
/// Metric: `reaper_store_requests_total`, `reaper_store_request_duration_seconds`
/// Labels: `operation`, `status`
pub fn record_store_request(operation: &str, status: &str, duration: Duration) {
    histogram!("reaper_store_request_duration_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("reaper_store_requests_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion.
///
/// Metric: `reaper_http_requests_total`, `reaper_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let method = normalize_method(method);
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("reaper_http_request_duration_seconds",
        "method" => method,
        "endpoint" => normalized_endpoint,
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("reaper_http_requests_total",
        "method" => method,
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Map the request method to a fixed label; extension methods become `OTHER`.
fn normalize_method(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "PATCH" => "PATCH",
        "DELETE" => "DELETE",
        "HEAD" => "HEAD",
        "OPTIONS" => "OPTIONS",
        _ => "OTHER",
    }
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Unknown paths collapse to `/other` to bound cardinality.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/health" => "/health",
        "/ready" => "/ready",
        "/metrics" => "/metrics",
        "/v1/reaper/run" => "/v1/reaper/run",
        _ => "/other",
    }
}
