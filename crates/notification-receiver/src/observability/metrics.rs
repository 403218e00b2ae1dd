//! Metrics definitions for the Notification Receiver.
//!
//! - `receiver_` prefix
//! - `method` labels are limited to standard HTTP methods, anything else is
//!   reported as `OTHER`
//! - `endpoint` labels collapse unknown paths to `/other`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle used by `/metrics`.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("receiver_http_request".to_string()),
            &[
                0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 5.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Full("receiver_notification_bytes".to_string()),
            &[
                0.0, 256.0, 1024.0, 4096.0, 16384.0, 65536.0, 262_144.0, 1_048_576.0, 8_388_608.0,
            ],
        )
        .map_err(|e| format!("Failed to set notification size buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Record one acknowledged notification.
///
/// Metric: `receiver_notifications_total`, `receiver_notification_bytes`
/// Labels: `method`
pub fn record_notification(method: &str, body_bytes: u64) {
    let method = normalize_method(method);

    counter!("receiver_notifications_total",
        "method" => method
    )
    .increment(1);

    histogram!("receiver_notification_bytes").record(body_bytes as f64);
}

/// Record HTTP request completion.
///
/// Metric: `receiver_http_requests_total`, `receiver_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let method = normalize_method(method);
    let endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("receiver_http_request_duration_seconds",
        "method" => method,
        "endpoint" => endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("receiver_http_requests_total",
        "method" => method,
        "endpoint" => endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

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

fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/health" => "/health",
        "/metrics" => "/metrics",
        "/notifications" => "/notifications",
        p if p.starts_with("/notifications/") => "/notifications/{rest}",
        _ => "/other",
    }
}
