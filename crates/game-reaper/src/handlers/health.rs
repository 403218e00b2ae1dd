//! Health check handlers.
//!
//! `/health` is a liveness probe and never touches the store. `/ready` probes
//! the game store and answers 503 when it is unreachable.

use crate::models::ReadinessResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Liveness probe handler.
#[instrument(skip_all, name = "reaper.health.liveness")]
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness probe handler.
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "ready",
///   "region": "us-central1",
///   "database": "healthy"
/// }
/// ```
#[instrument(skip_all, name = "reaper.health.readiness")]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let region = state.config.region.clone();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
                region,
                database: Some("healthy".to_string()),
            }),
        ),
        Err(e) => {
            tracing::warn!(target: "reaper.health", error = %e, "Readiness check failed: game store unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "not_ready".to_string(),
                    region,
                    database: Some("unhealthy".to_string()),
                }),
            )
        }
    }
}
