//! On-demand reaper trigger.
//!
//! `POST /v1/reaper/run` performs one run and returns its outcome. Only routed
//! when `REAPER_HTTP_TRIGGER_ENABLED` is set, for deployments where an
//! external scheduler calls the service over HTTP instead of relying on the
//! in-process loop.

use crate::errors::ReaperError;
use crate::models::ReapOutcome;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Run the reaper once.
///
/// ## Example Response
///
/// ```json
/// { "cutoff": 1700000000, "deleted": 3 }
/// ```
///
/// Store failures map to 503 with a generic body.
#[instrument(skip_all, name = "reaper.trigger.run")]
pub async fn trigger_run(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReapOutcome>, ReaperError> {
    let outcome = state.reaper.run_once().await?;
    Ok(Json(outcome))
}
