//! Webhook handler.
//!
//! Accepts any method and any body and always answers `200 OK` with
//! [`ACKNOWLEDGMENT`]. The body is drained frame by frame and only counted, so
//! there is no size limit and malformed payloads cannot be rejected.

use crate::observability::metrics::record_notification;
use crate::routes::AppState;
use crate::sink::InboundNotification;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use http_body_util::BodyExt;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Fixed plain-text acknowledgment body.
pub const ACKNOWLEDGMENT: &str = "Notification received";

/// Acknowledge an inbound notification.
#[instrument(skip_all, name = "receiver.notifications.receive", fields(method = %method, path = %uri.path()))]
pub async fn receive_notification(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> (StatusCode, &'static str) {
    let (body_bytes, body_complete) = drain_body(body).await;

    let notification = InboundNotification {
        method: method.to_string(),
        path: uri.path().to_string(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        body_bytes,
        body_complete,
        received_at: chrono::Utc::now(),
    };

    record_notification(method.as_str(), body_bytes);
    state.sink.accept(&notification).await;

    (StatusCode::OK, ACKNOWLEDGMENT)
}

/// Read the body to the end, returning its length and whether it ended
/// cleanly. A broken stream stops the count but is not an error.
async fn drain_body(mut body: Body) -> (u64, bool) {
    let mut total: u64 = 0;

    while let Some(frame) = body.frame().await {
        match frame {
            Ok(frame) => {
                if let Some(data) = frame.data_ref() {
                    total = total.saturating_add(data.len() as u64);
                }
            }
            Err(e) => {
                warn!(target: "receiver.notifications", error = %e, bytes_read = total, "Notification body stream failed");
                return (total, false);
            }
        }
    }

    (total, true)
}
