//! Destination for received notifications.
//!
//! The receiver acknowledges every request before caring what a sink does
//! with it. A sink that verifies signatures, parses typed payloads or
//! dispatches by notification kind would plug in here; none exists yet.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Metadata of one inbound webhook call. The payload itself is not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundNotification {
    /// HTTP method as sent by the caller.
    pub method: String,
    /// Request path.
    pub path: String,
    /// `Content-Type` header, if any and if valid UTF-8.
    pub content_type: Option<String>,
    /// Bytes read from the body.
    pub body_bytes: u64,
    /// Whether the body stream ended cleanly.
    pub body_complete: bool,
    /// When the request finished reading.
    pub received_at: DateTime<Utc>,
}

/// Consumer of inbound notifications.
///
/// Sinks cannot fail the request: there is no error return.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    async fn accept(&self, notification: &InboundNotification);
}

/// Sink that only logs the notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSink;

#[async_trait::async_trait]
impl NotificationSink for LoggingSink {
    async fn accept(&self, notification: &InboundNotification) {
        info!(
            target: "receiver.notifications",
            method = %notification.method,
            path = %notification.path,
            content_type = notification.content_type.as_deref().unwrap_or("none"),
            body_bytes = notification.body_bytes,
            body_complete = notification.body_complete,
            "Notification received"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logging_sink_accepts_anything() {
        let notification = InboundNotification {
            method: "PURGE".to_string(),
            path: "/notifications/x".to_string(),
            content_type: None,
            body_bytes: 0,
            body_complete: false,
            received_at: Utc::now(),
        };

        LoggingSink.accept(&notification).await;
    }

    #[test]
    fn test_notification_serializes_metadata_only() {
        let notification = InboundNotification {
            method: "POST".to_string(),
            path: "/notifications".to_string(),
            content_type: Some("application/json".to_string()),
            body_bytes: 12,
            body_complete: true,
            received_at: Utc::now(),
        };

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["body_bytes"], 12);
        assert!(json.get("body").is_none());
    }
}
