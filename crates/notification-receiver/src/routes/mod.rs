//! HTTP routes for the Notification Receiver.

use crate::config::Config;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::sink::NotificationSink;
use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use crate::observability::metrics::init_metrics_recorder;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where acknowledged notifications go.
    pub sink: Arc<dyn NotificationSink>,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/notifications` and `/notifications/*rest` - Webhook endpoint, any method
/// - `/health` - Liveness probe
/// - `/metrics` - Prometheus metrics endpoint
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - 30 second request timeout on `/health` and `/metrics` only
///
/// The webhook routes carry no timeout: bodies have no size limit, and a slow
/// upload must still be acknowledged.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let webhook_routes = Router::new()
        .route("/notifications", any(handlers::receive_notification))
        .route("/notifications/*rest", any(handlers::receive_notification))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    let probe_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .merge(metrics_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Probe routes only (innermost)
    // 2. TraceLayer - Log request details
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    webhook_routes
        .merge(probe_routes)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(http_metrics_middleware))
}
