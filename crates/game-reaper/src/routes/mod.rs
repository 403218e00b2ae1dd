//! HTTP routes for the Game Reaper.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::store::GameStore;
use crate::tasks::StaleGameReaper;
use axum::{
    middleware,
    routing::{get, post},
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
    /// Game store probed by `/ready`.
    pub store: Arc<dyn GameStore>,

    /// Reaper driven by the on-demand trigger.
    pub reaper: Arc<StaleGameReaper>,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe (simple "OK")
/// - `/ready` - Readiness probe (pings the game store)
/// - `/metrics` - Prometheus metrics endpoint
/// - `/v1/reaper/run` - On-demand run (only when the HTTP trigger is enabled)
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let mut app_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check));

    if state.config.http_trigger_enabled {
        app_routes = app_routes.route("/v1/reaper/run", post(handlers::trigger_run));
    }

    let app_routes = app_routes.with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    app_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::store::InMemoryGameStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use common::clock::FixedClock;
    use http_body_util::BodyExt;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::collections::HashMap;
    use tower::ServiceExt;

    fn test_app(store: Arc<InMemoryGameStore>, trigger_enabled: bool) -> Router {
        let vars = HashMap::from([
            ("GAME_STORE".to_string(), "memory".to_string()),
            ("REGION".to_string(), "test-region".to_string()),
            (
                "REAPER_HTTP_TRIGGER_ENABLED".to_string(),
                trigger_enabled.to_string(),
            ),
        ]);
        let config = Config::from_vars(&vars).unwrap();

        let reaper = Arc::new(StaleGameReaper::new(
            store.clone(),
            Arc::new(FixedClock::new(1700)),
            config.staleness_window(),
        ));

        let state = Arc::new(AppState {
            store,
            reaper,
            config,
        });

        let handle = PrometheusBuilder::new().build_recorder().handle();
        build_routes(state, handle)
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_ready_reports_store_health() {
        let store = Arc::new(InMemoryGameStore::new());

        let (status, body) = send(test_app(store.clone(), false), "GET", "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["region"], "test-region");
        assert_eq!(body["database"], "healthy");

        store.set_fail_queries(true);
        let (status, body) = send(test_app(store, false), "GET", "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "not_ready");
        assert_eq!(body["database"], "unhealthy");
    }

    #[tokio::test]
    async fn test_trigger_route_absent_by_default() {
        let store = Arc::new(InMemoryGameStore::with_games([("old", 1)]));

        let (status, _) = send(test_app(store.clone(), false), "POST", "/v1/reaper/run").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_trigger_route_runs_reaper() {
        let store = Arc::new(InMemoryGameStore::with_games([
            ("A", 1000),
            ("B", 1500),
            ("C", 2000),
        ]));

        let (status, body) = send(test_app(store.clone(), true), "POST", "/v1/reaper/run").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cutoff"], 1400);
        assert_eq!(body["deleted"], 1);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_trigger_route_maps_store_failure_to_503() {
        let store = Arc::new(InMemoryGameStore::with_games([("A", 1000), ("B", 1100)]));
        store.set_fail_deletes(true);

        let (status, body) = send(test_app(store.clone(), true), "POST", "/v1/reaper/run").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");
        assert_eq!(store.len().await, 2);
    }
}
