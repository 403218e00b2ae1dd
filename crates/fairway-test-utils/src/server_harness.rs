//! Test server harnesses for E2E testing
//!
//! Provides `TestReaperServer` and `TestReceiverServer` for spawning real
//! server instances in tests.

use common::clock::FixedClock;
use game_reaper::store::InMemoryGameStore;
use game_reaper::tasks::StaleGameReaper;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use notification_receiver::sink::{LoggingSink, NotificationSink};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Install the global recorder, or fall back to a standalone one when another
/// test in the same process already installed it.
fn metrics_handle(installed: Result<PrometheusHandle, String>) -> PrometheusHandle {
    match installed {
        Ok(handle) => handle,
        Err(_) => PrometheusBuilder::new().build_recorder().handle(),
    }
}

async fn serve(app: axum::Router) -> Result<(SocketAddr, JoinHandle<()>), anyhow::Error> {
    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

    let addr = listener
        .local_addr()
        .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("Test server error: {}", e);
        }
    });

    Ok((addr, handle))
}

/// Test harness for spawning the Game Reaper HTTP surface in E2E tests.
///
/// The reaper runs against an [`InMemoryGameStore`] and a [`FixedClock`], so
/// tests control both the data and the time. The schedule loop is not
/// started; runs happen only through the HTTP trigger or [`Self::reaper`].
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_trigger_e2e() -> Result<(), anyhow::Error> {
///     let store = Arc::new(InMemoryGameStore::with_games([("old", 1_000)]));
///     let server = TestReaperServer::spawn(store.clone(), 1_700, true).await?;
///
///     let response = reqwest::Client::new()
///         .post(format!("{}/v1/reaper/run", server.url()))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     assert!(store.is_empty().await);
///     Ok(())
/// }
/// ```
pub struct TestReaperServer {
    addr: SocketAddr,
    store: Arc<InMemoryGameStore>,
    clock: Arc<FixedClock>,
    reaper: Arc<StaleGameReaper>,
    _handle: JoinHandle<()>,
}

impl TestReaperServer {
    /// Spawn a new reaper server instance.
    ///
    /// # Arguments
    /// * `store` - Seeded in-memory game store
    /// * `now` - Initial clock reading in Unix seconds
    /// * `trigger_enabled` - Whether `POST /v1/reaper/run` is mounted
    pub async fn spawn(
        store: Arc<InMemoryGameStore>,
        now: i64,
        trigger_enabled: bool,
    ) -> Result<Self, anyhow::Error> {
        let vars = HashMap::from([
            ("GAME_STORE".to_string(), "memory".to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("REGION".to_string(), "test-region".to_string()),
            (
                "REAPER_HTTP_TRIGGER_ENABLED".to_string(),
                trigger_enabled.to_string(),
            ),
        ]);

        let config = game_reaper::config::Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let clock = Arc::new(FixedClock::new(now));
        let reaper = Arc::new(StaleGameReaper::new(
            store.clone(),
            clock.clone(),
            config.staleness_window(),
        ));

        let state = Arc::new(game_reaper::routes::AppState {
            store: store.clone(),
            reaper: reaper.clone(),
            config,
        });

        let handle = metrics_handle(game_reaper::routes::init_metrics_recorder());
        let app = game_reaper::routes::build_routes(state, handle);
        let (addr, handle) = serve(app).await?;

        Ok(Self {
            addr,
            store,
            clock,
            reaper,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The store behind the server.
    pub fn store(&self) -> &Arc<InMemoryGameStore> {
        &self.store
    }

    /// The clock the reaper reads.
    pub fn clock(&self) -> &FixedClock {
        &self.clock
    }

    /// The reaper the trigger drives.
    pub fn reaper(&self) -> &Arc<StaleGameReaper> {
        &self.reaper
    }
}

impl Drop for TestReaperServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

/// Test harness for spawning the Notification Receiver in E2E tests.
pub struct TestReceiverServer {
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestReceiverServer {
    /// Spawn a receiver that logs to the default [`LoggingSink`].
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_sink(Arc::new(LoggingSink)).await
    }

    /// Spawn a receiver that hands notifications to `sink`.
    pub async fn spawn_with_sink(sink: Arc<dyn NotificationSink>) -> Result<Self, anyhow::Error> {
        let vars = HashMap::from([
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("REGION".to_string(), "test-region".to_string()),
        ]);

        let config = notification_receiver::config::Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let state = Arc::new(notification_receiver::routes::AppState { sink, config });

        let handle = metrics_handle(notification_receiver::routes::init_metrics_recorder());
        let app = notification_receiver::routes::build_routes(state, handle);
        let (addr, handle) = serve(app).await?;

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestReceiverServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
