//! Game Reaper
//!
//! Entry point for the stale game reaper. Runs either a single reaper pass
//! (`REAPER_RUN_ONCE=true`, for an external cron scheduler) or the in-process
//! schedule loop alongside the health/metrics HTTP server.

use common::clock::SystemClock;
use game_reaper::config::{Config, StoreBackend};
use game_reaper::routes::{self, AppState};
use game_reaper::store::{GameStore, InMemoryGameStore, RtdbGameStore};
use game_reaper::tasks::{start_stale_game_reaper, StaleGameReaper};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "game_reaper=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Game Reaper");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        region = %config.region,
        store_backend = config.store_backend.as_str(),
        games_path = %config.games_path,
        staleness_window_seconds = config.staleness_window_seconds,
        schedule_interval_seconds = config.schedule_interval_seconds,
        run_once = config.run_once,
        "Configuration loaded successfully"
    );

    if config.interval_exceeds_window() {
        warn!(
            staleness_window_seconds = config.staleness_window_seconds,
            schedule_interval_seconds = config.schedule_interval_seconds,
            "Schedule interval exceeds staleness window; games may outlive the window by up to one interval"
        );
    }

    let store: Arc<dyn GameStore> = match config.store_backend {
        StoreBackend::Rtdb => Arc::new(
            RtdbGameStore::new(
                &config.database_url,
                &config.games_path,
                config.database_auth_token.clone(),
                config.database_request_timeout(),
            )
            .map_err(|e| {
                error!("Failed to create game store: {}", e);
                e
            })?,
        ),
        StoreBackend::Memory => {
            warn!("Using in-memory game store; nothing is persisted");
            Arc::new(InMemoryGameStore::new())
        }
    };

    let reaper = Arc::new(StaleGameReaper::new(
        store.clone(),
        Arc::new(SystemClock),
        config.staleness_window(),
    ));

    if config.run_once {
        let outcome = reaper.run_once().await.map_err(|e| {
            error!("Stale game reaper run failed: {}", e);
            e
        })?;
        info!(
            cutoff = outcome.cutoff,
            deleted_count = outcome.deleted,
            "Stale game reaper run complete"
        );
        return Ok(());
    }

    let metrics_handle = routes::init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics recorder: {}", e);
        e
    })?;

    let bind_address = config.bind_address.clone();
    let drain_seconds = config.drain_seconds;
    let schedule_interval = config.schedule_interval();

    let cancel_token = CancellationToken::new();
    let reaper_handle = tokio::spawn(start_stale_game_reaper(
        reaper.clone(),
        schedule_interval,
        cancel_token.clone(),
    ));

    let state = Arc::new(AppState {
        store,
        reaper,
        config,
    });
    let app = routes::build_routes(state, metrics_handle);

    let addr: SocketAddr = bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Game Reaper listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let shutdown_token = cancel_token.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            common::shutdown::wait_for_signal().await;
            // Stop scheduling new runs right away; keep serving probes while draining.
            shutdown_token.cancel();
            common::shutdown::drain(drain_seconds).await;
        })
        .await?;

    cancel_token.cancel();
    if let Err(e) = reaper_handle.await {
        error!("Stale game reaper task failed: {}", e);
    }

    info!("Game Reaper shutdown complete");

    Ok(())
}
