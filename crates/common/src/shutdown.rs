//! Graceful shutdown signal shared by the service binaries.

use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

/// Wait for SIGINT or SIGTERM, then hold for `drain_seconds`.
///
/// Intended for `axum::serve(..).with_graceful_shutdown(..)`: in-flight
/// requests keep being served during the drain period.
pub async fn shutdown_signal(drain_seconds: u64) {
    wait_for_signal().await;
    drain(drain_seconds).await;
}

/// Sleep through the drain period, logging its start and end.
pub async fn drain(drain_seconds: u64) {
    if drain_seconds > 0 {
        warn!("Draining connections for {} seconds...", drain_seconds);
        tokio::time::sleep(Duration::from_secs(drain_seconds)).await;
        info!("Drain period complete");
    } else {
        info!("Skipping drain period (DRAIN_SECONDS=0)");
    }
}

/// Returns when SIGINT or SIGTERM is received.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
