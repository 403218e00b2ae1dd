//! Stale game reaper.
//!
//! Removes game records that have not been updated within the staleness
//! window. A record nobody has touched for that long is treated as an
//! abandoned round.
//!
//! Each run:
//! 1. Computes `cutoff = now - window`.
//! 2. Queries the games collection for `lastUpdated <= cutoff`.
//! 3. Deletes every returned key in one atomic batch, or writes nothing when
//!    the result is empty.
//!
//! Failures are not retried within a run. The schedule loop logs the failure
//! and tries again on the next tick.
//!
//! # Concurrency
//!
//! Runs are serialized through an internal lock, so the schedule loop and the
//! HTTP trigger never overlap. There is no isolation against client writes: a
//! client that bumps `lastUpdated` between the query and the delete loses
//! that update.
//!
//! # Graceful Shutdown
//!
//! The loop exits when its cancellation token is cancelled. A run already in
//! progress completes first.

use crate::errors::ReaperError;
use crate::models::{GameKey, ReapOutcome};
use crate::observability::metrics::record_reaper_run;
use crate::store::GameStore;
use common::clock::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn, Instrument};
use uuid::Uuid;

/// Default staleness window in seconds (5 minutes).
pub const DEFAULT_STALENESS_WINDOW_SECONDS: u64 = 300;

/// Default schedule interval in seconds (20 minutes).
pub const DEFAULT_SCHEDULE_INTERVAL_SECONDS: u64 = 1200;

/// Deletes abandoned games from the shared collection.
pub struct StaleGameReaper {
    store: Arc<dyn GameStore>,
    clock: Arc<dyn Clock>,
    window_seconds: i64,
    run_lock: Mutex<()>,
}

impl StaleGameReaper {
    /// Create a reaper over `store` with the given staleness window.
    ///
    /// Windows longer than `i64::MAX` seconds saturate.
    pub fn new(store: Arc<dyn GameStore>, clock: Arc<dyn Clock>, window: Duration) -> Self {
        Self {
            store,
            clock,
            window_seconds: i64::try_from(window.as_secs()).unwrap_or(i64::MAX),
            run_lock: Mutex::new(()),
        }
    }

    /// Staleness window in seconds.
    pub fn window_seconds(&self) -> i64 {
        self.window_seconds
    }

    /// Cutoff for a run starting now: records at or before it are stale.
    pub fn cutoff(&self) -> i64 {
        self.clock
            .now_unix_seconds()
            .saturating_sub(self.window_seconds)
    }

    /// Perform one reaper invocation.
    ///
    /// # Errors
    ///
    /// Propagates the store error from the range query or the batch delete.
    /// A failed delete removes nothing.
    pub async fn run_once(&self) -> Result<ReapOutcome, ReaperError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("reaper.run", %run_id, backend = self.store.backend_name());

        async {
            let _guard = self.run_lock.lock().await;
            let start = Instant::now();

            let result = self.reap().await;

            match &result {
                Ok(outcome) => {
                    record_reaper_run("success", outcome.deleted, start.elapsed());
                }
                Err(e) => {
                    record_reaper_run(e.status_label(), 0, start.elapsed());
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn reap(&self) -> Result<ReapOutcome, ReaperError> {
        let cutoff = self.cutoff();

        let stale = self.store.find_stale_games(cutoff).await?;
        let keys: BTreeSet<GameKey> = stale.into_iter().map(|(key, _)| key).collect();

        if keys.is_empty() {
            debug!(target: "reaper.task", cutoff, "No stale games found");
            return Ok(ReapOutcome { cutoff, deleted: 0 });
        }

        self.store.delete_games(&keys).await?;

        info!(
            target: "reaper.task",
            cutoff,
            deleted_count = keys.len(),
            "Deleted stale games"
        );

        Ok(ReapOutcome {
            cutoff,
            deleted: keys.len(),
        })
    }
}

/// Start the stale game reaper schedule loop.
///
/// Runs immediately, then once per `interval`. A slow run delays the next tick
/// rather than triggering a burst of catch-up runs. Returns when the
/// cancellation token is triggered.
#[instrument(skip_all, name = "reaper.task.schedule")]
pub async fn start_stale_game_reaper(
    reaper: Arc<StaleGameReaper>,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    info!(
        target: "reaper.task",
        interval_seconds = interval.as_secs(),
        window_seconds = reaper.window_seconds(),
        "Starting stale game reaper"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = reaper.run_once().await {
                    warn!(
                        target: "reaper.task",
                        error = %e,
                        "Stale game reaper run failed, will retry next interval"
                    );
                }
            }
            _ = cancel_token.cancelled() => {
                info!(
                    target: "reaper.task",
                    "Stale game reaper received shutdown signal, exiting"
                );
                break;
            }
        }
    }

    info!(target: "reaper.task", "Stale game reaper stopped");
}
