//! In-memory game store.
//!
//! Mirrors the database semantics the reaper relies on: the range query
//! follows the `lastUpdated` index order (see [`LastUpdated`](crate::models::LastUpdated)), comparing
//! numbers exactly, and a batch delete applies to every key or to none. Failures can be injected per operation. Used by tests and by
//! local runs with `GAME_STORE=memory`.

use crate::errors::ReaperError;
use crate::models::{GameKey, GameRecord};
use crate::store::GameStore;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Game store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    games: Mutex<BTreeMap<GameKey, GameRecord>>,
    fail_queries: AtomicBool,
    fail_deletes: AtomicBool,
    query_count: AtomicUsize,
    delete_batch_count: AtomicUsize,
}

impl InMemoryGameStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `(key, lastUpdated)` pairs.
    pub fn with_games<K, I>(games: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, i64)>,
    {
        let map = games
            .into_iter()
            .map(|(key, ts)| (GameKey::new(key), GameRecord::updated_at(ts)))
            .collect();

        Self {
            games: Mutex::new(map),
            ..Self::default()
        }
    }

    /// Insert or replace a record, as the mobile client would.
    pub async fn put(&self, key: impl Into<String>, record: GameRecord) {
        self.games.lock().await.insert(GameKey::new(key), record);
    }

    /// Fetch a record by key.
    pub async fn get(&self, key: &str) -> Option<GameRecord> {
        self.games.lock().await.get(&GameKey::new(key)).cloned()
    }

    /// All keys currently stored, in key order.
    pub async fn keys(&self) -> Vec<GameKey> {
        self.games.lock().await.keys().cloned().collect()
    }

    /// Number of records currently stored.
    pub async fn len(&self) -> usize {
        self.games.lock().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.games.lock().await.is_empty()
    }

    /// Make subsequent range queries (and pings) fail.
    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent batch deletes fail without touching any record.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of range queries served (including failed ones).
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    /// Number of batched delete writes attempted (including failed ones).
    pub fn delete_batch_count(&self) -> usize {
        self.delete_batch_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl GameStore for InMemoryGameStore {
    async fn find_stale_games(
        &self,
        cutoff: i64,
    ) -> Result<Vec<(GameKey, GameRecord)>, ReaperError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(ReaperError::Injected("range query failed".to_string()));
        }

        let games = self.games.lock().await;
        let mut stale: Vec<(GameKey, GameRecord)> = games
            .iter()
            .filter(|(_, record)| record.is_stale(cutoff))
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect();

        stale.sort_by(|(ka, ra), (kb, rb)| {
            ra.last_updated()
                .index_cmp(&rb.last_updated())
                .then_with(|| ka.cmp(kb))
        });

        Ok(stale)
    }

    async fn delete_games(&self, keys: &BTreeSet<GameKey>) -> Result<(), ReaperError> {
        if keys.is_empty() {
            return Ok(());
        }

        self.delete_batch_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(ReaperError::Injected("batch delete failed".to_string()));
        }

        // Single lock scope: the whole batch lands or none of it does.
        let mut games = self.games.lock().await;
        for key in keys {
            games.remove(key);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), ReaperError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(ReaperError::Injected("ping failed".to_string()));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
