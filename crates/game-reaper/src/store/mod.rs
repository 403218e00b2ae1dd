//! Game store access.
//!
//! The games collection lives in a realtime database that the mobile client
//! writes to directly. The reaper needs exactly three things from it: a range
//! query on `lastUpdated`, an atomic multi-key delete and a cheap probe.
//!
//! # Components
//!
//! - `rtdb` - Firebase Realtime Database REST implementation
//! - `memory` - In-memory implementation with failure injection

pub mod memory;
pub mod rtdb;

pub use memory::InMemoryGameStore;
pub use rtdb::RtdbGameStore;

use crate::errors::ReaperError;
use crate::models::{GameKey, GameRecord};
use std::collections::BTreeSet;

/// Access to the shared games collection.
///
/// Implementations provide no isolation against concurrent client writes.
#[async_trait::async_trait]
pub trait GameStore: Send + Sync {
    /// Return every game whose `lastUpdated` is at or before `cutoff`,
    /// ordered by `lastUpdated` ascending.
    async fn find_stale_games(&self, cutoff: i64)
        -> Result<Vec<(GameKey, GameRecord)>, ReaperError>;

    /// Delete all `keys` in one atomic write. Either every key is removed or
    /// none is. An empty set issues no write.
    async fn delete_games(&self, keys: &BTreeSet<GameKey>) -> Result<(), ReaperError>;

    /// Verify the store is reachable.
    async fn ping(&self) -> Result<(), ReaperError>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
