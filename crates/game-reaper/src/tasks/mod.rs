//! Background tasks for the Game Reaper.
//!
//! # Tasks
//!
//! - `stale_game_reaper` - Deletes games not updated within the staleness window

pub mod stale_game_reaper;

pub use stale_game_reaper::{start_stale_game_reaper, StaleGameReaper};
