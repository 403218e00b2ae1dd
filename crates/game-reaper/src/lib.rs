//! Game Reaper Service Library
//!
//! Removes abandoned golf rounds from the shared games collection. The mobile
//! client keeps a game's `lastUpdated` timestamp fresh while a round is in
//! progress; games that stop receiving updates for longer than the staleness
//! window are deleted in a single atomic batch.
//!
//! # Architecture
//!
//! ```text
//! main.rs -> tasks/stale_game_reaper.rs -> store/*.rs
//! routes/mod.rs -> handlers/*.rs --------^
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers (health, readiness, metrics, trigger)
//! - `middleware` - HTTP metrics middleware
//! - `models` - Game keys, records and run outcomes
//! - `observability` - Prometheus metrics
//! - `routes` - Axum router setup
//! - `store` - Game store trait and implementations
//! - `tasks` - The reaper and its schedule loop

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod store;
pub mod tasks;
