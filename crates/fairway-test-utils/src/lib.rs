//! # Fairway Test Utilities
//!
//! Shared test utilities for the Game Reaper and Notification Receiver.
//!
//! This crate provides:
//! - Server test harnesses (`TestReaperServer`, `TestReceiverServer`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fairway_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let store = Arc::new(InMemoryGameStore::new());
//!     let server = TestReaperServer::spawn(store, 1_700, false).await?;
//!
//!     let response = reqwest::get(format!("{}/health", server.url())).await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

// Re-export commonly used items
pub use server_harness::*;
