//! Observability for the Game Reaper.
//!
//! Provides metrics definitions and the Prometheus recorder setup.

pub mod metrics;
