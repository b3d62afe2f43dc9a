//! Game Night - ratings and team balancing for casual game groups
//!
//! This crate estimates recency-weighted player skill per game, aggregates
//! per-game standings into a cross-game leaderboard, and splits participants
//! into skill-balanced teams. It ships an axum HTTP service over a pluggable
//! score store.

pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod rating;
pub mod service;
pub mod store;
pub mod teams;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{GameNightError, Result};
pub use types::*;

// Re-export key components
pub use engine::{RatingEngine, TeamRequest};
pub use store::{InMemoryScoreStore, JsonFileStore, ScoreStore};
pub use teams::{TeamAssignment, TeamRow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
