//! Utility functions for the game-night service

use crate::types::{PlayerId, ScoreEvent};
use chrono::{DateTime, Utc};

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Next identifier after the largest one in use, starting at 1
pub fn next_id(existing: impl IntoIterator<Item = u64>) -> u64 {
    existing.into_iter().max().map_or(1, |max| max + 1)
}

/// Next score id for a player's events
pub fn next_score_id(events: &[ScoreEvent]) -> u64 {
    next_id(events.iter().map(|event| event.score_id))
}

/// Remove duplicate ids keeping the first occurrence
pub fn dedup_preserving_order(ids: &[PlayerId]) -> Vec<PlayerId> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
