//! Recency-weighted skill estimation
//!
//! A player's skill in one game is the harmonic-decay weighted mean of their
//! recorded values: the most recent event gets weight 1, the next 1/2, then
//! 1/3 and so on. Timestamps only decide the order; elapsed time never enters
//! the weights.

use crate::types::{GameId, ScoreEvent};

/// Weight of the event at `rank` (0 = most recent)
pub fn recency_weight(rank: usize) -> f64 {
    1.0 / (rank as f64 + 1.0)
}

/// Estimate skill from events already filtered to one player and one game
///
/// Events are re-sorted by timestamp (newest first) regardless of the order
/// they are supplied in. An empty slice yields exactly `0.0`.
pub fn estimate_skill(events: &[ScoreEvent]) -> f64 {
    estimate_from(events.iter())
}

/// Estimate skill from a player's events restricted to `game_id`
pub fn estimate_skill_for_game(events: &[ScoreEvent], game_id: GameId) -> f64 {
    estimate_from(events.iter().filter(|event| event.game_id == game_id))
}

fn estimate_from<'a>(events: impl Iterator<Item = &'a ScoreEvent>) -> f64 {
    let mut ordered: Vec<&ScoreEvent> = events.collect();
    // Ties on timestamp fall back to value so the result is independent of input order
    ordered.sort_by(|a, b| {
        b.recorded_at
            .cmp(&a.recorded_at)
            .then_with(|| b.value.total_cmp(&a.value))
    });

    if ordered.is_empty() {
        return 0.0;
    }

    // Normalized weights keep every partial sum within the value range, so
    // values near f64::MAX cannot overflow the accumulator.
    let total_weight: f64 = (0..ordered.len()).map(recency_weight).sum();
    let mut skill = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (rank, event) in ordered.iter().enumerate() {
        skill += event.value * (recency_weight(rank) / total_weight);
        min = min.min(event.value);
        max = max.max(event.value);
    }

    if min <= max {
        skill.clamp(min, max)
    } else {
        skill
    }
}
