//! Rating computations: recency-weighted skill, per-game standings and the
//! cross-game leaderboard
//!
//! Everything here is a pure function of the supplied players, games and
//! score events. Nothing is cached between calls.

pub mod leaderboard;
pub mod skill;
pub mod standings;

// Re-export commonly used functions
pub use leaderboard::{compute_leaderboard, leaderboard_points};
pub use skill::{estimate_skill, estimate_skill_for_game};
pub use standings::{compute_standings, rank_game, GameStandings, StandingsEntry};
