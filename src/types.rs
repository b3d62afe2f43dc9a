//! Common types used throughout the game-night service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for players
pub type PlayerId = u64;

/// Unique identifier for games
pub type GameId = u64;

/// Opaque identifier of the account that owns players and games
pub type AccountId = String;

/// Game id meaning "no game filter": routes skill lookups to the leaderboard
pub const ALL_GAMES: GameId = 0;

/// Account used when the hosting layer does not identify one
pub const DEFAULT_ACCOUNT: &str = "local";

/// A registered player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub account_id: AccountId,
}

/// Registration data for a new player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub username: String,
}

/// A registered game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    /// Display label
    pub game: String,
    pub account_id: AccountId,
}

/// A single recorded score for one player in one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEvent {
    pub score_id: u64,
    #[serde(rename = "game")]
    pub game_id: GameId,
    pub value: f64,
    #[serde(rename = "date")]
    pub recorded_at: DateTime<Utc>,
}

/// Score data to append for a player
#[derive(Debug, Clone)]
pub struct NewScore {
    pub game_id: GameId,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

/// One leaderboard line: cross-game sum of per-game points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: PlayerId,
    pub username: String,
    pub points: u64,
}

/// Aggregate counts reported by a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub players: usize,
    pub games: usize,
    pub score_events: usize,
}
