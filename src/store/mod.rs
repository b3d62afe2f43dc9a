//! Score store interface and implementations
//!
//! The store holds players, games and each player's score events. It carries
//! no rating logic: the engine re-reads it on every computation.

pub mod file;
pub mod memory;
pub mod snapshot;

pub use file::JsonFileStore;
pub use memory::InMemoryScoreStore;
pub use snapshot::StoreSnapshot;

use crate::error::Result;
use crate::types::{Game, NewPlayer, NewScore, Player, PlayerId, ScoreEvent, StoreStats};
use std::collections::HashMap;

/// Trait for score store operations
#[cfg_attr(test, mockall::automock)]
pub trait ScoreStore: Send + Sync {
    /// All players owned by `account_id`, in registration order
    fn players(&self, account_id: &str) -> Result<Vec<Player>>;

    /// Look up a single player
    fn player(&self, player_id: PlayerId) -> Result<Option<Player>>;

    /// All games owned by `account_id`, in registration order
    fn games(&self, account_id: &str) -> Result<Vec<Game>>;

    /// A player's score events in insertion order; unknown players have none
    fn scores(&self, player_id: PlayerId) -> Result<Vec<ScoreEvent>>;

    /// Score events for several players; unknown players map to an empty list
    fn scores_by_player(
        &self,
        player_ids: &[PlayerId],
    ) -> Result<HashMap<PlayerId, Vec<ScoreEvent>>>;

    /// Register a player; usernames are unique across all accounts
    fn add_player(&self, account_id: &str, new_player: NewPlayer) -> Result<Player>;

    /// Change a player's username
    fn rename_player(&self, existing_username: &str, new_username: &str) -> Result<Player>;

    /// Remove a player together with all of their score events
    fn remove_player(&self, player_id: PlayerId) -> Result<Player>;

    /// Register a game
    fn add_game(&self, account_id: &str, label: &str) -> Result<Game>;

    /// Append a score event to a player's history
    fn append_score(&self, player_id: PlayerId, score: NewScore) -> Result<ScoreEvent>;

    /// Aggregate counts for health reporting
    fn stats(&self) -> Result<StoreStats>;
}
