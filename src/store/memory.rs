//! In-memory score store

use crate::error::{GameNightError, Result};
use crate::store::{ScoreStore, StoreSnapshot};
use crate::types::{Game, NewPlayer, NewScore, Player, PlayerId, ScoreEvent, StoreStats};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// In-memory score store implementation
#[derive(Debug, Default)]
pub struct InMemoryScoreStore {
    data: RwLock<StoreSnapshot>,
}

impl InMemoryScoreStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with `snapshot`
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            data: RwLock::new(snapshot),
        }
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Result<StoreSnapshot> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreSnapshot>> {
        self.data.read().map_err(|_| {
            GameNightError::InternalError {
                message: "Failed to acquire store read lock".to_string(),
            }
            .into()
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreSnapshot>> {
        self.data.write().map_err(|_| {
            GameNightError::InternalError {
                message: "Failed to acquire store write lock".to_string(),
            }
            .into()
        })
    }
}

impl ScoreStore for InMemoryScoreStore {
    fn players(&self, account_id: &str) -> Result<Vec<Player>> {
        Ok(self.read()?.players_for(account_id))
    }

    fn player(&self, player_id: PlayerId) -> Result<Option<Player>> {
        Ok(self.read()?.player(player_id))
    }

    fn games(&self, account_id: &str) -> Result<Vec<Game>> {
        Ok(self.read()?.games_for(account_id))
    }

    fn scores(&self, player_id: PlayerId) -> Result<Vec<ScoreEvent>> {
        Ok(self.read()?.scores(player_id))
    }

    fn scores_by_player(
        &self,
        player_ids: &[PlayerId],
    ) -> Result<HashMap<PlayerId, Vec<ScoreEvent>>> {
        Ok(self.read()?.scores_by_player(player_ids))
    }

    fn add_player(&self, account_id: &str, new_player: NewPlayer) -> Result<Player> {
        let player = self.write()?.add_player(account_id, new_player)?;
        debug!("Registered player {} ({})", player.id, player.username);
        Ok(player)
    }

    fn rename_player(&self, existing_username: &str, new_username: &str) -> Result<Player> {
        self.write()?.rename_player(existing_username, new_username)
    }

    fn remove_player(&self, player_id: PlayerId) -> Result<Player> {
        self.write()?.remove_player(player_id)
    }

    fn add_game(&self, account_id: &str, label: &str) -> Result<Game> {
        self.write()?.add_game(account_id, label)
    }

    fn append_score(&self, player_id: PlayerId, score: NewScore) -> Result<ScoreEvent> {
        self.write()?.append_score(player_id, score)
    }

    fn stats(&self) -> Result<StoreStats> {
        Ok(self.read()?.stats())
    }
}
