//! JSON file-backed score store
//!
//! The whole snapshot is kept in memory and rewritten to disk after every
//! mutation. Writes go to a temporary file that is then renamed over the
//! target, so a crash never leaves a half-written snapshot behind.

use crate::error::{GameNightError, Result};
use crate::store::{ScoreStore, StoreSnapshot};
use crate::types::{Game, NewPlayer, NewScore, Player, PlayerId, ScoreEvent, StoreStats};
use anyhow::Context;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info};

/// Score store persisted as a single JSON document
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
    data: RwLock<StoreSnapshot>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>, pretty: bool) -> Result<Self> {
        let path = path.into();
        let snapshot = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store file {}", path.display()))?;
            let snapshot: StoreSnapshot = serde_json::from_str(&raw).map_err(|e| {
                GameNightError::StorageError {
                    message: format!("Corrupt store file {}: {}", path.display(), e),
                }
            })?;
            info!(
                "Loaded store from {}: {} players, {} games",
                path.display(),
                snapshot.players.len(),
                snapshot.games.len()
            );
            snapshot
        } else {
            info!("Store file {} not found, starting empty", path.display());
            StoreSnapshot::default()
        };

        Ok(Self {
            path,
            pretty,
            data: RwLock::new(snapshot),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreSnapshot>> {
        self.data.read().map_err(|_| {
            GameNightError::InternalError {
                message: "Failed to acquire store read lock".to_string(),
            }
            .into()
        })
    }

    /// Apply `change` to a copy, persist it, then publish it
    ///
    /// Memory and disk never diverge: a failed write leaves both untouched.
    fn mutate<T>(&self, change: impl FnOnce(&mut StoreSnapshot) -> Result<T>) -> Result<T> {
        let mut guard = self.data.write().map_err(|_| GameNightError::InternalError {
            message: "Failed to acquire store write lock".to_string(),
        })?;

        let mut next = guard.clone();
        let output = change(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(output)
    }

    fn persist(&self, snapshot: &StoreSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = if self.pretty {
            serde_json::to_vec_pretty(snapshot)?
        } else {
            serde_json::to_vec(snapshot)?
        };

        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path).map_err(|e| GameNightError::StorageError {
                message: format!("Failed to create {}: {}", temp_path.display(), e),
            })?;
            file.write_all(&data)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path).map_err(|e| GameNightError::StorageError {
            message: format!("Failed to replace {}: {}", self.path.display(), e),
        })?;

        debug!("Saved {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
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
        self.mutate(|data| data.add_player(account_id, new_player))
    }

    fn rename_player(&self, existing_username: &str, new_username: &str) -> Result<Player> {
        self.mutate(|data| data.rename_player(existing_username, new_username))
    }

    fn remove_player(&self, player_id: PlayerId) -> Result<Player> {
        self.mutate(|data| data.remove_player(player_id))
    }

    fn add_game(&self, account_id: &str, label: &str) -> Result<Game> {
        self.mutate(|data| data.add_game(account_id, label))
    }

    fn append_score(&self, player_id: PlayerId, score: NewScore) -> Result<ScoreEvent> {
        self.mutate(|data| data.append_score(player_id, score))
    }

    fn stats(&self) -> Result<StoreStats> {
        Ok(self.read()?.stats())
    }
}
