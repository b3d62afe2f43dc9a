//! Plain data held by the stores, with the entity rules applied on mutation

use crate::error::{GameNightError, Result};
use crate::types::{
    Game, GameId, NewPlayer, NewScore, Player, PlayerId, ScoreEvent, StoreStats, ALL_GAMES,
};
use crate::utils::{next_id, next_score_id};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Everything a store persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub players: Vec<Player>,
    pub games: Vec<Game>,
    pub scores: BTreeMap<PlayerId, Vec<ScoreEvent>>,
}

impl StoreSnapshot {
    pub fn players_for(&self, account_id: &str) -> Vec<Player> {
        self.players
            .iter()
            .filter(|player| player.account_id == account_id)
            .cloned()
            .collect()
    }

    pub fn player(&self, player_id: PlayerId) -> Option<Player> {
        self.players.iter().find(|p| p.id == player_id).cloned()
    }

    pub fn games_for(&self, account_id: &str) -> Vec<Game> {
        self.games
            .iter()
            .filter(|game| game.account_id == account_id)
            .cloned()
            .collect()
    }

    pub fn scores(&self, player_id: PlayerId) -> Vec<ScoreEvent> {
        self.scores.get(&player_id).cloned().unwrap_or_default()
    }

    pub fn scores_by_player(&self, player_ids: &[PlayerId]) -> HashMap<PlayerId, Vec<ScoreEvent>> {
        player_ids
            .iter()
            .map(|id| (*id, self.scores(*id)))
            .collect()
    }

    pub fn add_player(&mut self, account_id: &str, new_player: NewPlayer) -> Result<Player> {
        let username = new_player.username.trim().to_string();
        if username.is_empty() {
            return Err(GameNightError::invalid_argument("username cannot be empty").into());
        }
        self.ensure_username_free(&username)?;

        let player = Player {
            id: next_id(self.players.iter().map(|p| p.id)),
            first_name: new_player.first_name,
            last_name: new_player.last_name,
            username,
            account_id: account_id.to_string(),
        };
        self.players.push(player.clone());
        self.scores.insert(player.id, Vec::new());
        Ok(player)
    }

    pub fn rename_player(&mut self, existing_username: &str, new_username: &str) -> Result<Player> {
        let new_username = new_username.trim();
        if new_username.is_empty() {
            return Err(GameNightError::invalid_argument("username cannot be empty").into());
        }

        let index = self
            .players
            .iter()
            .position(|p| p.username == existing_username)
            .ok_or_else(|| GameNightError::PlayerNotFound {
                player_id: existing_username.to_string(),
            })?;

        if self.players[index].username != new_username {
            self.ensure_username_free(new_username)?;
        }
        self.players[index].username = new_username.to_string();
        Ok(self.players[index].clone())
    }

    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<Player> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| GameNightError::PlayerNotFound {
                player_id: player_id.to_string(),
            })?;

        let removed = self.players.remove(index);
        self.scores.remove(&player_id);
        Ok(removed)
    }

    pub fn add_game(&mut self, account_id: &str, label: &str) -> Result<Game> {
        let label = label.trim();
        if label.is_empty() {
            return Err(GameNightError::invalid_argument("game label cannot be empty").into());
        }

        let game = Game {
            id: next_id(self.games.iter().map(|g| g.id)),
            game: label.to_string(),
            account_id: account_id.to_string(),
        };
        self.games.push(game.clone());
        Ok(game)
    }

    pub fn append_score(&mut self, player_id: PlayerId, score: NewScore) -> Result<ScoreEvent> {
        if !score.value.is_finite() {
            return Err(GameNightError::invalid_argument(format!(
                "score value must be a finite number, got {}",
                score.value
            ))
            .into());
        }
        self.ensure_game_exists(score.game_id)?;
        if self.player(player_id).is_none() {
            return Err(GameNightError::PlayerNotFound {
                player_id: player_id.to_string(),
            }
            .into());
        }

        let events = self.scores.entry(player_id).or_default();
        let event = ScoreEvent {
            score_id: next_score_id(events),
            game_id: score.game_id,
            value: score.value,
            recorded_at: score.recorded_at,
        };
        events.push(event.clone());
        Ok(event)
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            players: self.players.len(),
            games: self.games.len(),
            score_events: self.scores.values().map(Vec::len).sum(),
        }
    }

    fn ensure_username_free(&self, username: &str) -> Result<()> {
        if self.players.iter().any(|p| p.username == username) {
            return Err(GameNightError::UsernameTaken {
                username: username.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn ensure_game_exists(&self, game_id: GameId) -> Result<()> {
        if game_id == ALL_GAMES {
            return Err(
                GameNightError::invalid_argument("scores must be recorded against a game").into(),
            );
        }
        if !self.games.iter().any(|g| g.id == game_id) {
            return Err(GameNightError::GameNotFound { game_id }.into());
        }
        Ok(())
    }
}
