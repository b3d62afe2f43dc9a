//! Test fixtures for integration testing

use chrono::{DateTime, Duration, TimeZone, Utc};
use game_night::store::{InMemoryScoreStore, ScoreStore};
use game_night::types::{Game, GameId, NewPlayer, NewScore, Player, PlayerId};
use game_night::RatingEngine;
use std::sync::Arc;

pub const ACCOUNT: &str = "friday-club";

/// Fixed reference instant so recency ordering is deterministic
pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 19, 0, 0).unwrap() + Duration::days(n)
}

/// Store plus engine sharing it
pub struct TestNight {
    pub store: Arc<InMemoryScoreStore>,
    pub engine: RatingEngine,
}

impl TestNight {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryScoreStore::new());
        let engine = RatingEngine::new(store.clone());
        Self { store, engine }
    }

    pub fn player(&self, username: &str) -> Player {
        self.store
            .add_player(
                ACCOUNT,
                NewPlayer {
                    first_name: String::new(),
                    last_name: String::new(),
                    username: username.to_string(),
                },
            )
            .unwrap()
    }

    pub fn game(&self, label: &str) -> Game {
        self.store.add_game(ACCOUNT, label).unwrap()
    }

    pub fn score(&self, player_id: PlayerId, game_id: GameId, value: f64, day_offset: i64) {
        self.store
            .append_score(
                player_id,
                NewScore {
                    game_id,
                    value,
                    recorded_at: day(day_offset),
                },
            )
            .unwrap();
    }
}

impl Default for TestNight {
    fn default() -> Self {
        Self::new()
    }
}
