//! Per-game standings
//!
//! Players are ranked by their skill in a single game. Players without a
//! recorded score (skill exactly zero) are left unranked but still count
//! toward the field size, so every ranked player is credited as if the
//! unranked players finished below them.

use crate::rating::skill::estimate_skill_for_game;
use crate::types::{GameId, Player, PlayerId, ScoreEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A ranked player's position in one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub player_id: PlayerId,
    pub skill: f64,
    /// 0-based rank among skilled players
    pub rank: usize,
    pub points: u64,
}

/// Ranked standings for a single game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStandings {
    pub game_id: GameId,
    /// Number of players considered, ranked or not
    pub field_size: usize,
    /// Skilled players in rank order
    pub ranked: Vec<StandingsEntry>,
}

impl GameStandings {
    /// Points earned by `player_id` in this game (zero when unranked)
    pub fn points_for(&self, player_id: PlayerId) -> u64 {
        self.ranked
            .iter()
            .find(|entry| entry.player_id == player_id)
            .map_or(0, |entry| entry.points)
    }
}

/// Points for rank `rank` among `skilled` ranked players in a field of `field_size`
///
/// Out-of-range arguments (a rank past the skilled players, or more skilled
/// players than the field holds) saturate instead of underflowing.
pub fn points_for_rank(rank: usize, skilled: usize, field_size: usize) -> u64 {
    (skilled.saturating_sub(rank) + field_size.saturating_sub(skilled)) as u64
}

/// Rank every player by skill in `game_id`
///
/// Ties keep the order players were supplied in.
pub fn rank_game(
    players: &[Player],
    events_by_player: &HashMap<PlayerId, Vec<ScoreEvent>>,
    game_id: GameId,
) -> GameStandings {
    let mut skilled: Vec<(PlayerId, f64)> = players
        .iter()
        .map(|player| {
            let skill = events_by_player
                .get(&player.id)
                .map_or(0.0, |events| estimate_skill_for_game(events, game_id));
            (player.id, skill)
        })
        .filter(|(_, skill)| *skill != 0.0)
        .collect();

    // sort_by is stable: equal skills stay in input order
    skilled.sort_by(|a, b| b.1.total_cmp(&a.1));

    let field_size = players.len();
    let skilled_count = skilled.len();
    let ranked = skilled
        .into_iter()
        .enumerate()
        .map(|(rank, (player_id, skill))| StandingsEntry {
            player_id,
            skill,
            rank,
            points: points_for_rank(rank, skilled_count, field_size),
        })
        .collect();

    GameStandings {
        game_id,
        field_size,
        ranked,
    }
}

/// Points per player for `game_id`; every supplied player appears in the map
pub fn compute_standings(
    players: &[Player],
    events_by_player: &HashMap<PlayerId, Vec<ScoreEvent>>,
    game_id: GameId,
) -> HashMap<PlayerId, u64> {
    let standings = rank_game(players, events_by_player, game_id);
    let mut points: HashMap<PlayerId, u64> = players.iter().map(|p| (p.id, 0)).collect();
    for entry in standings.ranked {
        points.insert(entry.player_id, entry.points);
    }
    points
}
