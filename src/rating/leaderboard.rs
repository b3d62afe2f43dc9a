//! Cross-game leaderboard aggregation

use crate::rating::standings::rank_game;
use crate::types::{Game, LeaderboardEntry, Player, PlayerId, ScoreEvent};
use std::collections::HashMap;
use tracing::debug;

/// Sum per-game standings points over every game
///
/// Games are visited in ascending id order. The result is sorted by total
/// points descending; ties keep the order players were supplied in.
pub fn compute_leaderboard(
    players: &[Player],
    games: &[Game],
    events_by_player: &HashMap<PlayerId, Vec<ScoreEvent>>,
) -> Vec<LeaderboardEntry> {
    let mut game_ids: Vec<_> = games.iter().map(|game| game.id).collect();
    game_ids.sort_unstable();
    game_ids.dedup();

    let mut totals: HashMap<PlayerId, u64> = players.iter().map(|p| (p.id, 0)).collect();
    for game_id in game_ids {
        let standings = rank_game(players, events_by_player, game_id);
        debug!(
            "Game {} standings: {} ranked of {}",
            game_id,
            standings.ranked.len(),
            standings.field_size
        );
        for entry in standings.ranked {
            *totals.entry(entry.player_id).or_insert(0) += entry.points;
        }
    }

    let mut leaderboard: Vec<LeaderboardEntry> = players
        .iter()
        .map(|player| LeaderboardEntry {
            id: player.id,
            username: player.username.clone(),
            points: totals.get(&player.id).copied().unwrap_or(0),
        })
        .collect();
    leaderboard.sort_by(|a, b| b.points.cmp(&a.points));
    leaderboard
}

/// Leaderboard total for a single player, zero when the player is unknown
pub fn leaderboard_points(leaderboard: &[LeaderboardEntry], player_id: PlayerId) -> u64 {
    leaderboard
        .iter()
        .find(|entry| entry.id == player_id)
        .map_or(0, |entry| entry.points)
}
