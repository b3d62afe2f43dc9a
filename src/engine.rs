//! Rating engine facade
//!
//! Wires the score store to the rating and team-balancing computations. The
//! engine holds no derived state: every call re-reads the store, so results
//! always reflect scores and players added by other sessions.

use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::rating::{compute_leaderboard, estimate_skill_for_game, leaderboard_points, rank_game};
use crate::rating::GameStandings;
use crate::store::ScoreStore;
use crate::teams::{assign_teams, validate_team_count, RosterEntry, TeamAssignment};
use crate::types::{GameId, LeaderboardEntry, PlayerId, ALL_GAMES};
use crate::utils::dedup_preserving_order;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Parameters of one team generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRequest {
    /// Players taking part, in the order they were picked
    pub participants: Vec<PlayerId>,
    pub team_count: usize,
    /// Game whose skill orders the roster; [`ALL_GAMES`] uses leaderboard points
    pub game_id: GameId,
}

/// Stateless entry point for skill, leaderboard and team computations
pub struct RatingEngine {
    store: Arc<dyn ScoreStore>,
    metrics_collector: Arc<MetricsCollector>,
}

impl RatingEngine {
    /// Create a new engine over `store`
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        let metrics_collector = Arc::new(MetricsCollector::new().unwrap_or_else(|_| {
            warn!("Failed to create metrics collector, using default");
            MetricsCollector::default()
        }));

        Self::with_metrics(store, metrics_collector)
    }

    /// Create a new engine with metrics collector
    pub fn with_metrics(store: Arc<dyn ScoreStore>, metrics_collector: Arc<MetricsCollector>) -> Self {
        Self {
            store,
            metrics_collector,
        }
    }

    /// The underlying store
    pub fn store(&self) -> Arc<dyn ScoreStore> {
        self.store.clone()
    }

    /// Skill of `player_id` in `game_id`
    ///
    /// With [`ALL_GAMES`] this is the player's leaderboard total instead.
    /// Unknown players and games yield `0.0`, as do players of other accounts.
    pub fn skill_level(&self, account_id: &str, player_id: PlayerId, game_id: GameId) -> Result<f64> {
        let timer = self.metrics_collector.start_timer();

        let skill = if game_id == ALL_GAMES {
            let leaderboard = self.account_leaderboard(account_id)?;
            leaderboard_points(&leaderboard, player_id) as f64
        } else {
            match self.store.player(player_id)? {
                Some(player) if player.account_id == account_id => {
                    let events = self.store.scores(player_id)?;
                    estimate_skill_for_game(&events, game_id)
                }
                _ => 0.0,
            }
        };

        self.metrics_collector
            .record_skill_request(game_id == ALL_GAMES, timer.stop());
        debug!(
            "Skill for player {} in game {}: {:.3}",
            player_id, game_id, skill
        );
        Ok(skill)
    }

    /// Cross-game leaderboard of the account's players
    pub fn leaderboard(&self, account_id: &str) -> Result<Vec<LeaderboardEntry>> {
        let timer = self.metrics_collector.start_timer();
        let leaderboard = self.account_leaderboard(account_id)?;
        self.metrics_collector.record_leaderboard(timer.stop());
        Ok(leaderboard)
    }

    /// Ranked standings of the account's players in one game
    pub fn game_standings(&self, account_id: &str, game_id: GameId) -> Result<GameStandings> {
        let players = self.store.players(account_id)?;
        let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
        let events = self.store.scores_by_player(&ids)?;
        Ok(rank_game(&players, &events, game_id))
    }

    /// Participants ordered by skill, strongest first
    ///
    /// Duplicate ids are dropped and ids that are not players of the account
    /// are skipped. Equal skills keep the order participants were given in.
    pub fn roster(
        &self,
        account_id: &str,
        participants: &[PlayerId],
        game_id: GameId,
    ) -> Result<Vec<RosterEntry>> {
        let players = self.store.players(account_id)?;
        let by_id: HashMap<PlayerId, &str> = players
            .iter()
            .map(|p| (p.id, p.username.as_str()))
            .collect();

        let mut known = Vec::new();
        for id in dedup_preserving_order(participants) {
            match by_id.get(&id) {
                Some(username) => known.push((id, username.to_string())),
                None => warn!("Skipping unknown participant {} for account {}", id, account_id),
            }
        }

        let skills: HashMap<PlayerId, f64> = if game_id == ALL_GAMES {
            let leaderboard = self.account_leaderboard(account_id)?;
            known
                .iter()
                .map(|(id, _)| (*id, leaderboard_points(&leaderboard, *id) as f64))
                .collect()
        } else {
            let ids: Vec<PlayerId> = known.iter().map(|(id, _)| *id).collect();
            let events = self.store.scores_by_player(&ids)?;
            ids.iter()
                .map(|id| {
                    let skill = events
                        .get(id)
                        .map_or(0.0, |list| estimate_skill_for_game(list, game_id));
                    (*id, skill)
                })
                .collect()
        };

        let mut roster: Vec<RosterEntry> = known
            .into_iter()
            .map(|(player_id, username)| RosterEntry {
                skill: skills.get(&player_id).copied().unwrap_or(0.0),
                player_id,
                username,
            })
            .collect();
        roster.sort_by(|a, b| b.skill.total_cmp(&a.skill));
        Ok(roster)
    }

    /// Generate balanced teams using a fresh, non-deterministic random source
    pub fn generate_teams(&self, account_id: &str, request: &TeamRequest) -> Result<TeamAssignment> {
        self.generate_teams_with_rng(account_id, request, &mut rand::thread_rng())
    }

    /// Generate balanced teams drawing randomness from `rng`
    pub fn generate_teams_with_rng<R: Rng + ?Sized>(
        &self,
        account_id: &str,
        request: &TeamRequest,
        rng: &mut R,
    ) -> Result<TeamAssignment> {
        validate_team_count(request.team_count)?;
        let timer = self.metrics_collector.start_timer();

        let roster = self.roster(account_id, &request.participants, request.game_id)?;
        let assignment = assign_teams(&roster, request.team_count, rng)?;

        self.metrics_collector
            .record_team_generation(request.team_count, roster.len(), timer.stop());
        info!(
            "Generated {} teams for {} players ({} rows) in game {}",
            request.team_count,
            roster.len(),
            assignment.rows.len(),
            request.game_id
        );
        Ok(assignment)
    }

    fn account_leaderboard(&self, account_id: &str) -> Result<Vec<LeaderboardEntry>> {
        let players = self.store.players(account_id)?;
        let games = self.store.games(account_id)?;
        let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
        let events = self.store.scores_by_player(&ids)?;
        Ok(compute_leaderboard(&players, &games, &events))
    }
}
