//! Skill-balanced team assignment
//!
//! The roster arrives sorted by skill, strongest first. It is cut into rows
//! ("tiers") of `team_count` consecutive players, so every team receives one
//! player from each tier. Within a tier the player-to-team mapping is an
//! independent uniform shuffle, which keeps the teams balanced while making
//! each regeneration look different.

use crate::error::{GameNightError, Result};
use crate::types::PlayerId;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Smallest supported number of teams
pub const MIN_TEAMS: usize = 2;

/// Largest supported number of teams
pub const MAX_TEAMS: usize = 4;

/// A participating player with the skill used to order the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: PlayerId,
    pub username: String,
    pub skill: f64,
}

/// One tier of the assignment: slot `i` belongs to team bucket `i`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRow {
    pub seats: Vec<Option<RosterEntry>>,
}

impl TeamRow {
    /// Players seated in this row, in bucket order
    pub fn players(&self) -> impl Iterator<Item = &RosterEntry> {
        self.seats.iter().flatten()
    }
}

/// Result of one team generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAssignment {
    pub team_count: usize,
    pub rows: Vec<TeamRow>,
    /// Team bucket of every assigned player
    pub buckets: HashMap<PlayerId, usize>,
}

impl TeamAssignment {
    /// Members of team `bucket`, strongest tier first
    pub fn team(&self, bucket: usize) -> Vec<&RosterEntry> {
        self.rows
            .iter()
            .filter_map(|row| row.seats.get(bucket).and_then(Option::as_ref))
            .collect()
    }

    /// Sum of member skill for team `bucket`
    pub fn team_skill(&self, bucket: usize) -> f64 {
        self.team(bucket).iter().map(|entry| entry.skill).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Check that `team_count` is one of the supported sizes
pub fn validate_team_count(team_count: usize) -> Result<()> {
    if !(MIN_TEAMS..=MAX_TEAMS).contains(&team_count) {
        return Err(GameNightError::invalid_argument(format!(
            "team count must be between {} and {}, got {}",
            MIN_TEAMS, MAX_TEAMS, team_count
        ))
        .into());
    }
    Ok(())
}

/// Human-readable label of team `bucket`, e.g. "Team 1"
pub fn team_label(prefix: &str, bucket: usize) -> String {
    format!("{} {}", prefix, bucket + 1)
}

/// Partition a skill-ordered roster into `team_count` balanced teams
///
/// The roster is not re-sorted. An empty roster produces no rows. A short
/// final row seats its players in randomly chosen distinct buckets and leaves
/// the rest empty.
pub fn assign_teams<R: Rng + ?Sized>(
    roster: &[RosterEntry],
    team_count: usize,
    rng: &mut R,
) -> Result<TeamAssignment> {
    seat_tiers(roster, team_count, |order| order.shuffle(&mut *rng))
}

/// Round-robin seating without shuffling: roster index `i` goes to bucket `i % team_count`
pub fn seed_round_robin(roster: &[RosterEntry], team_count: usize) -> Result<TeamAssignment> {
    seat_tiers(roster, team_count, |_| {})
}

/// Cut the roster into tiers and seat tier member `j` in bucket `order[j]`
///
/// `arrange` receives the identity order `0..team_count` for every tier.
fn seat_tiers<F>(
    roster: &[RosterEntry],
    team_count: usize,
    mut arrange: F,
) -> Result<TeamAssignment>
where
    F: FnMut(&mut [usize]),
{
    validate_team_count(team_count)?;

    let mut rows = Vec::with_capacity(roster.len().div_ceil(team_count));
    let mut buckets = HashMap::with_capacity(roster.len());

    for tier in roster.chunks(team_count) {
        let mut order: Vec<usize> = (0..team_count).collect();
        arrange(&mut order);

        let mut seats = vec![None; team_count];
        for (entry, bucket) in tier.iter().zip(order) {
            buckets.insert(entry.player_id, bucket);
            seats[bucket] = Some(entry.clone());
        }
        rows.push(TeamRow { seats });
    }

    Ok(TeamAssignment {
        team_count,
        rows,
        buckets,
    })
}
