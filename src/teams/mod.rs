//! Team generation for the players taking part in a game night

pub mod balancer;

pub use balancer::{
    assign_teams, seed_round_robin, team_label, validate_team_count, RosterEntry, TeamAssignment,
    TeamRow, MAX_TEAMS, MIN_TEAMS,
};
