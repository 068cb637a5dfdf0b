//! Team roster
//!
//! Teams are registered by an external lobby collaborator; the engine only
//! reads their identity and current fleet plan. The fleet base count is set
//! once per month alongside the team's RM plan bid and consumed by the
//! settlement engine's transport-cost step.
//!
//! Iteration order is always ascending team id: auction tie-breaks and
//! settlement batches depend on it for determinism.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors from roster operations
#[derive(Debug, Error, PartialEq)]
pub enum TeamError {
    #[error("unknown team: {0}")]
    UnknownTeam(TeamId),

    #[error("fleet count must be non-negative, got {0}")]
    NegativeFleetCount(i64),
}

/// Numeric team identity; lower ids win auction tie-breaks
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team_{}", self.0)
    }
}

/// One registered team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
    id: TeamId,
    name: String,
    /// Owned transport units, refreshed by each month's plan bid
    fleet_base_count: i64,
}

impl TeamProfile {
    pub fn new(id: TeamId, name: impl Into<String>, fleet_base_count: i64) -> Self {
        Self {
            id,
            name: name.into(),
            fleet_base_count,
        }
    }

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fleet_base_count(&self) -> i64 {
        self.fleet_base_count
    }
}

/// All registered teams, iterated in ascending id order
///
/// # Example
/// ```
/// use market_sim_core_rs::{TeamId, TeamProfile, TeamRoster};
///
/// let roster = TeamRoster::new(vec![
///     TeamProfile::new(TeamId(2), "Beta", 10),
///     TeamProfile::new(TeamId(1), "Alpha", 12),
/// ]);
/// let ids: Vec<_> = roster.ids().collect();
/// assert_eq!(ids, vec![TeamId(1), TeamId(2)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    teams: BTreeMap<TeamId, TeamProfile>,
}

impl TeamRoster {
    pub fn new(teams: Vec<TeamProfile>) -> Self {
        Self {
            teams: teams.into_iter().map(|t| (t.id(), t)).collect(),
        }
    }

    pub fn get(&self, id: TeamId) -> Option<&TeamProfile> {
        self.teams.get(&id)
    }

    pub fn contains(&self, id: TeamId) -> bool {
        self.teams.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Ascending team ids
    pub fn ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.teams.keys().copied()
    }

    /// Profiles in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &TeamProfile> {
        self.teams.values()
    }

    /// Update a team's fleet plan for the coming month
    pub fn set_fleet_base_count(&mut self, id: TeamId, count: i64) -> Result<(), TeamError> {
        if count < 0 {
            return Err(TeamError::NegativeFleetCount(count));
        }
        match self.teams.get_mut(&id) {
            Some(team) => {
                team.fleet_base_count = count;
                Ok(())
            }
            None => Err(TeamError::UnknownTeam(id)),
        }
    }
}
