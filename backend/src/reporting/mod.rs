//! Reporting rollups
//!
//! Read-only aggregation over the financial ledger: per-quarter and
//! whole-game EBITDA, a team's cumulative dashboard summary, and the
//! leaderboard. Nothing here owns or mutates state.

use crate::core::period::Period;
use crate::models::state::GameState;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub team: TeamId,
    pub name: String,
    pub quarter_ebitda: i64,
    pub total_ebitda: i64,
}

/// A team's cumulative dashboard numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeSummary {
    pub team: TeamId,
    /// EBITDA summed over the requested quarter
    pub quarter_ebitda: i64,
    /// EBITDA summed over the whole game so far
    pub total_ebitda: i64,
    /// Closing cash of the team's latest settled month
    pub closing_cash: i64,
    /// Latest settled month, if any
    pub latest_month: Option<Period>,
    /// That month's EBITDA
    pub latest_month_ebitda: i64,
}

/// Sum of a team's EBITDA over one quarter
pub fn quarter_ebitda(state: &GameState, team: TeamId, quarter: u8) -> i64 {
    state
        .all_records()
        .filter(|r| r.team == team && r.period.quarter() == quarter)
        .map(|r| r.ebitda)
        .sum()
}

/// Sum of a team's EBITDA over every settled month
pub fn total_ebitda(state: &GameState, team: TeamId) -> i64 {
    state
        .all_records()
        .filter(|r| r.team == team)
        .map(|r| r.ebitda)
        .sum()
}

/// A team's cumulative summary as of the latest settled month
///
/// The closing cash of the latest record is the game-wide cash position:
/// every month's closing carries into the next month's opening.
pub fn cumulative(state: &GameState, team: TeamId, quarter: u8) -> CumulativeSummary {
    let latest = state.all_records().filter(|r| r.team == team).last();
    CumulativeSummary {
        team,
        quarter_ebitda: quarter_ebitda(state, team, quarter),
        total_ebitda: total_ebitda(state, team),
        closing_cash: latest.map(|r| r.cash_closing).unwrap_or(0),
        latest_month: latest.map(|r| r.period),
        latest_month_ebitda: latest.map(|r| r.ebitda).unwrap_or(0),
    }
}

/// All teams ranked by total-game EBITDA, descending
///
/// Ties keep their input order (ascending team id) — the sort is stable and
/// no further tie-break is defined.
pub fn leaderboard(state: &GameState, quarter: u8) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = state
        .roster()
        .iter()
        .map(|team| LeaderboardEntry {
            team: team.id(),
            name: team.name().to_string(),
            quarter_ebitda: quarter_ebitda(state, team.id(), quarter),
            total_ebitda: total_ebitda(state, team.id()),
        })
        .collect();
    entries.sort_by(|a, b| b.total_ebitda.cmp(&a.total_ebitda));
    entries
}
