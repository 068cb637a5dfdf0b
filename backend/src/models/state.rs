//! Game state
//!
//! The complete engine-side state of one running game: configuration, team
//! roster, bid book, financial-record ledger, liquidation markers and the
//! event log. The surrounding orchestration owns persistence; this struct is
//! what it persists.
//!
//! # Critical Invariants
//!
//! 1. At most one financial record per (team, period); settlement replaces
//!    a month's records wholesale (idempotent recalculation)
//! 2. A quarter appears in the liquidation marker set at most once, and only
//!    after its third month has been settled
//! 3. Snapshots embed the SHA-256 digest of the config; restoring against a
//!    drifted config is rejected rather than silently recomputed

use crate::core::config::{ConfigError, GameConfig};
use crate::core::period::Period;
use crate::models::bid::{BidBook, BidError, CustomerBid, RmBid};
use crate::models::customer::CustomerId;
use crate::models::event::{EngineEvent, EventLog};
use crate::models::record::FinancialRecord;
use crate::models::team::{TeamError, TeamId, TeamRoster};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors from state construction and snapshot restore
#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("config digest mismatch: snapshot was taken under {snapshot}, current is {current}")]
    ConfigDigestMismatch { snapshot: String, current: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Complete engine state for one game
///
/// # Example
/// ```
/// use market_sim_core_rs::{GameConfig, GameState, TeamId, TeamProfile, TeamRoster};
///
/// let roster = TeamRoster::new(vec![
///     TeamProfile::new(TeamId(1), "Alpha", 10),
///     TeamProfile::new(TeamId(2), "Beta", 10),
/// ]);
/// let state = GameState::new(GameConfig::default(), roster).unwrap();
/// assert_eq!(state.roster().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    config: GameConfig,
    roster: TeamRoster,
    bids: BidBook,
    /// Financial records, keyed period -> team
    records: BTreeMap<Period, BTreeMap<TeamId, FinancialRecord>>,
    /// Quarters whose liquidation has already run
    liquidated_quarters: BTreeSet<u8>,
    events: EventLog,
}

impl GameState {
    /// Create state for a fresh game; the config is validated up front
    pub fn new(config: GameConfig, roster: TeamRoster) -> Result<Self, StateError> {
        config.validate()?;
        Ok(Self {
            config,
            roster,
            bids: BidBook::new(),
            records: BTreeMap::new(),
            liquidated_quarters: BTreeSet::new(),
            events: EventLog::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn roster(&self) -> &TeamRoster {
        &self.roster
    }

    pub fn bids(&self) -> &BidBook {
        &self.bids
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub(crate) fn bids_mut(&mut self) -> &mut BidBook {
        &mut self.bids
    }

    pub(crate) fn push_event(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    // ------------------------------------------------------------------
    // Bid submission (validated against the roster and config)
    // ------------------------------------------------------------------

    /// Submit a team's monthly plan: RM bid plus fleet count
    ///
    /// The fleet count takes effect for this month's settlement. A repeat
    /// submission replaces the earlier plan.
    pub fn submit_plan(
        &mut self,
        period: Period,
        team: TeamId,
        bid_price: i64,
        bid_volume: i64,
        fleet_count: i64,
    ) -> Result<(), BidError> {
        if !self.roster.contains(team) {
            return Err(BidError::UnknownTeam(team));
        }
        if fleet_count < 0 {
            return Err(TeamError::NegativeFleetCount(fleet_count).into());
        }
        self.bids
            .submit_rm(period, team, bid_price, bid_volume, &self.config)?;
        self.roster.set_fleet_base_count(team, fleet_count)?;
        Ok(())
    }

    /// Submit or replace a team's ask for one customer in a month
    pub fn submit_customer_bid(
        &mut self,
        period: Period,
        team: TeamId,
        customer: CustomerId,
        ask_price: i64,
        ask_qty: i64,
    ) -> Result<(), BidError> {
        if !self.roster.contains(team) {
            return Err(BidError::UnknownTeam(team));
        }
        self.bids
            .submit_customer(period, team, customer, ask_price, ask_qty, &self.config)
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    pub fn record(&self, team: TeamId, period: Period) -> Option<&FinancialRecord> {
        self.records.get(&period).and_then(|m| m.get(&team))
    }

    /// A month's records in ascending team order
    pub fn month_records(&self, period: Period) -> Vec<&FinancialRecord> {
        self.records
            .get(&period)
            .map(|m| m.values().collect())
            .unwrap_or_default()
    }

    /// All records in chronological order, teams ascending within a month
    pub fn all_records(&self) -> impl Iterator<Item = &FinancialRecord> {
        self.records.values().flat_map(|m| m.values())
    }

    pub(crate) fn insert_record(&mut self, record: FinancialRecord) {
        self.records
            .entry(record.period)
            .or_default()
            .insert(record.team, record);
    }

    pub(crate) fn record_mut(
        &mut self,
        team: TeamId,
        period: Period,
    ) -> Option<&mut FinancialRecord> {
        self.records.get_mut(&period).and_then(|m| m.get_mut(&team))
    }

    // ------------------------------------------------------------------
    // Liquidation markers
    // ------------------------------------------------------------------

    pub fn is_quarter_liquidated(&self, quarter: u8) -> bool {
        self.liquidated_quarters.contains(&quarter)
    }

    pub(crate) fn mark_quarter_liquidated(&mut self, quarter: u8) {
        self.liquidated_quarters.insert(quarter);
    }

    // ------------------------------------------------------------------
    // Bid queries delegated to the book
    // ------------------------------------------------------------------

    pub fn rm_bid(&self, period: Period, team: TeamId) -> Option<&RmBid> {
        self.bids.rm_bid(period, team)
    }

    pub fn customer_wins(&self, period: Period, team: TeamId) -> Vec<&CustomerBid> {
        self.bids.customer_wins(period, team)
    }

    pub fn sales_volume(&self, period: Period, team: TeamId) -> i64 {
        self.bids.sales_volume(period, team)
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Capture the full state plus a config digest guard
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            config_hash: self.config.digest(),
            state: self.clone(),
        }
    }
}

/// A restorable snapshot of the complete game state
///
/// The embedded config digest guards against restoring a snapshot into an
/// engine built with different constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// SHA-256 hex digest of the snapshot's config
    pub config_hash: String,
    /// The state itself (including its config)
    pub state: GameState,
}

impl StateSnapshot {
    /// Rebuild the game state, verifying the config digest
    pub fn restore(self) -> Result<GameState, StateError> {
        let current = self.state.config.digest();
        if current != self.config_hash {
            return Err(StateError::ConfigDigestMismatch {
                snapshot: self.config_hash,
                current,
            });
        }
        Ok(self.state)
    }
}
