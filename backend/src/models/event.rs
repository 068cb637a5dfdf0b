//! Engine event log
//!
//! Every batch operation appends a typed event: allocations running, months
//! settling, quarters liquidating. The log is the engine's audit trail —
//! downstream orchestration can replay or inspect it without the engine
//! owning any logging transport.

use crate::core::period::Period;
use serde::{Deserialize, Serialize};

/// A state-changing batch operation, with enough fields to audit it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// RM round closed for bidding and ranked
    RmAllocated {
        period: Period,
        num_bids: usize,
        total_allocated: i64,
    },

    /// Customer round closed and all per-customer auctions filled
    CustomerAllocated {
        period: Period,
        num_bids: usize,
        total_market: i64,
        total_allocated: i64,
    },

    /// Monthly settlement batch completed (possibly a recalculation)
    MonthSettled {
        period: Period,
        num_teams: usize,
        total_ebitda: i64,
    },

    /// Quarter-end salvage of unsold RM applied to third-month records
    QuarterLiquidated {
        quarter: u8,
        num_credits: usize,
        total_credit: i64,
    },
}

impl EngineEvent {
    /// Short tag for grouping and counting
    pub fn kind(&self) -> &'static str {
        match self {
            EngineEvent::RmAllocated { .. } => "rm_allocated",
            EngineEvent::CustomerAllocated { .. } => "customer_allocated",
            EngineEvent::MonthSettled { .. } => "month_settled",
            EngineEvent::QuarterLiquidated { .. } => "quarter_liquidated",
        }
    }
}

/// Append-only event history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<EngineEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of logged events of one kind
    pub fn count_kind(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}
