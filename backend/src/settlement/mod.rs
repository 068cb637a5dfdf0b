//! Settlement Module
//!
//! The accounting half of the engine:
//! - Monthly settlement: turns a month's frozen allocations plus carried
//!   inventory/cash state into one immutable financial record per team
//! - Quarter liquidation: salvages unsold RM at quarter close as a one-time
//!   credit to the quarter's third-month records
//!
//! # Critical Invariants
//!
//! 1. **Cash continuity**: a month's closing cash is the next month's
//!    opening cash (seed capital only at the game's very first month)
//! 2. **Inventory non-negativity**: RM closing balance never goes below
//!    zero; excess sales become shortage volume bought at spot
//! 3. **Idempotence**: re-settling a month with unchanged inputs replaces
//!    its records with identical ones
//! 4. **Ordering**: settlement requires the prior month settled and the
//!    month's rounds frozen; liquidation runs at most once per quarter,
//!    after which the quarter's months cannot be re-settled

pub mod liquidation;
pub mod monthly;

pub use liquidation::liquidate_quarter;
pub use monthly::settle_month;

use crate::core::period::Period;
use crate::models::team::TeamId;
use thiserror::Error;

/// Errors from settlement and liquidation batches
///
/// All of these are caller-ordering problems, not recoverable data
/// conditions: a missing bid is *not* an error (it settles as a spot
/// purchase), but settling months out of sequence would corrupt the
/// continuity invariants and is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum SettlementError {
    #[error("cannot settle {period}: {team} has no record for the prior month {prior}")]
    MissingPriorRecord {
        period: Period,
        team: TeamId,
        prior: Period,
    },

    #[error("cannot settle {period}: its bidding rounds have not been allocated yet")]
    RoundStillOpen { period: Period },

    #[error("cannot re-settle {period}: quarter {quarter} has already been liquidated")]
    QuarterLiquidated { period: Period, quarter: u8 },

    #[error("quarter {0} has already been liquidated")]
    QuarterAlreadyLiquidated(u8),

    #[error("cannot liquidate quarter {quarter}: {team} has no settled record for {period}")]
    FinalMonthNotSettled {
        quarter: u8,
        team: TeamId,
        period: Period,
    },
}
