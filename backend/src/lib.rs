//! Market Simulator Core - Rust Engine
//!
//! Deterministic allocation and financial-settlement engine for a turn-based,
//! multi-team trading game: teams bid for a constrained raw-material (RM)
//! supply, compete in per-customer price auctions, and accrue month-over-month
//! accounting state (inventory carry, shortage penalties, tiered production
//! cost, cash flow, overdraft interest, quarter-end liquidation).
//!
//! # Architecture
//!
//! - **core**: Period arithmetic (quarter/month) and game configuration
//! - **models**: Domain types (Team, Customer, Bid, FinancialRecord, GameState)
//! - **allocation**: Ranked rationing (RM) and demand-filling auctions (customers)
//! - **settlement**: Monthly settlement batch and quarter-end liquidation
//! - **reporting**: Read-only EBITDA rollups and the leaderboard
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (paise); all rates are integer basis points
//! 2. Cash continuity: a month's closing cash is the next month's opening cash
//! 3. RM inventory never goes negative; shortfalls are recorded as shortage
//!    volume bought at the spot price
//! 4. Allocation ranks are a dense 1..=N permutation, ties broken by team id
//! 5. Settlement is idempotent: recalculating a month with unchanged inputs
//!    produces identical records

// Module declarations
pub mod allocation;
pub mod core;
pub mod models;
pub mod reporting;
pub mod settlement;

// Re-exports for convenience
pub use crate::core::config::{ConfigError, GameConfig, ProductionTier};
pub use crate::core::period::Period;
pub use allocation::{
    allocate_ranked, fill_customer_demand, run_customer_auction, run_rm_allocation,
    AllocationError, AuctionAllocation, RankedAllocation,
};
pub use models::{
    bid::{BidBook, BidError, CustomerBid, RmBid},
    customer::{Customer, CustomerId},
    event::{EngineEvent, EventLog},
    record::{FinancialRecord, LiquidationCredit},
    state::{GameState, StateError, StateSnapshot},
    team::{TeamId, TeamProfile, TeamRoster},
};
pub use reporting::{cumulative, leaderboard, quarter_ebitda, total_ebitda, LeaderboardEntry};
pub use settlement::{liquidate_quarter, settle_month, SettlementError};
