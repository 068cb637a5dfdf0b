//! Financial records
//!
//! One `FinancialRecord` per (team, quarter, month), produced by the monthly
//! settlement batch. Records are append-only with a single sanctioned
//! exception: the quarter-end liquidation credit, applied in place to the
//! quarter's third-month record and mirrored in `liquidation_credit` so the
//! adjustment stays auditable.
//!
//! Record ids are deterministic (UUIDv5 over the team-period key) so that
//! recalculating a month with unchanged inputs reproduces records
//! byte-for-byte.

use crate::core::period::Period;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The accrual and cash outcome of one team-month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// Deterministic record identity
    pub id: Uuid,
    pub team: TeamId,
    pub period: Period,

    /// Total volume sold across customers this month (m3)
    pub sales_volume: i64,
    /// Revenue recognized this month (paise)
    pub revenue: i64,
    /// RM consumption plus carrying and shortage charges (paise, accrual)
    pub rm_cost_accrued: i64,
    /// Transport cost, base fleet plus hired extras (paise)
    pub tm_cost: i64,
    /// Tiered production cost (paise)
    pub production_cost: i64,
    /// Fixed monthly overhead (paise)
    pub other_expenses: i64,
    /// revenue - rm_cost_accrued - tm_cost - production_cost - other_expenses
    pub ebitda: i64,

    /// Opening cash, previous month's closing (paise)
    pub cash_opening: i64,
    /// Closing cash after inflows, outflows and interest (paise)
    pub cash_closing: i64,
    /// Revenue on deferred payment terms, not yet collected (paise)
    pub receivables: i64,
    /// Overdraft interest charged on negative opening cash (paise)
    pub interest_paid: i64,

    /// RM inventory carried in from the previous month (m3)
    pub rm_opening_balance: i64,
    /// RM inventory carried out to the next month (m3), never negative
    pub rm_closing_balance: i64,
    /// Sales volume that had to be covered by spot purchases (m3)
    pub shortage_volume: i64,
    /// Unit price paid for spot coverage (paise), 0 when no shortage
    pub shortage_unit_cost: i64,

    /// Transport units actually deployed (base + extras)
    pub fleet_count_effective: i64,
    /// Hired units beyond the owned fleet
    pub extra_fleet_units: i64,

    /// Quarter-end salvage credit applied to this record (paise);
    /// non-zero only on third-month records after liquidation
    pub liquidation_credit: i64,
}

impl FinancialRecord {
    /// Deterministic id for a team-month record
    pub fn record_id(team: TeamId, period: Period) -> Uuid {
        let key = format!("fin/q{}/m{}/{}", period.quarter(), period.month(), team);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
    }
}

/// One team's quarter-end salvage line, reported by liquidation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationCredit {
    pub team: TeamId,
    pub quarter: u8,
    /// Unsold RM volume salvaged (m3)
    pub remaining_volume: i64,
    /// Valuation price: the quarter's lowest third-month bid (paise per m3)
    pub unit_price: i64,
    /// remaining_volume * unit_price (paise)
    pub credit: i64,
}
