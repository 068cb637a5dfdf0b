//! Game configuration
//!
//! All constant tables consumed by the allocation and settlement engines:
//! bid caps, the rank-allocation factor table, tiered production rates, fleet
//! costs, seed capital, and the customer catalog.
//!
//! Money is i64 paise, volumes are i64 cubic metres, rates are integer basis
//! points. The config digests to a SHA-256 hash so snapshots can verify they
//! are replayed against identical constants.

use crate::models::customer::{default_catalog, Customer};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Scale divisor for basis-point rates (10_000 bps = 100%)
pub const BPS_SCALE: i64 = 10_000;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("rank allocation factor table must not be empty")]
    EmptyFactorTable,

    #[error("production cost tiers must be non-empty and sorted descending by min_volume")]
    InvalidCostTiers,

    #[error("fleet capacity per unit must be positive, got {0}")]
    InvalidFleetCapacity(i64),

    #[error("customer demand shares must sum to {expected} bps, got {actual}")]
    InvalidCustomerShares { expected: i64, actual: i64 },

    #[error("bid price caps are inverted: min {min} > max {max}")]
    InvertedPriceCaps { min: i64, max: i64 },
}

/// One production cost tier: the rate applies to any sales volume at or
/// above `min_volume` (richer tiers sit at higher thresholds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionTier {
    /// Lowest sales volume (m3) this tier applies to
    pub min_volume: i64,
    /// Production cost per m3 (paise)
    pub unit_cost: i64,
}

/// Complete engine configuration
///
/// # Example
/// ```
/// use market_sim_core_rs::GameConfig;
///
/// let config = GameConfig::default();
/// config.validate().unwrap();
/// assert_eq!(config.allocation_factor_bps(1), 10_000); // rank 1 gets 100%
/// assert_eq!(config.allocation_factor_bps(9), 4_000); // past the table: last entry
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Lowest accepted RM bid price (paise per m3)
    pub min_rm_bid_price: i64,

    /// Highest accepted RM bid price (paise per m3)
    pub max_rm_bid_price: i64,

    /// Highest accepted RM bid volume per month (m3, one month of production capacity)
    pub max_rm_bid_volume: i64,

    /// Cap on a team's total customer ask quantity per month (m3)
    pub max_monthly_sales_volume: i64,

    /// Fraction of requested RM volume granted per auction rank, in bps.
    /// Ranks beyond the table reuse the last entry.
    pub rank_allocation_factors_bps: Vec<i64>,

    /// Tiered production rates, sorted descending by `min_volume`
    pub production_cost_tiers: Vec<ProductionTier>,

    /// Monthly haul capacity of one transport unit (m3)
    pub fleet_capacity_m3: i64,

    /// Monthly cost of one owned transport unit (paise)
    pub fleet_base_unit_cost: i64,

    /// Monthly cost of one hired extra transport unit (paise)
    pub fleet_extra_unit_cost: i64,

    /// Working capital injected at the game's first month (paise)
    pub seed_capital: i64,

    /// Monthly interest on negative opening cash, in bps
    pub overdraft_rate_bps: i64,

    /// Accrual-only carrying charge on unsold RM, in bps of its value
    pub carrying_cost_bps: i64,

    /// Markup over the month's highest RM bid for spot purchases, in bps
    pub spot_markup_bps: i64,

    /// Spot reference price used when a month has no RM bids at all (paise)
    pub fallback_spot_reference_price: i64,

    /// Fixed other expenses per team per month (paise)
    pub monthly_overhead: i64,

    /// Monthly market demand contributed per registered team (m3)
    pub market_unit_per_team: i64,

    /// Fixed customer catalog (4 entries, shares sum to 10_000 bps)
    pub customers: Vec<Customer>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_rm_bid_price: 250_000,           // Rs 2,500 per m3
            max_rm_bid_price: 500_000,           // Rs 5,000 per m3
            max_rm_bid_volume: 50_000,           // one month of production capacity
            max_monthly_sales_volume: 50_000,    // production cap, m3
            rank_allocation_factors_bps: vec![10_000, 9_000, 8_000, 7_000, 4_000],
            production_cost_tiers: vec![
                ProductionTier { min_volume: 40_000, unit_cost: 30_000 }, // Rs 300
                ProductionTier { min_volume: 30_000, unit_cost: 40_000 }, // Rs 400
                ProductionTier { min_volume: 20_000, unit_cost: 50_000 }, // Rs 500
                ProductionTier { min_volume: 10_000, unit_cost: 60_000 }, // Rs 600
                ProductionTier { min_volume: 0, unit_cost: 70_000 },      // Rs 700
            ],
            fleet_capacity_m3: 540,              // 30 days x 3 trips x 6 m3
            fleet_base_unit_cost: 18_000_000,    // Rs 1.8 L per unit per month
            fleet_extra_unit_cost: 25_000_000,   // Rs 2.5 L per hired unit
            seed_capital: 10_000_000_000,        // Rs 10 Cr
            overdraft_rate_bps: 200,             // 2% per month
            carrying_cost_bps: 1_000,            // 10% of surplus RM value
            spot_markup_bps: 1_000,              // spot = highest bid +10%
            fallback_spot_reference_price: 500_000, // Rs 5,000 (= price cap)
            monthly_overhead: 50_000_000,        // Rs 5 L
            market_unit_per_team: 40_000,        // m3 of demand per team
            customers: default_catalog(),
        }
    }
}

impl GameConfig {
    /// Validate internal consistency of the constant tables
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rank_allocation_factors_bps.is_empty() {
            return Err(ConfigError::EmptyFactorTable);
        }
        let tiers_sorted = self
            .production_cost_tiers
            .windows(2)
            .all(|w| w[0].min_volume > w[1].min_volume);
        if self.production_cost_tiers.is_empty() || !tiers_sorted {
            return Err(ConfigError::InvalidCostTiers);
        }
        if self.fleet_capacity_m3 <= 0 {
            return Err(ConfigError::InvalidFleetCapacity(self.fleet_capacity_m3));
        }
        if self.min_rm_bid_price > self.max_rm_bid_price {
            return Err(ConfigError::InvertedPriceCaps {
                min: self.min_rm_bid_price,
                max: self.max_rm_bid_price,
            });
        }
        let share_total: i64 = self.customers.iter().map(|c| c.share_bps).sum();
        if share_total != BPS_SCALE {
            return Err(ConfigError::InvalidCustomerShares {
                expected: BPS_SCALE,
                actual: share_total,
            });
        }
        Ok(())
    }

    /// Allocation factor for a 1-based auction rank, clamping past the table
    pub fn allocation_factor_bps(&self, rank: u32) -> i64 {
        let idx = (rank as usize).saturating_sub(1);
        let table = &self.rank_allocation_factors_bps;
        table.get(idx).or_else(|| table.last()).copied().unwrap_or(0)
    }

    /// Production rate for a month's sales volume: highest tier threshold
    /// not exceeding the volume (the bottom tier when none matches)
    pub fn production_rate_for(&self, sales_volume: i64) -> i64 {
        let tiers = &self.production_cost_tiers;
        tiers
            .iter()
            .find(|t| sales_volume >= t.min_volume)
            .or_else(|| tiers.last())
            .map(|t| t.unit_cost)
            .unwrap_or(0)
    }

    /// Spot price for shortfall purchases: the month's highest RM bid plus
    /// the configured markup, or the fallback reference when nobody bid
    pub fn spot_price(&self, max_bid_this_month: Option<i64>) -> i64 {
        let base = max_bid_this_month.unwrap_or(self.fallback_spot_reference_price);
        base * (BPS_SCALE + self.spot_markup_bps) / BPS_SCALE
    }

    /// Total monthly market demand for a roster of `team_count` teams (m3)
    pub fn total_market(&self, team_count: usize) -> i64 {
        self.market_unit_per_team * team_count as i64
    }

    /// SHA-256 hex digest of the canonical JSON form, embedded in state
    /// snapshots to guard replays against drifted constants
    pub fn digest(&self) -> String {
        let canonical =
            serde_json::to_vec(self).expect("config serialization cannot fail");
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        format!("{:x}", hasher.finalize())
    }
}
