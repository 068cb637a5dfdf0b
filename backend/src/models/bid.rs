//! Bids and bidding rounds
//!
//! Two bid families, both keyed by period: RM plan bids (one per team per
//! month) and customer auction bids (one per team per customer per month).
//! Submission is an idempotent upsert — a later bid for the same key fully
//! replaces the earlier one, including any stale allocation result.
//!
//! A round freezes when its allocation runs. Frozen rounds reject further
//! submissions and hold the written-back rank and allocated volume.
//!
//! # Critical Invariants
//!
//! 1. At most one RM bid per (period, team); at most one customer bid per
//!    (period, team, customer)
//! 2. Rank and allocated volume are `None` until the round's allocation has
//!    run, then `Some` for every bid in the round
//! 3. Frozen rounds never change except through allocation write-back

use crate::core::config::GameConfig;
use crate::core::period::Period;
use crate::models::customer::CustomerId;
use crate::models::team::{TeamError, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised at bid submission
#[derive(Debug, Error, PartialEq)]
pub enum BidError {
    #[error("unknown team: {0}")]
    UnknownTeam(TeamId),

    #[error("bid price {price} is below the minimum of {min}")]
    PriceBelowMinimum { price: i64, min: i64 },

    #[error("bid price {price} exceeds the cap of {max}")]
    PriceAboveMaximum { price: i64, max: i64 },

    #[error("bid volume {volume} must be within 1..={max}")]
    VolumeOutOfRange { volume: i64, max: i64 },

    #[error("ask price must be positive, got {0}")]
    NonPositivePrice(i64),

    #[error("ask quantity must be positive, got {0}")]
    NonPositiveQuantity(i64),

    #[error("total ask quantity {requested} exceeds monthly capacity of {capacity}")]
    MonthlyCapacityExceeded { requested: i64, capacity: i64 },

    #[error("round {period} is frozen, bidding is closed")]
    RoundFrozen { period: Period },

    #[error("no bid found for {team} in {period}")]
    UnknownBid { team: TeamId, period: Period },

    #[error(transparent)]
    Team(#[from] TeamError),
}

/// One team's monthly RM plan bid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmBid {
    pub team: TeamId,
    /// Offered price, paise per m3
    pub price: i64,
    /// Requested volume, m3
    pub volume: i64,
    /// 1-based auction rank, set by allocation
    pub rank: Option<u32>,
    /// Granted volume, set by allocation
    pub allocated_volume: Option<i64>,
}

/// One team's ask for one customer in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerBid {
    pub team: TeamId,
    pub customer: CustomerId,
    /// Asking price, paise per m3
    pub ask_price: i64,
    /// Offered quantity, m3
    pub ask_qty: i64,
    /// 1-based rank within this customer's auction
    pub rank: Option<u32>,
    /// Granted sales volume, set by allocation
    pub allocated_volume: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct RmRound {
    bids: BTreeMap<TeamId, RmBid>,
    frozen: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct CustomerRound {
    /// Per-customer asks, each keyed by team
    bids: BTreeMap<CustomerId, BTreeMap<TeamId, CustomerBid>>,
    frozen: bool,
}

/// All bid rounds of the game, past and open
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BidBook {
    rm_rounds: BTreeMap<Period, RmRound>,
    customer_rounds: BTreeMap<Period, CustomerRound>,
}

impl BidBook {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Submission (upsert + validation)
    // ------------------------------------------------------------------

    /// Upsert a team's RM bid for a month
    ///
    /// Validation mirrors the bid form: price within the configured band,
    /// volume within one month of production capacity. Replacing an earlier
    /// bid clears its allocation result.
    pub fn submit_rm(
        &mut self,
        period: Period,
        team: TeamId,
        price: i64,
        volume: i64,
        config: &GameConfig,
    ) -> Result<(), BidError> {
        if price < config.min_rm_bid_price {
            return Err(BidError::PriceBelowMinimum {
                price,
                min: config.min_rm_bid_price,
            });
        }
        if price > config.max_rm_bid_price {
            return Err(BidError::PriceAboveMaximum {
                price,
                max: config.max_rm_bid_price,
            });
        }
        if volume <= 0 || volume > config.max_rm_bid_volume {
            return Err(BidError::VolumeOutOfRange {
                volume,
                max: config.max_rm_bid_volume,
            });
        }

        let round = self.rm_rounds.entry(period).or_default();
        if round.frozen {
            return Err(BidError::RoundFrozen { period });
        }
        round.bids.insert(
            team,
            RmBid {
                team,
                price,
                volume,
                rank: None,
                allocated_volume: None,
            },
        );
        Ok(())
    }

    /// Upsert a team's ask for one customer in a month
    ///
    /// The team's total ask quantity across all four customers may not exceed
    /// the monthly production capacity.
    pub fn submit_customer(
        &mut self,
        period: Period,
        team: TeamId,
        customer: CustomerId,
        ask_price: i64,
        ask_qty: i64,
        config: &GameConfig,
    ) -> Result<(), BidError> {
        if ask_price <= 0 {
            return Err(BidError::NonPositivePrice(ask_price));
        }
        if ask_qty <= 0 {
            return Err(BidError::NonPositiveQuantity(ask_qty));
        }

        let round = self.customer_rounds.entry(period).or_default();
        if round.frozen {
            return Err(BidError::RoundFrozen { period });
        }

        // Capacity check over the bids that would remain after this upsert
        let other_qty: i64 = round
            .bids
            .iter()
            .filter(|(c, _)| **c != customer)
            .filter_map(|(_, by_team)| by_team.get(&team))
            .map(|b| b.ask_qty)
            .sum();
        let requested = other_qty + ask_qty;
        if requested > config.max_monthly_sales_volume {
            return Err(BidError::MonthlyCapacityExceeded {
                requested,
                capacity: config.max_monthly_sales_volume,
            });
        }

        round.bids.entry(customer).or_default().insert(
            team,
            CustomerBid {
                team,
                customer,
                ask_price,
                ask_qty,
                rank: None,
                allocated_volume: None,
            },
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Freezing and allocation write-back
    // ------------------------------------------------------------------

    /// Freeze a month's RM round (creating an empty round if nobody bid).
    /// Returns whether the round was already frozen.
    pub fn freeze_rm_round(&mut self, period: Period) -> bool {
        let round = self.rm_rounds.entry(period).or_default();
        std::mem::replace(&mut round.frozen, true)
    }

    /// Freeze a month's customer round (creating an empty round if nobody
    /// bid). Returns whether the round was already frozen.
    pub fn freeze_customer_round(&mut self, period: Period) -> bool {
        let round = self.customer_rounds.entry(period).or_default();
        std::mem::replace(&mut round.frozen, true)
    }

    pub fn is_rm_round_frozen(&self, period: Period) -> bool {
        self.rm_rounds.get(&period).map(|r| r.frozen).unwrap_or(false)
    }

    pub fn is_customer_round_frozen(&self, period: Period) -> bool {
        self.customer_rounds
            .get(&period)
            .map(|r| r.frozen)
            .unwrap_or(false)
    }

    /// Write an RM allocation result back onto the frozen bid
    pub fn set_rm_allocation(
        &mut self,
        period: Period,
        team: TeamId,
        rank: u32,
        allocated_volume: i64,
    ) -> Result<(), BidError> {
        let bid = self
            .rm_rounds
            .get_mut(&period)
            .and_then(|r| r.bids.get_mut(&team))
            .ok_or(BidError::UnknownBid { team, period })?;
        bid.rank = Some(rank);
        bid.allocated_volume = Some(allocated_volume);
        Ok(())
    }

    /// Write a customer auction result back onto the frozen bid
    pub fn set_customer_allocation(
        &mut self,
        period: Period,
        team: TeamId,
        customer: CustomerId,
        rank: u32,
        allocated_volume: i64,
    ) -> Result<(), BidError> {
        let bid = self
            .customer_rounds
            .get_mut(&period)
            .and_then(|r| r.bids.get_mut(&customer))
            .and_then(|by_team| by_team.get_mut(&team))
            .ok_or(BidError::UnknownBid { team, period })?;
        bid.rank = Some(rank);
        bid.allocated_volume = Some(allocated_volume);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// A month's RM bids in ascending team order
    pub fn rm_bids(&self, period: Period) -> Vec<&RmBid> {
        self.rm_rounds
            .get(&period)
            .map(|r| r.bids.values().collect())
            .unwrap_or_default()
    }

    /// One team's RM bid for a month, if submitted
    pub fn rm_bid(&self, period: Period, team: TeamId) -> Option<&RmBid> {
        self.rm_rounds.get(&period).and_then(|r| r.bids.get(&team))
    }

    /// Highest RM bid price of the month (drives the spot price)
    pub fn max_rm_bid_price(&self, period: Period) -> Option<i64> {
        self.rm_rounds
            .get(&period)
            .and_then(|r| r.bids.values().map(|b| b.price).max())
    }

    /// Lowest RM bid price of the month (drives liquidation valuation)
    pub fn min_rm_bid_price(&self, period: Period) -> Option<i64> {
        self.rm_rounds
            .get(&period)
            .and_then(|r| r.bids.values().map(|b| b.price).min())
    }

    /// A month's asks for one customer, ascending team order
    pub fn customer_bids_for(&self, period: Period, customer: CustomerId) -> Vec<&CustomerBid> {
        self.customer_rounds
            .get(&period)
            .and_then(|r| r.bids.get(&customer))
            .map(|by_team| by_team.values().collect())
            .unwrap_or_default()
    }

    /// A team's winning customer bids for a month (allocated volume > 0)
    pub fn customer_wins(&self, period: Period, team: TeamId) -> Vec<&CustomerBid> {
        self.customer_rounds
            .get(&period)
            .map(|r| {
                r.bids
                    .values()
                    .filter_map(|by_team| by_team.get(&team))
                    .filter(|b| b.allocated_volume.unwrap_or(0) > 0)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A team's total allocated sales volume for a month
    pub fn sales_volume(&self, period: Period, team: TeamId) -> i64 {
        self.customer_wins(period, team)
            .iter()
            .map(|b| b.allocated_volume.unwrap_or(0))
            .sum()
    }

    /// A team's total allocated RM volume across a quarter
    pub fn quarter_rm_allocated(&self, team: TeamId, quarter: u8) -> i64 {
        Period::months_of_quarter(quarter)
            .iter()
            .filter_map(|p| self.rm_bid(*p, team))
            .map(|b| b.allocated_volume.unwrap_or(0))
            .sum()
    }

    /// A team's total allocated sales volume across a quarter
    pub fn quarter_sales_volume(&self, team: TeamId, quarter: u8) -> i64 {
        Period::months_of_quarter(quarter)
            .iter()
            .map(|p| self.sales_volume(*p, team))
            .sum()
    }
}
