//! Allocation engines
//!
//! Two auctions run per month: the RM rationing auction (price descending,
//! rank-factor rationing) and four independent customer auctions (price
//! ascending, demand filling). The pure allocators live in `ranking` and
//! `auction`; the batch runners here freeze the round, run the allocator,
//! verify invariants and write results back to the bid book.
//!
//! # Critical Invariants
//!
//! 1. Ranks in a batch are a dense 1..=N permutation
//! 2. Allocated volume is within [0, requested volume]
//! 3. A customer's granted volume never exceeds its demand, and matches it
//!    exactly whenever the asks cover it
//!
//! Violations mean an allocator bug: the whole batch fails loudly and no
//! results are written back.

pub mod auction;
pub mod ranking;

pub use auction::{fill_customer_demand, AuctionAllocation};
pub use ranking::{allocate_ranked, RankedAllocation};

use crate::core::period::Period;
use crate::models::bid::BidError;
use crate::models::event::EngineEvent;
use crate::models::state::GameState;
use thiserror::Error;

/// Errors from allocation batch runs
#[derive(Debug, Error, PartialEq)]
pub enum AllocationError {
    /// The round's allocation has already run; rounds allocate exactly once
    #[error("round {period} has already been allocated")]
    AlreadyAllocated { period: Period },

    /// An allocator produced an impossible result; the batch is aborted
    #[error("allocation invariant violated: {detail}")]
    InvariantViolation { detail: String },

    #[error(transparent)]
    Bid(#[from] BidError),
}

/// Check that a batch's ranks form a dense 1..=N permutation and that every
/// grant is within bounds
fn verify_batch(
    entries: impl Iterator<Item = (u32, i64, i64)>,
) -> Result<(), AllocationError> {
    let mut ranks = Vec::new();
    for (rank, requested, allocated) in entries {
        if allocated < 0 || allocated > requested {
            return Err(AllocationError::InvariantViolation {
                detail: format!(
                    "allocated volume {allocated} outside [0, {requested}] at rank {rank}"
                ),
            });
        }
        ranks.push(rank);
    }
    ranks.sort_unstable();
    for (i, rank) in ranks.iter().enumerate() {
        if *rank != i as u32 + 1 {
            return Err(AllocationError::InvariantViolation {
                detail: format!("ranks are not a dense permutation: saw {rank} at position {i}"),
            });
        }
    }
    Ok(())
}

/// Run the month's RM auction: freeze the round, rank and ration every bid,
/// write results back
///
/// Exactly-once per round: a second call fails with `AlreadyAllocated`.
/// A month nobody bid in still freezes (empty result), so settlement can
/// tell "auction ran, no bids" from "auction never ran".
pub fn run_rm_allocation(
    state: &mut GameState,
    period: Period,
) -> Result<Vec<RankedAllocation>, AllocationError> {
    if state.bids().is_rm_round_frozen(period) {
        return Err(AllocationError::AlreadyAllocated { period });
    }

    let bids: Vec<_> = state.bids().rm_bids(period).into_iter().cloned().collect();
    let factors = state.config().rank_allocation_factors_bps.clone();
    let results = allocate_ranked(&bids, &factors);

    verify_batch(
        results
            .iter()
            .map(|r| (r.rank, r.volume, r.allocated_volume)),
    )?;

    state.bids_mut().freeze_rm_round(period);
    for result in &results {
        state
            .bids_mut()
            .set_rm_allocation(period, result.team, result.rank, result.allocated_volume)?;
    }

    state.push_event(EngineEvent::RmAllocated {
        period,
        num_bids: results.len(),
        total_allocated: results.iter().map(|r| r.allocated_volume).sum(),
    });
    Ok(results)
}

/// Run the month's customer auctions: freeze the round, fill each customer's
/// demand independently, write results back
///
/// Demand per customer is its share of `team_count * market_unit_per_team`.
/// Exactly-once per round, like the RM side.
pub fn run_customer_auction(
    state: &mut GameState,
    period: Period,
) -> Result<Vec<AuctionAllocation>, AllocationError> {
    if state.bids().is_customer_round_frozen(period) {
        return Err(AllocationError::AlreadyAllocated { period });
    }

    let customers = state.config().customers.clone();
    let total_market = state.config().total_market(state.roster().len());

    let mut all_results = Vec::new();
    for customer in &customers {
        let bids: Vec<_> = state
            .bids()
            .customer_bids_for(period, customer.id)
            .into_iter()
            .cloned()
            .collect();
        if bids.is_empty() {
            continue;
        }
        let demand = customer.demand(total_market);
        let results = fill_customer_demand(&bids, demand);

        verify_batch(
            results
                .iter()
                .map(|r| (r.rank, r.ask_qty, r.allocated_volume)),
        )?;
        let granted: i64 = results.iter().map(|r| r.allocated_volume).sum();
        let asked: i64 = results.iter().map(|r| r.ask_qty).sum();
        if granted > demand || (asked >= demand && granted != demand) {
            return Err(AllocationError::InvariantViolation {
                detail: format!(
                    "customer {} granted {granted} of demand {demand} with {asked} asked",
                    customer.id
                ),
            });
        }

        all_results.extend(results);
    }

    state.bids_mut().freeze_customer_round(period);
    for result in &all_results {
        state.bids_mut().set_customer_allocation(
            period,
            result.team,
            result.customer,
            result.rank,
            result.allocated_volume,
        )?;
    }

    state.push_event(EngineEvent::CustomerAllocated {
        period,
        num_bids: all_results.len(),
        total_market,
        total_allocated: all_results.iter().map(|r| r.allocated_volume).sum(),
    });
    Ok(all_results)
}
