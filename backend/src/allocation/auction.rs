//! Customer demand-filling auctions
//!
//! Each of the four customers runs its own independent single-good auction
//! every month: cheapest ask wins, demand is filled down the price ladder
//! until it runs out. There is no combinatorial coupling between customers.
//!
//! Pure function over one customer's bids — the reverse sort of the RM
//! auction (ascending price, lower team id wins ties).

use crate::models::bid::CustomerBid;
use crate::models::customer::CustomerId;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// One bid's outcome in a customer auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionAllocation {
    pub team: TeamId,
    pub customer: CustomerId,
    pub ask_price: i64,
    pub ask_qty: i64,
    /// Dense 1-based rank after the price-ascending sort
    pub rank: u32,
    /// min(ask_qty, demand remaining when this bid's turn came)
    pub allocated_volume: i64,
}

/// Fill one customer's demand from its month's asks
///
/// Sort is ask price ascending with ascending-team-id tie-break. Walking the
/// sorted list, each bid receives `min(ask_qty, remaining)`; once demand is
/// exhausted every later bid receives zero.
///
/// # Example
/// ```
/// use market_sim_core_rs::{fill_customer_demand, CustomerBid, CustomerId, TeamId};
///
/// let bid = |team, price, qty| CustomerBid {
///     team: TeamId(team), customer: CustomerId::Laddu,
///     ask_price: price, ask_qty: qty, rank: None, allocated_volume: None,
/// };
/// let results = fill_customer_demand(&[bid(1, 10, 600), bid(2, 12, 600)], 1_000);
/// assert_eq!(results[0].allocated_volume, 600);
/// assert_eq!(results[1].allocated_volume, 400); // partial fill
/// ```
pub fn fill_customer_demand(bids: &[CustomerBid], customer_demand: i64) -> Vec<AuctionAllocation> {
    let mut sorted: Vec<&CustomerBid> = bids.iter().collect();
    sorted.sort_by(|a, b| a.ask_price.cmp(&b.ask_price).then(a.team.cmp(&b.team)));

    let mut remaining = customer_demand.max(0);
    sorted
        .iter()
        .enumerate()
        .map(|(index, bid)| {
            let allocated = bid.ask_qty.min(remaining);
            remaining -= allocated;
            AuctionAllocation {
                team: bid.team,
                customer: bid.customer,
                ask_price: bid.ask_price,
                ask_qty: bid.ask_qty,
                rank: index as u32 + 1,
                allocated_volume: allocated,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(team: u32, price: i64, qty: i64) -> CustomerBid {
        CustomerBid {
            team: TeamId(team),
            customer: CustomerId::LemonTea,
            ask_price: price,
            ask_qty: qty,
            rank: None,
            allocated_volume: None,
        }
    }

    #[test]
    fn demand_fills_down_the_price_ladder() {
        let results = fill_customer_demand(&[bid(1, 10, 600), bid(2, 12, 600), bid(3, 15, 200)], 1_000);
        assert_eq!(results[0].allocated_volume, 600);
        assert_eq!(results[1].allocated_volume, 400);
        assert_eq!(results[2].allocated_volume, 0);
    }

    #[test]
    fn cheapest_ask_wins_and_ties_break_by_team() {
        let results = fill_customer_demand(&[bid(4, 10, 300), bid(2, 10, 300), bid(1, 11, 300)], 500);
        assert_eq!(results[0].team, TeamId(2));
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[0].allocated_volume, 300);
        assert_eq!(results[1].team, TeamId(4));
        assert_eq!(results[1].allocated_volume, 200);
        assert_eq!(results[2].team, TeamId(1));
        assert_eq!(results[2].allocated_volume, 0);
    }

    #[test]
    fn undersubscribed_demand_leaves_slack() {
        let results = fill_customer_demand(&[bid(1, 10, 200)], 1_000);
        assert_eq!(results[0].allocated_volume, 200);
    }

    #[test]
    fn zero_demand_grants_nothing() {
        let results = fill_customer_demand(&[bid(1, 10, 200)], 0);
        assert_eq!(results[0].allocated_volume, 0);
    }
}
