//! RM ranked rationing
//!
//! The monthly RM auction is rationed by rank: every bidder receives a fixed
//! fraction of the volume it asked for, the fraction falling with auction
//! rank. Highest price wins rank 1; price ties resolve to the lower team id,
//! deterministically, never by submission order.
//!
//! Pure function — no validation, no side effects. Callers validate bids at
//! submission and write results back to the book.

use crate::core::config::BPS_SCALE;
use crate::models::bid::RmBid;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// One bid's outcome in the RM auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAllocation {
    pub team: TeamId,
    pub price: i64,
    pub volume: i64,
    /// Dense 1-based rank after the price-descending sort
    pub rank: u32,
    /// Fraction of the requested volume granted, in bps
    pub factor_bps: i64,
    /// floor(volume * factor)
    pub allocated_volume: i64,
}

/// Rank a month's RM bids and ration each by its rank factor
///
/// Sort is price descending with ascending-team-id tie-break. A rank past
/// the factor table reuses the table's last entry rather than erroring.
///
/// # Example
/// ```
/// use market_sim_core_rs::{allocate_ranked, RmBid, TeamId};
///
/// let bids = vec![
///     RmBid { team: TeamId(1), price: 3_000, volume: 10_000, rank: None, allocated_volume: None },
///     RmBid { team: TeamId(2), price: 2_800, volume: 5_000, rank: None, allocated_volume: None },
/// ];
/// let results = allocate_ranked(&bids, &[10_000, 9_000, 8_000, 7_000, 4_000]);
/// assert_eq!(results[0].team, TeamId(1));
/// assert_eq!(results[0].allocated_volume, 10_000); // rank 1 at 100%
/// assert_eq!(results[1].allocated_volume, 4_500); // rank 2 at 90%
/// ```
pub fn allocate_ranked(bids: &[RmBid], factors_bps: &[i64]) -> Vec<RankedAllocation> {
    let mut sorted: Vec<&RmBid> = bids.iter().collect();
    sorted.sort_by(|a, b| b.price.cmp(&a.price).then(a.team.cmp(&b.team)));

    sorted
        .iter()
        .enumerate()
        .map(|(index, bid)| {
            let factor_bps = factors_bps
                .get(index)
                .or_else(|| factors_bps.last())
                .copied()
                .unwrap_or(0);
            RankedAllocation {
                team: bid.team,
                price: bid.price,
                volume: bid.volume,
                rank: index as u32 + 1,
                factor_bps,
                allocated_volume: bid.volume * factor_bps / BPS_SCALE,
            }
        })
        .collect()
}
