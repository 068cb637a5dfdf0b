//! Quarter-end liquidation
//!
//! When a quarter closes, each team's unsold RM is salvaged at the quarter's
//! floor price — the lowest bid anyone submitted in the third month's RM
//! round (zero if nobody bid, in which case nothing is credited). The credit
//! lands on the team's third-month record in place: revenue, EBITDA and
//! closing cash all rise by `remaining * price`, the salvaged volume leaves
//! the closing RM balance (sold inventory cannot also carry into the next
//! quarter), and the amount is mirrored in the record's `liquidation_credit`
//! field.
//!
//! Liquidation runs at most once per quarter. The ledger tracks a marker per
//! liquidated quarter; a second run is rejected, as is any later attempt to
//! re-settle a month of the quarter (which would silently drop the credit).

use crate::core::period::Period;
use crate::models::event::EngineEvent;
use crate::models::record::LiquidationCredit;
use crate::models::state::GameState;
use crate::settlement::SettlementError;

/// Salvage every team's unsold RM for a closed quarter
///
/// Preconditions: the quarter's third month has settled records for every
/// team, and the quarter has not been liquidated before. Returns the credit
/// lines actually applied (teams with no remaining RM, or a zero floor
/// price, get none).
pub fn liquidate_quarter(
    state: &mut GameState,
    quarter: u8,
) -> Result<Vec<LiquidationCredit>, SettlementError> {
    if state.is_quarter_liquidated(quarter) {
        return Err(SettlementError::QuarterAlreadyLiquidated(quarter));
    }
    let close_month = Period::new(quarter, 3);
    for team in state.roster().ids() {
        if state.record(team, close_month).is_none() {
            return Err(SettlementError::FinalMonthNotSettled {
                quarter,
                team,
                period: close_month,
            });
        }
    }

    let liquidation_price = state.bids().min_rm_bid_price(close_month).unwrap_or(0);
    let teams: Vec<_> = state.roster().ids().collect();

    let mut credits = Vec::new();
    for team in teams {
        let allocated = state.bids().quarter_rm_allocated(team, quarter);
        let sold = state.bids().quarter_sales_volume(team, quarter);
        let remaining = (allocated - sold).max(0);
        if remaining == 0 || liquidation_price == 0 {
            continue;
        }

        let credit = remaining * liquidation_price;
        let record = state
            .record_mut(team, close_month)
            .ok_or(SettlementError::FinalMonthNotSettled {
                quarter,
                team,
                period: close_month,
            })?;
        record.revenue += credit;
        record.ebitda += credit;
        record.cash_closing += credit;
        record.rm_closing_balance = (record.rm_closing_balance - remaining).max(0);
        record.liquidation_credit = credit;

        credits.push(LiquidationCredit {
            team,
            quarter,
            remaining_volume: remaining,
            unit_price: liquidation_price,
            credit,
        });
    }

    state.mark_quarter_liquidated(quarter);
    state.push_event(EngineEvent::QuarterLiquidated {
        quarter,
        num_credits: credits.len(),
        total_credit: credits.iter().map(|c| c.credit).sum(),
    });
    Ok(credits)
}
