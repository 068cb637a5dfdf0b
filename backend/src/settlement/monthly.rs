//! Monthly settlement
//!
//! The core accounting step. For every team it consumes the month's frozen
//! allocations plus the prior month's carried state and produces one
//! financial record: accrual P&L (revenue, RM consumption with carrying and
//! shortage charges, transport, tiered production, overhead, EBITDA) and
//! cash treasury (opening/closing walk with overdraft interest).
//!
//! Settlement is a full recalculation: it replaces any records already
//! written for the month, so a retry with unchanged inputs reproduces them
//! exactly.
//!
//! A team with no RM bid is not an error. It resolves to the explicit no-bid
//! policy: zero allocated volume, with consumption and any shortfall bought
//! at the month's spot price, through the same code path as every other
//! team.

use crate::core::config::{GameConfig, BPS_SCALE};
use crate::core::period::Period;
use crate::models::bid::RmBid;
use crate::models::event::EngineEvent;
use crate::models::record::FinancialRecord;
use crate::models::state::GameState;
use crate::models::team::TeamId;
use crate::settlement::SettlementError;

/// A team's RM standing for the month, with the no-bid fallback resolved
///
/// `unit_price` values consumption and carrying; with no bid it is the spot
/// price and `allocated_volume` is zero, so the no-bid team buys everything
/// it sells at spot.
#[derive(Debug, Clone, Copy)]
struct RmPosition {
    unit_price: i64,
    allocated_volume: i64,
}

impl RmPosition {
    fn resolve(bid: Option<&RmBid>, spot_price: i64) -> Self {
        match bid {
            Some(bid) => Self {
                unit_price: bid.price,
                allocated_volume: bid.allocated_volume.unwrap_or(0),
            },
            None => Self {
                unit_price: spot_price,
                allocated_volume: 0,
            },
        }
    }
}

/// Outcome of the month's RM consumption
#[derive(Debug, Clone, Copy)]
struct RmOutcome {
    /// Consumption + carrying + shortage charges (accrual)
    accrued_cost: i64,
    /// Purchase cost actually paid this month (allocation + spot coverage)
    cash_cost: i64,
    closing_balance: i64,
    shortage_volume: i64,
    shortage_unit_cost: i64,
}

/// Consume RM for the month's sales out of opening inventory plus this
/// month's allocation, spilling any shortfall into a spot purchase
fn consume_rm(
    position: RmPosition,
    opening_balance: i64,
    sales_volume: i64,
    spot_price: i64,
    carrying_cost_bps: i64,
) -> RmOutcome {
    let available = opening_balance + position.allocated_volume;
    let purchase_cost = position.allocated_volume * position.unit_price;

    if sales_volume <= available {
        let surplus = available - sales_volume;
        let carrying_cost = surplus * position.unit_price * carrying_cost_bps / BPS_SCALE;
        RmOutcome {
            accrued_cost: sales_volume * position.unit_price + carrying_cost,
            cash_cost: purchase_cost,
            closing_balance: surplus,
            shortage_volume: 0,
            shortage_unit_cost: 0,
        }
    } else {
        let shortfall = sales_volume - available;
        let spot_cost = shortfall * spot_price;
        RmOutcome {
            accrued_cost: available * position.unit_price + spot_cost,
            cash_cost: purchase_cost + spot_cost,
            closing_balance: 0,
            shortage_volume: shortfall,
            shortage_unit_cost: spot_price,
        }
    }
}

/// Ceiling division for non-negative numerators
fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator - 1) / denominator
}

/// Transport cost: the owned fleet is billed flat; sales beyond its capacity
/// hire extra units at the premium rate
fn transport_cost(config: &GameConfig, fleet_base: i64, sales_volume: i64) -> (i64, i64, i64) {
    let base_capacity = fleet_base * config.fleet_capacity_m3;
    let extra_units = if sales_volume > base_capacity {
        ceil_div(sales_volume, config.fleet_capacity_m3) - fleet_base
    } else {
        0
    };
    let cost =
        fleet_base * config.fleet_base_unit_cost + extra_units * config.fleet_extra_unit_cost;
    (cost, fleet_base + extra_units, extra_units)
}

/// Settle one month for every team on the roster
///
/// Preconditions, all rejected with [`SettlementError`] before any state
/// changes: both of the month's rounds must be frozen (allocations ran),
/// every team must have a record for the prior month (except at the game's
/// first month), and the month's quarter must not have been liquidated.
///
/// Returns the new records in ascending team order; the same records replace
/// any prior ones for the month in the ledger.
pub fn settle_month(
    state: &mut GameState,
    period: Period,
) -> Result<Vec<FinancialRecord>, SettlementError> {
    if !state.bids().is_rm_round_frozen(period) || !state.bids().is_customer_round_frozen(period)
    {
        return Err(SettlementError::RoundStillOpen { period });
    }
    if state.is_quarter_liquidated(period.quarter()) {
        return Err(SettlementError::QuarterLiquidated {
            period,
            quarter: period.quarter(),
        });
    }
    if let Some(prior) = period.pred() {
        for team in state.roster().ids() {
            if state.record(team, prior).is_none() {
                return Err(SettlementError::MissingPriorRecord {
                    period,
                    team,
                    prior,
                });
            }
        }
    }

    let spot_price = state
        .config()
        .spot_price(state.bids().max_rm_bid_price(period));

    let teams: Vec<(TeamId, i64)> = state
        .roster()
        .iter()
        .map(|t| (t.id(), t.fleet_base_count()))
        .collect();

    let mut records = Vec::with_capacity(teams.len());
    for (team, fleet_base) in teams {
        let config = state.config();

        // Revenue, split by payment term
        let mut revenue = 0;
        let mut cash_inflow = 0;
        let mut receivables = 0;
        let mut sales_volume = 0;
        for win in state.customer_wins(period, team) {
            let volume = win.allocated_volume.unwrap_or(0);
            let amount = volume * win.ask_price;
            revenue += amount;
            sales_volume += volume;
            let immediate = config
                .customers
                .iter()
                .find(|c| c.id == win.customer)
                .map(|c| c.pays_immediately())
                .unwrap_or(true);
            if immediate {
                cash_inflow += amount;
            } else {
                receivables += amount;
            }
        }

        // RM consumption with inventory carry
        let prior_record = period.pred().and_then(|p| state.record(team, p));
        let rm_opening = prior_record.map(|r| r.rm_closing_balance).unwrap_or(0);
        let position = RmPosition::resolve(state.rm_bid(period, team), spot_price);
        let rm = consume_rm(
            position,
            rm_opening,
            sales_volume,
            spot_price,
            config.carrying_cost_bps,
        );

        // Transport and production
        let (tm_cost, fleet_effective, extra_fleet) =
            transport_cost(config, fleet_base, sales_volume);
        let production_cost = sales_volume * config.production_rate_for(sales_volume);
        let other_expenses = config.monthly_overhead;

        let ebitda =
            revenue - rm.accrued_cost - tm_cost - production_cost - other_expenses;

        // Cash walk
        let cash_opening = match prior_record {
            Some(record) => record.cash_closing,
            None => config.seed_capital,
        };
        let interest_paid = if cash_opening < 0 {
            -cash_opening * config.overdraft_rate_bps / BPS_SCALE
        } else {
            0
        };
        let cash_outflow = rm.cash_cost + tm_cost + production_cost + other_expenses;
        let cash_closing = cash_opening + cash_inflow - cash_outflow - interest_paid;

        records.push(FinancialRecord {
            id: FinancialRecord::record_id(team, period),
            team,
            period,
            sales_volume,
            revenue,
            rm_cost_accrued: rm.accrued_cost,
            tm_cost,
            production_cost,
            other_expenses,
            ebitda,
            cash_opening,
            cash_closing,
            receivables,
            interest_paid,
            rm_opening_balance: rm_opening,
            rm_closing_balance: rm.closing_balance,
            shortage_volume: rm.shortage_volume,
            shortage_unit_cost: rm.shortage_unit_cost,
            fleet_count_effective: fleet_effective,
            extra_fleet_units: extra_fleet,
            liquidation_credit: 0,
        });
    }

    for record in &records {
        state.insert_record(record.clone());
    }
    state.push_event(EngineEvent::MonthSettled {
        period,
        num_teams: records.len(),
        total_ebitda: records.iter().map(|r| r.ebitda).sum(),
    });
    Ok(records)
}
