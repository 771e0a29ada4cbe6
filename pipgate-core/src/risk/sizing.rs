//! Position sizing math.
//!
//! risk_money = equity * risk_percent / 100
//! stop_distance_points = |entry - stop| / point
//! lot = risk_money / (stop_distance_points * tick_value)
//!
//! The raw lot is clamped up to the broker minimum first, then snapped to
//! the nearest volume step with `f64::round` (half-away-from-zero). Sizing
//! that cannot produce a meaningful positive lot returns 0 and the caller
//! rejects the trade.

use crate::domain::Signal;
use crate::gateway::SymbolInfo;
use serde::{Deserialize, Serialize};

/// Lots to trade for a given stop distance (in price units), or 0 when the
/// inputs are degenerate.
pub fn lot_size(
    equity: f64,
    risk_percent: f64,
    stop_distance: f64,
    info: &SymbolInfo,
) -> f64 {
    if equity <= 0.0 || risk_percent <= 0.0 || info.point <= 0.0 || info.tick_value <= 0.0 {
        return 0.0;
    }
    let stop_distance_points = stop_distance / info.point;
    if !(stop_distance_points > 0.0) || !stop_distance_points.is_finite() {
        return 0.0;
    }

    let risk_money = equity * risk_percent / 100.0;
    let mut lot = risk_money / (stop_distance_points * info.tick_value);
    lot = lot.max(info.volume_min);
    if info.volume_step > 0.0 {
        lot = (lot / info.volume_step).round() * info.volume_step;
    }
    lot
}

/// Full pre-trade sizing breakdown, computed on demand and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionCalculation {
    pub symbol: String,
    pub direction: Signal,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,

    pub point: f64,
    pub tick_value: f64,
    pub contract_size: f64,

    pub lot_size: f64,
    pub risk_amount: f64,
    pub reward_amount: f64,
    pub risk_reward_ratio: f64,

    pub stop_distance_points: f64,
    pub profit_distance_points: f64,
    pub stop_distance_pips: f64,
    pub profit_distance_pips: f64,

    pub account_equity: f64,
    pub risk_percent: f64,
}

impl PositionCalculation {
    pub fn is_valid(&self) -> bool {
        self.lot_size > 0.0 && self.risk_reward_ratio > 0.0
    }
}

/// Compute the full sizing breakdown for one prospective order.
#[allow(clippy::too_many_arguments)]
pub fn calculate(
    symbol: &str,
    direction: Signal,
    entry_price: f64,
    stop_loss: f64,
    take_profit: f64,
    account_equity: f64,
    info: &SymbolInfo,
    risk_percent: f64,
) -> PositionCalculation {
    let (stop_distance, profit_distance) = match direction {
        Signal::Sell => (stop_loss - entry_price, entry_price - take_profit),
        _ => (entry_price - stop_loss, take_profit - entry_price),
    };

    let stop_distance_points = stop_distance / info.point;
    let profit_distance_points = profit_distance / info.point;

    // JPY crosses quote pips at the second decimal, everything else at the
    // fourth; points are one decimal finer in both cases.
    let pip_factor = if symbol.contains("JPY") { 100.0 } else { 10.0 };
    let stop_distance_pips = stop_distance_points / pip_factor;
    let profit_distance_pips = profit_distance_points / pip_factor;

    let risk_amount = account_equity * risk_percent / 100.0;
    let lot = lot_size(account_equity, risk_percent, stop_distance, info);

    let value_per_point = info.tick_value / info.point;
    let reward_amount = if lot > 0.0 {
        lot * profit_distance * value_per_point
    } else {
        0.0
    };
    let risk_reward_ratio = if risk_amount > 0.0 {
        reward_amount / risk_amount
    } else {
        0.0
    };

    PositionCalculation {
        symbol: symbol.to_string(),
        direction,
        entry_price,
        stop_loss,
        take_profit,
        point: info.point,
        tick_value: info.tick_value,
        contract_size: info.contract_size,
        lot_size: lot,
        risk_amount,
        reward_amount,
        risk_reward_ratio,
        stop_distance_points,
        profit_distance_points,
        stop_distance_pips,
        profit_distance_pips,
        account_equity,
        risk_percent,
    }
}
