//! RSI swing re-entry.
//!
//! Long when RSI climbs back through the oversold threshold from below;
//! short when it falls back through the overbought threshold from above.
//! Stop at `atr_multiplier * ATR`, target at 2.5x the stop distance.

use crate::config::StrategyParams;
use crate::domain::{Signal, StrategyVerdict};
use crate::indicators::{atr, rsi};

use super::insufficient_data;

pub fn evaluate(
    params: &StrategyParams,
    high: &[f64],
    low: &[f64],
    close: &[f64],
) -> StrategyVerdict {
    let rsi_period = params.get_usize("rsi_period", 14);
    let oversold = params.get("oversold_level", 30.0);
    let overbought = params.get("overbought_level", 70.0);
    let atr_period = params.get_usize("atr_period", 14);
    let atr_multiplier = params.get("atr_multiplier", 2.0);

    let n = close.len();
    let needed = rsi_period.max(atr_period) + 2;
    if n < needed {
        return insufficient_data(n, needed);
    }

    let rsi = rsi(close, rsi_period);
    let atr = atr(high, low, close, atr_period);

    let prev_rsi = rsi[n - 2];
    let curr_rsi = rsi[n - 1];
    let curr_close = close[n - 1];
    let curr_atr = atr[n - 1];

    if prev_rsi < oversold && curr_rsi >= oversold {
        return StrategyVerdict::trade(
            Signal::Buy,
            curr_close,
            curr_close - atr_multiplier * curr_atr,
            curr_close + atr_multiplier * curr_atr * 2.5,
            curr_atr,
            format!("RSI recovered through oversold ({prev_rsi:.1} -> {curr_rsi:.1})"),
        );
    }

    if prev_rsi > overbought && curr_rsi <= overbought {
        return StrategyVerdict::trade(
            Signal::Sell,
            curr_close,
            curr_close + atr_multiplier * curr_atr,
            curr_close - atr_multiplier * curr_atr * 2.5,
            curr_atr,
            format!("RSI rolled over through overbought ({prev_rsi:.1} -> {curr_rsi:.1})"),
        );
    }

    StrategyVerdict::no_trade("RSI did not re-cross an entry threshold")
}
