//! Donchian channel breakout (turtle-style).
//!
//! Long when the close breaks the channel upper computed through the bar
//! before the previous one (so the breakout bar itself does not move the
//! reference level); short through the channel lower. Stop at
//! `atr_multiplier * ATR`, target at three times the stop distance (1:3).

use crate::config::StrategyParams;
use crate::domain::{Signal, StrategyVerdict};
use crate::indicators::{atr, donchian_channel};

use super::insufficient_data;

pub fn evaluate(
    params: &StrategyParams,
    high: &[f64],
    low: &[f64],
    close: &[f64],
) -> StrategyVerdict {
    let entry_period = params.get_usize("entry_period", 20);
    let exit_period = params.get_usize("exit_period", 10);
    let atr_period = params.get_usize("atr_period", 14);
    let atr_multiplier = params.get("atr_multiplier", 2.0);

    let n = close.len();
    let needed = entry_period.max(exit_period).max(atr_period) + 2;
    if n < needed {
        return insufficient_data(n, needed);
    }

    let (upper, lower) = donchian_channel(high, low, entry_period);
    let atr = atr(high, low, close, atr_period);

    let prev_close = close[n - 2];
    let curr_close = close[n - 1];
    // Reference level from two bars back keeps the breakout bar (and the
    // bar confirming it) out of its own channel.
    let ref_upper = upper[n - 3];
    let ref_lower = lower[n - 3];
    let curr_atr = atr[n - 1];

    if prev_close <= ref_upper && curr_close > ref_upper {
        return StrategyVerdict::trade(
            Signal::Buy,
            curr_close,
            curr_close - atr_multiplier * curr_atr,
            curr_close + atr_multiplier * curr_atr * 3.0,
            curr_atr,
            format!("close broke above the {entry_period}-bar Donchian upper"),
        );
    }

    if prev_close >= ref_lower && curr_close < ref_lower {
        return StrategyVerdict::trade(
            Signal::Sell,
            curr_close,
            curr_close + atr_multiplier * curr_atr,
            curr_close - atr_multiplier * curr_atr * 3.0,
            curr_atr,
            format!("close broke below the {entry_period}-bar Donchian lower"),
        );
    }

    StrategyVerdict::no_trade("no Donchian channel breakout")
}
