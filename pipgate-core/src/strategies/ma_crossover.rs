//! Moving-average crossover.
//!
//! Long when the fast EMA crosses above the slow EMA and the close confirms
//! above the fast line; short on the mirror image. Stop at
//! `atr_multiplier * ATR`, target at twice the stop distance (1:2).

use crate::config::StrategyParams;
use crate::domain::{Signal, StrategyVerdict};
use crate::indicators::{atr, ema};

use super::insufficient_data;

pub fn evaluate(
    params: &StrategyParams,
    high: &[f64],
    low: &[f64],
    close: &[f64],
) -> StrategyVerdict {
    let fast_period = params.get_usize("fast_period", 10);
    let slow_period = params.get_usize("slow_period", 30);
    let atr_period = params.get_usize("atr_period", 14);
    let atr_multiplier = params.get("atr_multiplier", 2.0);

    let n = close.len();
    let needed = fast_period.max(slow_period).max(atr_period) + 2;
    if n < needed {
        return insufficient_data(n, needed);
    }

    let ema_fast = ema(close, fast_period);
    let ema_slow = ema(close, slow_period);
    let atr = atr(high, low, close, atr_period);

    let prev_fast = ema_fast[n - 2];
    let prev_slow = ema_slow[n - 2];
    let curr_fast = ema_fast[n - 1];
    let curr_slow = ema_slow[n - 1];
    let curr_close = close[n - 1];
    let curr_atr = atr[n - 1];

    if prev_fast <= prev_slow && curr_fast > curr_slow && curr_close > curr_fast {
        let stop = curr_close - atr_multiplier * curr_atr;
        let target = curr_close + atr_multiplier * curr_atr * 2.0;
        return StrategyVerdict::trade(
            Signal::Buy,
            curr_close,
            stop,
            target,
            curr_atr,
            format!("EMA{fast_period} crossed above EMA{slow_period}"),
        );
    }

    if prev_fast >= prev_slow && curr_fast < curr_slow && curr_close < curr_fast {
        let stop = curr_close + atr_multiplier * curr_atr;
        let target = curr_close - atr_multiplier * curr_atr * 2.0;
        return StrategyVerdict::trade(
            Signal::Sell,
            curr_close,
            stop,
            target,
            curr_atr,
            format!("EMA{fast_period} crossed below EMA{slow_period}"),
        );
    }

    StrategyVerdict::no_trade("no EMA crossover on the latest bar")
}
