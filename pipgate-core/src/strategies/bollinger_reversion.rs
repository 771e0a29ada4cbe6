//! Bollinger band + RSI mean reversion.
//!
//! Long when the close drops below the lower band while RSI confirms
//! oversold; short above the upper band with RSI overbought. The target is
//! the middle band (reversion to the mean), the stop `atr_multiplier * ATR`.

use crate::config::StrategyParams;
use crate::domain::{Signal, StrategyVerdict};
use crate::indicators::{atr, bollinger_bands, rsi};

use super::insufficient_data;

pub fn evaluate(
    params: &StrategyParams,
    high: &[f64],
    low: &[f64],
    close: &[f64],
) -> StrategyVerdict {
    let bb_period = params.get_usize("period", 20);
    let std_dev = params.get("std_dev", 2.0);
    let rsi_period = params.get_usize("rsi_period", 14);
    let rsi_oversold = params.get("rsi_oversold", 30.0);
    let rsi_overbought = params.get("rsi_overbought", 70.0);
    let atr_period = params.get_usize("atr_period", 14);
    let atr_multiplier = params.get("atr_multiplier", 1.5);

    let n = close.len();
    let needed = bb_period.max(rsi_period).max(atr_period) + 2;
    if n < needed {
        return insufficient_data(n, needed);
    }

    let (upper, middle, lower) = bollinger_bands(close, bb_period, std_dev);
    let rsi = rsi(close, rsi_period);
    let atr = atr(high, low, close, atr_period);

    let curr_close = close[n - 1];
    let curr_rsi = rsi[n - 1];
    let curr_atr = atr[n - 1];

    if curr_close < lower[n - 1] && curr_rsi < rsi_oversold {
        return StrategyVerdict::trade(
            Signal::Buy,
            curr_close,
            curr_close - atr_multiplier * curr_atr,
            middle[n - 1],
            curr_atr,
            format!("oversold: close below lower band, RSI={curr_rsi:.1}"),
        );
    }

    if curr_close > upper[n - 1] && curr_rsi > rsi_overbought {
        return StrategyVerdict::trade(
            Signal::Sell,
            curr_close,
            curr_close + atr_multiplier * curr_atr,
            middle[n - 1],
            curr_atr,
            format!("overbought: close above upper band, RSI={curr_rsi:.1}"),
        );
    }

    StrategyVerdict::no_trade("close inside the bands or RSI not at an extreme")
}
