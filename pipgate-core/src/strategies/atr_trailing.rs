//! ATR trend following with an EMA trend filter.
//!
//! Long whenever the close holds above the long EMA, short below it; the
//! stop sits `atr_multiplier * ATR` away (the distance a host would trail
//! by) and the target at three times that (1:3). A close exactly on the
//! EMA is no trend and no trade.

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
    let atr_period = params.get_usize("atr_period", 14);
    let atr_multiplier = params.get("atr_multiplier", 3.0);
    let trend_ma_period = params.get_usize("trend_ma_period", 50);

    let n = close.len();
    let needed = atr_period.max(trend_ma_period) + 2;
    if n < needed {
        return insufficient_data(n, needed);
    }

    let atr = atr(high, low, close, atr_period);
    let trend_ma = ema(close, trend_ma_period);

    let curr_close = close[n - 1];
    let curr_atr = atr[n - 1];
    let curr_ma = trend_ma[n - 1];

    if curr_close > curr_ma {
        return StrategyVerdict::trade(
            Signal::Buy,
            curr_close,
            curr_close - atr_multiplier * curr_atr,
            curr_close + atr_multiplier * curr_atr * 3.0,
            curr_atr,
            format!("uptrend: close above EMA{trend_ma_period}"),
        );
    }

    if curr_close < curr_ma {
        return StrategyVerdict::trade(
            Signal::Sell,
            curr_close,
            curr_close + atr_multiplier * curr_atr,
            curr_close - atr_multiplier * curr_atr * 3.0,
            curr_atr,
            format!("downtrend: close below EMA{trend_ma_period}"),
        );
    }

    StrategyVerdict::no_trade("no clear trend: close sits on the trend EMA")
}
