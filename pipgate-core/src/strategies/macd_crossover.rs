//! MACD line / signal line crossover.
//!
//! Long when the MACD line crosses above its signal line, short on the
//! mirror. Stop at `atr_multiplier * ATR`, target at twice the stop (1:2).

use crate::config::StrategyParams;
use crate::domain::{Signal, StrategyVerdict};
use crate::indicators::{atr, macd};

use super::insufficient_data;

pub fn evaluate(
    params: &StrategyParams,
    high: &[f64],
    low: &[f64],
    close: &[f64],
) -> StrategyVerdict {
    let fast = params.get_usize("fast_period", 12);
    let slow = params.get_usize("slow_period", 26);
    let signal_period = params.get_usize("signal_period", 9);
    let atr_period = params.get_usize("atr_period", 14);
    let atr_multiplier = params.get("atr_multiplier", 2.0);

    let n = close.len();
    let needed = slow.max(atr_period) + signal_period + 2;
    if n < needed {
        return insufficient_data(n, needed);
    }

    let (macd_line, signal_line, _) = macd(close, fast, slow, signal_period);
    let atr = atr(high, low, close, atr_period);

    let prev_macd = macd_line[n - 2];
    let prev_signal = signal_line[n - 2];
    let curr_macd = macd_line[n - 1];
    let curr_signal = signal_line[n - 1];
    let curr_close = close[n - 1];
    let curr_atr = atr[n - 1];

    if prev_macd <= prev_signal && curr_macd > curr_signal {
        return StrategyVerdict::trade(
            Signal::Buy,
            curr_close,
            curr_close - atr_multiplier * curr_atr,
            curr_close + atr_multiplier * curr_atr * 2.0,
            curr_atr,
            "MACD crossed above its signal line",
        );
    }

    if prev_macd >= prev_signal && curr_macd < curr_signal {
        return StrategyVerdict::trade(
            Signal::Sell,
            curr_close,
            curr_close + atr_multiplier * curr_atr,
            curr_close - atr_multiplier * curr_atr * 2.0,
            curr_atr,
            "MACD crossed below its signal line",
        );
    }

    StrategyVerdict::no_trade("no MACD/signal crossover")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyTable;
    use crate::strategies::StrategyId;

    fn params() -> StrategyParams {
        StrategyTable::defaults()
            .get(StrategyId::MacdCrossover)
            .unwrap()
            .clone()
    }

    /// Decline then recovery: the MACD line starts below its signal and
    /// crosses above during the bounce. Returns the columns plus the first
    /// crossover index after the turn.
    fn v_shape() -> (Vec<f64>, Vec<f64>, Vec<f64>, usize) {
        let mut close: Vec<f64> = (0..50).map(|i| 1.2000 - 0.0010 * i as f64).collect();
        let trough = close[49];
        close.extend((0..30).map(|i| trough + 0.0012 * (i + 1) as f64));
        let high: Vec<f64> = close.iter().map(|c| c + 0.0005).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 0.0005).collect();

        let (line, signal, _) = crate::indicators::macd(&close, 12, 26, 9);
        let cross = (50..close.len())
            .find(|&i| line[i - 1] <= signal[i - 1] && line[i] > signal[i])
            .expect("recovery must force a bullish MACD cross");
        (high, low, close, cross)
    }

    #[test]
    fn buy_on_bullish_cross_with_one_to_two_rr() {
        let (high, low, close, cross) = v_shape();
        let v = evaluate(&params(), &high[..=cross], &low[..=cross], &close[..=cross]);
        assert_eq!(v.signal, Signal::Buy, "{}", v.reason);
        let rr = (v.take_profit - v.entry_price) / (v.entry_price - v.stop_loss);
        assert!((rr - 2.0).abs() < 1e-9);
    }

    #[test]
    fn steady_downtrend_holds_no_trade_or_sell() {
        // Deep in a straight decline both lines fall together with the MACD
        // line below the signal; no fresh cross means no entry.
        let close: Vec<f64> = (0..60).map(|i| 1.2000 - 0.0010 * i as f64).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 0.0005).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 0.0005).collect();
        let v = evaluate(&params(), &high, &low, &close);
        assert_eq!(v.signal, Signal::NoTrade, "{}", v.reason);
    }

    #[test]
    fn short_history_reports_requirement() {
        let v = evaluate(&params(), &[1.1; 20], &[1.0; 20], &[1.05; 20]);
        assert_eq!(v.reason, "insufficient data: 20 bars, need 37");
    }
}
