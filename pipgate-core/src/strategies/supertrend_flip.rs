//! Supertrend direction flip.
//!
//! Enter when the Supertrend direction flips on the latest bar; the
//! Supertrend line itself is the stop (it is the active band on the new
//! side of price), with the target at `atr_multiplier * ATR * 2` from entry.

use crate::config::StrategyParams;
use crate::domain::{Signal, StrategyVerdict};
use crate::indicators::{atr, supertrend};

use super::insufficient_data;

pub fn evaluate(
    params: &StrategyParams,
    high: &[f64],
    low: &[f64],
    close: &[f64],
) -> StrategyVerdict {
    let atr_period = params.get_usize("atr_period", 10);
    let atr_multiplier = params.get("atr_multiplier", 3.0);

    let n = close.len();
    let needed = atr_period + 2;
    if n < needed {
        return insufficient_data(n, needed);
    }

    let (line, direction) = supertrend(high, low, close, atr_period, atr_multiplier);
    let atr = atr(high, low, close, atr_period);

    let prev_direction = direction[n - 2];
    let curr_direction = direction[n - 1];
    let curr_close = close[n - 1];
    let curr_line = line[n - 1];
    let curr_atr = atr[n - 1];

    if prev_direction == -1.0 && curr_direction == 1.0 {
        return StrategyVerdict::trade(
            Signal::Buy,
            curr_close,
            curr_line,
            curr_close + atr_multiplier * curr_atr * 2.0,
            curr_atr,
            "Supertrend flipped to uptrend",
        );
    }

    if prev_direction == 1.0 && curr_direction == -1.0 {
        return StrategyVerdict::trade(
            Signal::Sell,
            curr_close,
            curr_line,
            curr_close - atr_multiplier * curr_atr * 2.0,
            curr_atr,
            "Supertrend flipped to downtrend",
        );
    }

    StrategyVerdict::no_trade("Supertrend direction unchanged")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyTable;
    use crate::indicators::supertrend;
    use crate::strategies::StrategyId;

    fn params() -> StrategyParams {
        StrategyTable::defaults()
            .get(StrategyId::SupertrendFlip)
            .unwrap()
            .clone()
    }

    /// Quiet bars, then one wide breakout bar closing on its high: the close
    /// clears the upper band and the direction flips up on the final bar.
    fn breakout_columns() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut close = vec![1.1000; 20];
        close.push(1.1300);
        let mut high: Vec<f64> = close.iter().map(|c| c + 0.0010).collect();
        let mut low: Vec<f64> = close.iter().map(|c| c - 0.0010).collect();
        high[20] = 1.1300;
        low[20] = 1.1000;

        let (_, direction) = supertrend(&high, &low, &close, 10, 3.0);
        assert_eq!(direction[19], -1.0);
        assert_eq!(direction[20], 1.0, "breakout bar must flip the trend up");
        (high, low, close)
    }

    #[test]
    fn buy_on_flip_with_line_as_stop() {
        let (high, low, close) = breakout_columns();
        let v = evaluate(&params(), &high, &low, &close);
        assert_eq!(v.signal, Signal::Buy, "{}", v.reason);
        // The stop is the supertrend line, which sits below price after an
        // upward flip.
        assert!(v.stop_loss < v.entry_price);
        assert!(v.take_profit > v.entry_price);
    }

    #[test]
    fn sell_when_the_upswing_exhausts() {
        // One quiet bar after the breakout pulls the close back under the
        // upper band: the direction drops to -1 and the flip reads short.
        let (mut high, mut low, mut close) = breakout_columns();
        close.push(1.1290);
        high.push(1.1300);
        low.push(1.1280);
        let v = evaluate(&params(), &high, &low, &close);
        assert_eq!(v.signal, Signal::Sell, "{}", v.reason);
        assert!(v.stop_loss > v.entry_price);
    }

    #[test]
    fn no_trade_while_direction_holds() {
        // Quiet bars only: the direction settles at -1 from the second bar
        // on, so the last two bars agree and nothing fires.
        let close = vec![1.1000; 20];
        let high: Vec<f64> = close.iter().map(|c| c + 0.0010).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 0.0010).collect();
        let v = evaluate(&params(), &high, &low, &close);
        assert_eq!(v.signal, Signal::NoTrade, "{}", v.reason);
    }

    #[test]
    fn short_history_reports_requirement() {
        let v = evaluate(&params(), &[1.1; 5], &[1.0; 5], &[1.05; 5]);
        assert_eq!(v.reason, "insufficient data: 5 bars, need 12");
    }
}
