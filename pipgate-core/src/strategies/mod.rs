//! Strategy evaluators.
//!
//! Nine strategies, each a pure function from price columns + parameters to
//! a [`StrategyVerdict`]. Seven are single-rule crossover/breakout/reversion
//! strategies; `ultimate_accuracy` and `ai_multi_factor` are the weighted
//! multi-factor scorers.
//!
//! Contract shared by all of them:
//! - below the strategy's minimum history the result is a `NoTrade` verdict
//!   with an "insufficient data" reason, never an error;
//! - malformed input (mismatched column lengths) is the only error case and
//!   is validated once, in [`evaluate`], so the per-strategy functions can
//!   index freely;
//! - every `NoTrade` verdict carries a specific reason string.
//!
//! Dispatch is a closed match over [`StrategyId`]; adding a strategy means
//! one new variant, one new arm and one defaults entry in
//! [`crate::config::StrategyTable`].

pub mod ai_multi_factor;
pub mod atr_trailing;
pub mod bollinger_reversion;
pub mod donchian_breakout;
pub mod ma_crossover;
pub mod macd_crossover;
pub mod rsi_swing;
pub mod supertrend_flip;
pub mod ultimate_accuracy;

use crate::config::StrategyParams;
use crate::domain::StrategyVerdict;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a strategy implementation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    MaCrossover,
    DonchianBreakout,
    BollingerReversion,
    RsiSwing,
    MacdCrossover,
    AtrTrailing,
    SupertrendFlip,
    UltimateAccuracy,
    AiMultiFactor,
}

impl StrategyId {
    pub const ALL: [StrategyId; 9] = [
        StrategyId::MaCrossover,
        StrategyId::DonchianBreakout,
        StrategyId::BollingerReversion,
        StrategyId::RsiSwing,
        StrategyId::MacdCrossover,
        StrategyId::AtrTrailing,
        StrategyId::SupertrendFlip,
        StrategyId::UltimateAccuracy,
        StrategyId::AiMultiFactor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyId::MaCrossover => "ma_crossover",
            StrategyId::DonchianBreakout => "donchian_breakout",
            StrategyId::BollingerReversion => "bollinger_reversion",
            StrategyId::RsiSwing => "rsi_swing",
            StrategyId::MacdCrossover => "macd_crossover",
            StrategyId::AtrTrailing => "atr_trailing",
            StrategyId::SupertrendFlip => "supertrend_flip",
            StrategyId::UltimateAccuracy => "ultimate_accuracy",
            StrategyId::AiMultiFactor => "ai_multi_factor",
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unexpected computation failure inside a strategy. Converted to a
/// `NoTrade` signal at the engine boundary, never surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("column length mismatch: high={high}, low={low}, close={close}")]
    LengthMismatch {
        high: usize,
        low: usize,
        close: usize,
    },
    #[error("volume column length {volume} does not match {bars} price bars")]
    VolumeLengthMismatch { volume: usize, bars: usize },
}

/// Evaluate `id` over the given columns.
pub fn evaluate(
    id: StrategyId,
    params: &StrategyParams,
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: Option<&[f64]>,
) -> Result<StrategyVerdict, StrategyError> {
    let n = close.len();
    if high.len() != n || low.len() != n {
        return Err(StrategyError::LengthMismatch {
            high: high.len(),
            low: low.len(),
            close: n,
        });
    }
    if let Some(v) = volume {
        if v.len() != n {
            return Err(StrategyError::VolumeLengthMismatch {
                volume: v.len(),
                bars: n,
            });
        }
    }

    Ok(match id {
        StrategyId::MaCrossover => ma_crossover::evaluate(params, high, low, close),
        StrategyId::DonchianBreakout => donchian_breakout::evaluate(params, high, low, close),
        StrategyId::BollingerReversion => bollinger_reversion::evaluate(params, high, low, close),
        StrategyId::RsiSwing => rsi_swing::evaluate(params, high, low, close),
        StrategyId::MacdCrossover => macd_crossover::evaluate(params, high, low, close),
        StrategyId::AtrTrailing => atr_trailing::evaluate(params, high, low, close),
        StrategyId::SupertrendFlip => supertrend_flip::evaluate(params, high, low, close),
        StrategyId::UltimateAccuracy => {
            ultimate_accuracy::evaluate(params, high, low, close, volume)
        }
        StrategyId::AiMultiFactor => ai_multi_factor::evaluate(params, high, low, close, volume),
    })
}

/// Standard insufficient-history verdict.
pub(crate) fn insufficient_data(got: usize, needed: usize) -> StrategyVerdict {
    StrategyVerdict::no_trade(format!("insufficient data: {got} bars, need {needed}"))
}

/// Reconstruct open prices from closes: open[i] = close[i-1], open[0] =
/// close[0]. The strategy input contract carries no open column, so the
/// candle classifiers run on this approximation.
pub(crate) fn synthetic_opens(close: &[f64]) -> Vec<f64> {
    let mut open = Vec::with_capacity(close.len());
    if let Some(&first) = close.first() {
        open.push(first);
        open.extend_from_slice(&close[..close.len() - 1]);
    }
    open
}

#[cfg(test)]
pub(crate) mod test_support {
    /// A gently rising close column with highs/lows bracketing it, long
    /// enough for every single-rule strategy.
    pub fn trending_columns(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..n).map(|i| 1.1000 + 0.0001 * i as f64).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 0.0005).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 0.0005).collect();
        (high, low, close)
    }
}
