//! Strategy verdicts — the raw output of a strategy evaluator.
//!
//! A verdict is immutable once produced. `NoTrade` verdicts always carry a
//! non-empty reason; there is no silent "no signal" state anywhere in the
//! pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Directional recommendation of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    NoTrade,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::NoTrade => "NO_TRADE",
        }
    }
}

/// Output of a single strategy evaluation.
///
/// Price fields are zero for `NoTrade` verdicts. The `debug` map carries
/// strategy-specific diagnostics (sub-scores, factor values) for logging and
/// inspection; nothing downstream keys decisions off it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyVerdict {
    pub signal: Signal,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub atr: f64,
    pub reason: String,
    pub debug: BTreeMap<String, f64>,
}

impl StrategyVerdict {
    /// A no-trade verdict with an explanatory reason.
    pub fn no_trade(reason: impl Into<String>) -> Self {
        Self {
            signal: Signal::NoTrade,
            entry_price: 0.0,
            stop_loss: 0.0,
            take_profit: 0.0,
            atr: 0.0,
            reason: reason.into(),
            debug: BTreeMap::new(),
        }
    }

    /// A directional verdict with entry, stop and target.
    pub fn trade(
        signal: Signal,
        entry_price: f64,
        stop_loss: f64,
        take_profit: f64,
        atr: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            signal,
            entry_price,
            stop_loss,
            take_profit,
            atr,
            reason: reason.into(),
            debug: BTreeMap::new(),
        }
    }

    /// Attach a diagnostic value, consuming and returning the verdict.
    pub fn with_debug(mut self, key: &str, value: f64) -> Self {
        self.debug.insert(key.to_string(), value);
        self
    }

    pub fn is_trade(&self) -> bool {
        self.signal != Signal::NoTrade
    }
}
