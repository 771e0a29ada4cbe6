//! Signal engine — strategy dispatch and signal normalization.
//!
//! The engine owns the immutable strategy parameter table, routes a price
//! series to the selected strategy and wraps whatever comes back into a
//! [`TradingSignal`]. Nothing escapes this boundary as an error: unknown
//! strategies, missing parameters and computation failures all become
//! `NoTrade` signals carrying the failure text as their reason.

use crate::config::StrategyTable;
use crate::domain::{PriceSeries, Signal, StrategyVerdict};
use crate::strategies::{self, StrategyId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A normalized, immutable trading signal: one strategy verdict bound to a
/// symbol and timestamp, with the derived risk figures precomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSignal {
    pub symbol: String,
    pub strategy: StrategyId,
    pub timestamp: DateTime<Utc>,
    pub signal: Signal,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub atr: f64,
    pub reason: String,
    pub debug: BTreeMap<String, f64>,
    /// |entry - stop|; 0 when the verdict carries no entry.
    pub risk_points: f64,
    /// |target - entry|; 0 when the verdict carries no entry.
    pub reward_points: f64,
    /// reward / risk; 0 when the risk distance is 0.
    pub risk_reward_ratio: f64,
}

impl TradingSignal {
    pub fn from_verdict(
        symbol: impl Into<String>,
        strategy: StrategyId,
        timestamp: DateTime<Utc>,
        verdict: StrategyVerdict,
    ) -> Self {
        let has_entry = verdict.entry_price > 0.0;
        let risk_points = if has_entry {
            (verdict.entry_price - verdict.stop_loss).abs()
        } else {
            0.0
        };
        let reward_points = if has_entry {
            (verdict.take_profit - verdict.entry_price).abs()
        } else {
            0.0
        };
        let risk_reward_ratio = if risk_points > 0.0 {
            reward_points / risk_points
        } else {
            0.0
        };

        Self {
            symbol: symbol.into(),
            strategy,
            timestamp,
            signal: verdict.signal,
            entry_price: verdict.entry_price,
            stop_loss: verdict.stop_loss,
            take_profit: verdict.take_profit,
            atr: verdict.atr,
            reason: verdict.reason,
            debug: verdict.debug,
            risk_points,
            reward_points,
            risk_reward_ratio,
        }
    }

    pub fn is_trade(&self) -> bool {
        self.signal != Signal::NoTrade
    }
}

/// Minimum closes a symbol needs before a scan will evaluate it.
pub const MIN_SCAN_BARS: usize = 50;

/// Dispatches price series to strategies and normalizes the results.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    strategies: StrategyTable,
}

impl SignalEngine {
    pub fn new(strategies: StrategyTable) -> Self {
        Self { strategies }
    }

    /// Evaluate one strategy over one series at `now`.
    ///
    /// Always returns a signal; failures surface as `NoTrade` with the
    /// failure text.
    pub fn generate_signal(
        &self,
        strategy: StrategyId,
        series: &PriceSeries,
        now: DateTime<Utc>,
    ) -> TradingSignal {
        let symbol = series.symbol();
        let Some(params) = self.strategies.get(strategy) else {
            tracing::warn!(%strategy, symbol, "no parameters configured");
            return TradingSignal::from_verdict(
                symbol,
                strategy,
                now,
                StrategyVerdict::no_trade(format!("no parameters configured for {strategy}")),
            );
        };

        let verdict = match strategies::evaluate(
            strategy,
            params,
            series.high(),
            series.low(),
            series.close(),
            series.volume(),
        ) {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::error!(%strategy, symbol, error = %e, "strategy computation failed");
                StrategyVerdict::no_trade(format!("computation failed: {e}"))
            }
        };

        let signal = TradingSignal::from_verdict(symbol, strategy, now, verdict);
        tracing::info!(
            %strategy,
            symbol,
            signal = signal.signal.as_str(),
            reason = %signal.reason,
            "signal generated"
        );
        signal
    }

    /// Convenience wrapper stamping the signal with the current time.
    pub fn generate_signal_now(&self, strategy: StrategyId, series: &PriceSeries) -> TradingSignal {
        self.generate_signal(strategy, series, Utc::now())
    }

    /// Evaluate one strategy across many symbols.
    ///
    /// Symbols missing from `data` or with fewer than [`MIN_SCAN_BARS`]
    /// closes are skipped. Only actionable (non-`NoTrade`) signals are
    /// returned, in the order the symbols were given.
    pub fn scan_symbols(
        &self,
        symbols: &[&str],
        strategy: StrategyId,
        data: &BTreeMap<String, PriceSeries>,
        now: DateTime<Utc>,
    ) -> Vec<TradingSignal> {
        let mut signals = Vec::new();
        for &symbol in symbols {
            let Some(series) = data.get(symbol) else {
                continue;
            };
            if series.len() < MIN_SCAN_BARS {
                tracing::debug!(symbol, bars = series.len(), "skipping thin history");
                continue;
            }
            let signal = self.generate_signal(strategy, series, now);
            if signal.is_trade() {
                signals.push(signal);
            }
        }
        signals
    }
}
