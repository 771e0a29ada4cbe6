//! Run configuration — risk limits and per-strategy parameter tables.
//!
//! Both structs are immutable once built and are passed explicitly into
//! `SignalEngine` / `RiskManager` at construction; there is no process-wide
//! configuration singleton, so multiple managers with different limits can
//! coexist (one per account). Everything deserializes from TOML for hosts
//! that keep configuration on disk, but in-code construction is equally
//! supported.

use crate::strategies::StrategyId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid trading hours: start {start} > end {end}")]
    InvalidTradingHours { start: u32, end: u32 },
    #[error("risk per trade must be positive, got {0}")]
    NonPositiveRisk(f64),
}

/// Hard limits enforced by the risk manager.
///
/// Percentages are expressed as whole numbers (1.0 = 1%). Trading hours are
/// UTC and inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskLimits {
    pub risk_per_trade_percent: f64,
    pub max_positions_per_symbol: u32,
    pub max_trades_per_day: u32,
    pub max_trades_per_symbol_per_day: u32,
    pub max_slippage_points: f64,
    pub max_spread_points: f64,
    pub daily_loss_limit_percent: f64,
    pub weekly_loss_limit_percent: f64,
    pub trading_start_hour: u32,
    pub trading_end_hour: u32,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            risk_per_trade_percent: 1.0,
            max_positions_per_symbol: 1,
            max_trades_per_day: 3,
            max_trades_per_symbol_per_day: 1,
            max_slippage_points: 5.0,
            max_spread_points: 10.0,
            daily_loss_limit_percent: 3.0,
            weekly_loss_limit_percent: 5.0,
            trading_start_hour: 0,
            trading_end_hour: 23,
        }
    }
}

impl RiskLimits {
    /// Parse limits from a TOML document, falling back to defaults for
    /// absent keys, then validate.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let limits: Self = toml::from_str(input)?;
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trading_start_hour > self.trading_end_hour {
            return Err(ConfigError::InvalidTradingHours {
                start: self.trading_start_hour,
                end: self.trading_end_hour,
            });
        }
        if self.risk_per_trade_percent <= 0.0 {
            return Err(ConfigError::NonPositiveRisk(self.risk_per_trade_percent));
        }
        Ok(())
    }
}

/// Named numeric parameters for one strategy.
///
/// `BTreeMap` keeps serialization deterministic. Lookups fall back to a
/// caller-supplied default so a partially specified table still runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyParams {
    pub params: BTreeMap<String, f64>,
}

impl StrategyParams {
    pub fn new(entries: &[(&str, f64)]) -> Self {
        Self {
            params: entries
                .iter()
                .map(|&(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    pub fn get(&self, name: &str, default: f64) -> f64 {
        self.params.get(name).copied().unwrap_or(default)
    }

    pub fn get_usize(&self, name: &str, default: usize) -> usize {
        self.params
            .get(name)
            .copied()
            .map(|v| v as usize)
            .unwrap_or(default)
    }
}

/// The static strategy-id -> parameters mapping handed to `SignalEngine`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyTable {
    entries: BTreeMap<StrategyId, StrategyParams>,
}

impl StrategyTable {
    /// The stock parameter set: one entry per strategy.
    pub fn defaults() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            StrategyId::MaCrossover,
            StrategyParams::new(&[
                ("fast_period", 10.0),
                ("slow_period", 30.0),
                ("atr_period", 14.0),
                ("atr_multiplier", 2.0),
            ]),
        );
        entries.insert(
            StrategyId::DonchianBreakout,
            StrategyParams::new(&[
                ("entry_period", 20.0),
                ("exit_period", 10.0),
                ("atr_period", 14.0),
                ("atr_multiplier", 2.0),
            ]),
        );
        entries.insert(
            StrategyId::BollingerReversion,
            StrategyParams::new(&[
                ("period", 20.0),
                ("std_dev", 2.0),
                ("rsi_period", 14.0),
                ("rsi_oversold", 30.0),
                ("rsi_overbought", 70.0),
                ("atr_period", 14.0),
                ("atr_multiplier", 1.5),
            ]),
        );
        entries.insert(
            StrategyId::RsiSwing,
            StrategyParams::new(&[
                ("rsi_period", 14.0),
                ("oversold_level", 30.0),
                ("overbought_level", 70.0),
                ("exit_level", 50.0),
                ("atr_period", 14.0),
                ("atr_multiplier", 2.0),
            ]),
        );
        entries.insert(
            StrategyId::MacdCrossover,
            StrategyParams::new(&[
                ("fast_period", 12.0),
                ("slow_period", 26.0),
                ("signal_period", 9.0),
                ("atr_period", 14.0),
                ("atr_multiplier", 2.0),
            ]),
        );
        entries.insert(
            StrategyId::AtrTrailing,
            StrategyParams::new(&[
                ("atr_period", 14.0),
                ("atr_multiplier", 3.0),
                ("trend_ma_period", 50.0),
            ]),
        );
        entries.insert(
            StrategyId::SupertrendFlip,
            StrategyParams::new(&[("atr_period", 10.0), ("atr_multiplier", 3.0)]),
        );
        entries.insert(
            StrategyId::UltimateAccuracy,
            StrategyParams::new(&[
                ("atr_period", 14.0),
                ("atr_multiplier", 2.0),
                ("min_accuracy", 75.0),
            ]),
        );
        entries.insert(
            StrategyId::AiMultiFactor,
            StrategyParams::new(&[("atr_period", 14.0), ("atr_multiplier", 2.0)]),
        );
        Self { entries }
    }

    pub fn get(&self, id: StrategyId) -> Option<&StrategyParams> {
        self.entries.get(&id)
    }

    /// Replace (or add) one strategy's parameters, returning the table.
    pub fn with_params(mut self, id: StrategyId, params: StrategyParams) -> Self {
        self.entries.insert(id, params);
        self
    }

    /// Parse a table from TOML, e.g.
    /// `ma_crossover = { fast_period = 8, slow_period = 21 }`.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_match_stock_values() {
        let limits = RiskLimits::default();
        assert_eq!(limits.max_trades_per_day, 3);
        assert_eq!(limits.max_positions_per_symbol, 1);
        assert_eq!(limits.daily_loss_limit_percent, 3.0);
        assert_eq!(limits.weekly_loss_limit_percent, 5.0);
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn limits_from_toml_overlays_defaults() {
        let limits = RiskLimits::from_toml(
            r#"
            max_trades_per_day = 5
            daily_loss_limit_percent = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(limits.max_trades_per_day, 5);
        assert_eq!(limits.daily_loss_limit_percent, 2.0);
        // untouched keys keep their defaults
        assert_eq!(limits.max_spread_points, 10.0);
    }

    #[test]
    fn limits_reject_inverted_hours() {
        let err = RiskLimits::from_toml("trading_start_hour = 20\ntrading_end_hour = 8");
        assert!(matches!(
            err,
            Err(ConfigError::InvalidTradingHours { start: 20, end: 8 })
        ));
    }

    #[test]
    fn params_fall_back_to_default() {
        let p = StrategyParams::new(&[("fast_period", 8.0)]);
        assert_eq!(p.get_usize("fast_period", 10), 8);
        assert_eq!(p.get_usize("slow_period", 30), 30);
        assert_eq!(p.get("atr_multiplier", 2.0), 2.0);
    }

    #[test]
    fn default_table_covers_every_strategy() {
        let table = StrategyTable::defaults();
        for id in StrategyId::ALL {
            assert!(table.get(id).is_some(), "missing defaults for {id}");
        }
    }

    #[test]
    fn table_override_replaces_one_entry() {
        let table = StrategyTable::defaults().with_params(
            StrategyId::MaCrossover,
            StrategyParams::new(&[("fast_period", 5.0), ("slow_period", 20.0)]),
        );
        let p = table.get(StrategyId::MaCrossover).unwrap();
        assert_eq!(p.get_usize("fast_period", 10), 5);
        // Donchian untouched
        let d = table.get(StrategyId::DonchianBreakout).unwrap();
        assert_eq!(d.get_usize("entry_period", 0), 20);
    }

    #[test]
    fn table_from_toml() {
        let table = StrategyTable::from_toml(
            r#"
            ma_crossover = { fast_period = 8, slow_period = 21 }
            supertrend_flip = { atr_period = 7, atr_multiplier = 2.5 }
            "#,
        )
        .unwrap();
        let p = table.get(StrategyId::MaCrossover).unwrap();
        assert_eq!(p.get_usize("fast_period", 0), 8);
        assert!(table.get(StrategyId::RsiSwing).is_none());
    }
}
