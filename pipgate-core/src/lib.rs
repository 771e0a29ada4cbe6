//! PipGate core — signal scoring and risk gating for candlestick series.
//!
//! The pipeline, leaves first:
//! - Indicator library: pure numeric transforms over price columns
//! - Pattern recognition: candle shapes, divergence, regime, momentum quality
//! - Probability helpers feeding the composite scorers
//! - Nine strategy evaluators (seven single-rule + two multi-factor)
//! - Signal engine: dispatch, normalization, multi-symbol scanning
//! - Risk manager: ordered gate, position sizing, kill switch, trade ledgers
//!
//! Data flows one way: price series -> strategy -> `TradingSignal` ->
//! `RiskManager::check_signal` -> (approved, sized) -> the host's execution
//! layer via `MarketGateway`. Everything here is synchronous and
//! request/response; hosts that parallelize scans own the locking around
//! the one mutable piece, the risk manager.

pub mod config;
pub mod domain;
pub mod engine;
pub mod gateway;
pub mod indicators;
pub mod notify;
pub mod patterns;
pub mod probability;
pub mod risk;
pub mod strategies;

pub use config::{ConfigError, RiskLimits, StrategyParams, StrategyTable};
pub use domain::{PriceSeries, Signal, StrategyVerdict, TradeStats};
pub use engine::{SignalEngine, TradingSignal};
pub use gateway::{MarketGateway, SymbolInfo, Timeframe};
pub use notify::{NotificationSink, NotifyLevel};
pub use risk::{KillSwitchState, PositionCalculation, RiskDecision, RiskManager};
pub use strategies::{StrategyError, StrategyId};
