//! Abstract broker interface.
//!
//! The core never talks to a broker. Hosts implement [`MarketGateway`] over
//! their connectivity layer (MT5, REST, fixtures in tests) and the core
//! consumes the returned values as plain data.

use crate::domain::PriceSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Errors a gateway implementation may surface.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
    #[error("market data unavailable: {0}")]
    Unavailable(String),
}

/// Bar timeframe requested from the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
    W1,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "M1",
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::M30 => "M30",
            Timeframe::H1 => "H1",
            Timeframe::H4 => "H4",
            Timeframe::D1 => "D1",
            Timeframe::W1 => "W1",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static instrument properties plus the live spread, as reported by the
/// broker. Everything the risk manager needs to size and gate one signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Price value of one point (e.g. 0.00001 for EURUSD).
    pub point: f64,
    /// Account-currency value of a one-point move for one lot.
    pub tick_value: f64,
    /// Units per lot (100_000 for standard FX lots).
    pub contract_size: f64,
    /// Smallest tradable volume.
    pub volume_min: f64,
    /// Volume increment above the minimum.
    pub volume_step: f64,
    /// Current spread in points.
    pub spread_points: f64,
}

impl SymbolInfo {
    /// Typical FX-major defaults, useful in tests and dry runs.
    pub fn fx_default() -> Self {
        Self {
            point: 0.00001,
            tick_value: 1.0,
            contract_size: 100_000.0,
            volume_min: 0.01,
            volume_step: 0.01,
            spread_points: 2.0,
        }
    }
}

/// The broker read-path the pipeline depends on.
pub trait MarketGateway {
    /// Current account equity in the account currency.
    fn account_equity(&self) -> Result<f64, GatewayError>;

    /// Instrument properties and live spread for one symbol.
    fn symbol_info(&self, symbol: &str) -> Result<SymbolInfo, GatewayError>;

    /// Open position counts keyed by symbol.
    fn open_position_counts(&self) -> Result<BTreeMap<String, u32>, GatewayError>;

    /// The most recent `count` bars for a symbol.
    fn historical_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> Result<PriceSeries, GatewayError>;
}
