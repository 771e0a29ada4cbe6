//! Price series — the fundamental market data unit.
//!
//! An ordered sequence of OHLCV bars for one symbol. Timestamps must be
//! strictly increasing; gaps are allowed. Indicators never see this struct,
//! they receive `&[f64]` slices via the accessors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Errors raised when assembling a [`PriceSeries`] from raw columns.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    #[error("column length mismatch: open={open}, high={high}, low={low}, close={close}, timestamps={timestamps}")]
    LengthMismatch {
        open: usize,
        high: usize,
        low: usize,
        close: usize,
        timestamps: usize,
    },
    #[error("volume column length {volume} does not match {bars} bars")]
    VolumeLengthMismatch { volume: usize, bars: usize },
    #[error("timestamps not strictly increasing at index {index}")]
    NonMonotonicTimestamps { index: usize },
}

/// OHLCV columns for a single symbol, oldest bar first.
///
/// Volume is optional: CFD feeds often report none, and every consumer is
/// required to degrade gracefully without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    timestamps: Vec<DateTime<Utc>>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Option<Vec<f64>>,
}

impl PriceSeries {
    /// Build a series from parallel columns, validating shape and ordering.
    pub fn new(
        symbol: impl Into<String>,
        timestamps: Vec<DateTime<Utc>>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Option<Vec<f64>>,
    ) -> Result<Self, SeriesError> {
        let n = close.len();
        if open.len() != n || high.len() != n || low.len() != n || timestamps.len() != n {
            return Err(SeriesError::LengthMismatch {
                open: open.len(),
                high: high.len(),
                low: low.len(),
                close: n,
                timestamps: timestamps.len(),
            });
        }
        if let Some(v) = &volume {
            if v.len() != n {
                return Err(SeriesError::VolumeLengthMismatch {
                    volume: v.len(),
                    bars: n,
                });
            }
        }
        for i in 1..n {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(SeriesError::NonMonotonicTimestamps { index: i });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            timestamps,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn open(&self) -> &[f64] {
        &self.open
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> Option<&[f64]> {
        self.volume.as_deref()
    }
}
