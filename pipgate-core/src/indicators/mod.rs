//! Technical indicator library.
//!
//! Pure functions over `&[f64]` price columns. Every function returns output
//! aligned index-for-index with its input. Two warmup conventions apply:
//!
//! - Rolling-window indicators (`sma`, `bollinger_bands`, `donchian_channel`,
//!   the Ichimoku lines, `mfi`) leave the first `period - 1` entries NaN.
//! - Exponential-recurrence indicators (`ema`, `atr`, `rsi`, `macd`, the ADX
//!   smoothing) are defined from index 0, seeded with the first raw value:
//!   no SMA seed and no bias correction.
//!
//! None of these functions panic or error on short input; they produce the
//! degenerate output the recurrence dictates (all-NaN for rolling windows).
//! Callers are responsible for checking that enough history is present;
//! the strategy layer does this before trusting any trailing value.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod donchian;
pub mod ema;
pub mod fibonacci;
pub mod hurst;
pub mod ichimoku;
pub mod kalman;
pub mod macd;
pub mod mfi;
pub mod regression;
pub mod rsi;
pub mod sma;
pub mod supertrend;
pub mod vwap;

pub use adx::adx;
pub use atr::{atr, true_range, wilder_smooth};
pub use bollinger::bollinger_bands;
pub use donchian::{donchian_channel, rolling_max, rolling_min};
pub use ema::ema;
pub use fibonacci::{fibonacci_retracement, FibLevels, FIB_RATIOS};
pub use hurst::hurst_exponent;
pub use ichimoku::{ichimoku, IchimokuLines};
pub use kalman::kalman_filter;
pub use macd::macd;
pub use mfi::mfi;
pub use regression::linear_regression;
pub use rsi::rsi;
pub use sma::sma;
pub use supertrend::supertrend;
pub use vwap::vwap;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Synthetic high/low columns bracketing a close column, for tests that need
/// all three.
#[cfg(test)]
pub fn bracket(close: &[f64], width: f64) -> (Vec<f64>, Vec<f64>) {
    let high = close.iter().map(|c| c + width).collect();
    let low = close.iter().map(|c| c - width).collect();
    (high, low)
}
