//! Momentum quality index.
//!
//! Blends three normalized momentum reads into [0, 1]:
//! normalized RSI (weight 0.4), a 14-bar stochastic %K (0.3) and an
//! MFI-derived ratio (0.3). When no volume column is available the index
//! degrades to the RSI component alone.

use crate::indicators::{mfi, rolling_max, rolling_min, rsi};

const STOCH_PERIOD: usize = 14;
const EPSILON: f64 = 1e-10;

/// Momentum quality at the latest bar, in [0, 1]. 0.5 is neutral.
pub fn momentum_quality(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: Option<&[f64]>,
    period: usize,
) -> f64 {
    let n = close.len();
    if n == 0 || period == 0 {
        return 0.5;
    }

    let rsi_component = {
        let r = rsi(close, period);
        r[n - 1] / 100.0
    };

    let volume = match volume {
        Some(v) => v,
        None => return rsi_component.clamp(0.0, 1.0),
    };

    let stoch_component = if n >= STOCH_PERIOD {
        let hh = rolling_max(high, STOCH_PERIOD)[n - 1];
        let ll = rolling_min(low, STOCH_PERIOD)[n - 1];
        (close[n - 1] - ll) / (hh - ll + EPSILON)
    } else {
        0.5
    };

    let mfi_component = {
        let m = mfi(high, low, close, volume, period);
        let last = m[n - 1];
        if last.is_finite() {
            last / 100.0
        } else {
            0.5
        }
    };

    (0.4 * rsi_component + 0.3 * stoch_component + 0.3 * mfi_component).clamp(0.0, 1.0)
}
