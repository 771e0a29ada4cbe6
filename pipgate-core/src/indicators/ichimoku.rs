//! Ichimoku Kinko Hyo lines.
//!
//! Conversion (tenkan) and base (kijun) lines are midpoints of rolling
//! high/low extremes over their windows; leading span A is the midpoint of
//! those two; leading span B is the midpoint over its own longer window.
//!
//! The lagging span (chikou) is returned as the raw close series with NO
//! backward displacement, and spans A/B carry no forward displacement
//! either: downstream scorers consume the undisplaced values as-is, so a
//! caller wanting textbook chart alignment must shift the spans itself.

use super::donchian::{rolling_max, rolling_min};

/// All five Ichimoku lines, index-aligned with the input.
#[derive(Debug, Clone)]
pub struct IchimokuLines {
    pub tenkan: Vec<f64>,
    pub kijun: Vec<f64>,
    pub senkou_a: Vec<f64>,
    pub senkou_b: Vec<f64>,
    pub chikou: Vec<f64>,
}

fn midpoint_line(high: &[f64], low: &[f64], period: usize) -> Vec<f64> {
    rolling_max(high, period)
        .iter()
        .zip(rolling_min(low, period))
        .map(|(hi, lo)| (hi + lo) / 2.0)
        .collect()
}

pub fn ichimoku(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    tenkan_period: usize,
    kijun_period: usize,
    senkou_b_period: usize,
) -> IchimokuLines {
    let tenkan = midpoint_line(high, low, tenkan_period);
    let kijun = midpoint_line(high, low, kijun_period);
    let senkou_a: Vec<f64> = tenkan
        .iter()
        .zip(&kijun)
        .map(|(t, k)| (t + k) / 2.0)
        .collect();
    let senkou_b = midpoint_line(high, low, senkou_b_period);

    IchimokuLines {
        tenkan,
        kijun,
        senkou_a,
        senkou_b,
        chikou: close.to_vec(),
    }
}
