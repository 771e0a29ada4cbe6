//! Price/indicator divergence detection.
//!
//! Compares the current bar against the extremes of the preceding `lookback`
//! bars (current bar excluded). Bullish: price prints a new low while the
//! indicator holds above its window low. Bearish: price prints a new high
//! while the indicator rolls over below its window high.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Divergence {
    Bullish,
    Bearish,
}

/// Detect a divergence at the latest bar, or None.
///
/// NaN entries in either window are ignored; if a window has no finite
/// values (or there is not enough history) no divergence is reported.
pub fn detect_divergence(price: &[f64], indicator: &[f64], lookback: usize) -> Option<Divergence> {
    let n = price.len().min(indicator.len());
    if lookback == 0 || n < lookback + 1 {
        return None;
    }

    let curr_price = price[n - 1];
    let curr_ind = indicator[n - 1];
    if !curr_price.is_finite() || !curr_ind.is_finite() {
        return None;
    }

    let price_window = &price[n - 1 - lookback..n - 1];
    let ind_window = &indicator[n - 1 - lookback..n - 1];

    let (price_min, price_max) = finite_extremes(price_window)?;
    let (ind_min, ind_max) = finite_extremes(ind_window)?;

    if curr_price < price_min && curr_ind > ind_min {
        Some(Divergence::Bullish)
    } else if curr_price > price_max && curr_ind < ind_max {
        Some(Divergence::Bearish)
    } else {
        None
    }
}

fn finite_extremes(values: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min.is_finite() {
        Some((min, max))
    } else {
        None
    }
}
