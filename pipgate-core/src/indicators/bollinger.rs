//! Bollinger Bands — SMA middle band +/- a stddev multiplier.
//!
//! Middle band is exactly [`crate::indicators::sma`] (same code path, so the
//! two agree bit-for-bit). Bands use the rolling sample standard deviation
//! (ddof = 1). First `period - 1` outputs NaN; period 1 yields zero-width
//! bands (sample stddev of one value is taken as 0).

use super::sma::sma;

/// Returns `(upper, middle, lower)`.
pub fn bollinger_bands(
    values: &[f64],
    period: usize,
    std_dev_multiplier: f64,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = values.len();
    let middle = sma(values, period);
    let mut upper = vec![f64::NAN; n];
    let mut lower = vec![f64::NAN; n];
    if period == 0 || n < period {
        return (upper, middle, lower);
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        let mean = middle[i];
        let std = if period == 1 {
            0.0
        } else {
            let var = window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>()
                / (period as f64 - 1.0);
            var.sqrt()
        };
        upper[i] = mean + std_dev_multiplier * std;
        lower[i] = mean - std_dev_multiplier * std;
    }
    (upper, middle, lower)
}
