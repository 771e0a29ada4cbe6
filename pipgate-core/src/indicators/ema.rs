//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * values[t] + (1 - alpha) * EMA[t-1],
//! alpha = 2 / (period + 1). Seeded with the first raw value, so the output
//! is defined from index 0 and there is no bias-correction ramp.

/// Exponentially weighted mean, seeded with `values[0]`.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if n == 0 || period == 0 {
        return out;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = values[0];
    out[0] = prev;
    for i in 1..n {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        out[i] = prev;
    }
    out
}
