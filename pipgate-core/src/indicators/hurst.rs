//! Hurst exponent — rescaled-range proxy via lag-differenced dispersion.
//!
//! For each lag in 2..=max_lag, take the standard deviation of the
//! lag-differenced series; regress ln(std) on ln(lag). The slope is the
//! Hurst estimate, clipped to [0, 1]. H > 0.5 reads as trending, H < 0.5
//! as mean-reverting, 0.5 as a random walk.
//!
//! Degenerate input (too short, flat, or non-finite dispersion) returns 0.5.

/// Estimate the Hurst exponent of `values` using lags 2..=max_lag.
pub fn hurst_exponent(values: &[f64], max_lag: usize) -> f64 {
    let n = values.len();
    if max_lag < 2 || n < max_lag + 2 {
        return 0.5;
    }

    let mut log_lags = Vec::with_capacity(max_lag - 1);
    let mut log_taus = Vec::with_capacity(max_lag - 1);
    for lag in 2..=max_lag {
        let diffs: Vec<f64> = (lag..n).map(|i| values[i] - values[i - lag]).collect();
        let tau = std_dev(&diffs);
        if !(tau > 0.0) || !tau.is_finite() {
            return 0.5;
        }
        log_lags.push((lag as f64).ln());
        log_taus.push(tau.ln());
    }

    match slope(&log_lags, &log_taus) {
        Some(h) if h.is_finite() => h.clamp(0.0, 1.0),
        _ => 0.5,
    }
}

fn std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
    var.sqrt()
}

fn slope(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xx: f64 = x.iter().map(|v| v * v).sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let denom = n * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return None;
    }
    Some((n * sum_xy - sum_x * sum_y) / denom)
}
