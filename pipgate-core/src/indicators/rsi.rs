//! Relative Strength Index (RSI).
//!
//! Per-bar deltas (delta[0] defined as 0) split into gains and losses, each
//! Wilder-smoothed (alpha = 1/period, seeded at index 0). RS uses an epsilon
//! in the denominator so a loss-free series reads as RSI -> 100 rather than
//! dividing by zero.

use super::atr::wilder_smooth;

const EPSILON: f64 = 1e-10;

/// Bounded 0-100 momentum oscillator.
pub fn rsi(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if n == 0 || period == 0 {
        return vec![f64::NAN; n];
    }

    let mut gains = vec![0.0; n];
    let mut losses = vec![0.0; n];
    for i in 1..n {
        let delta = values[i] - values[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else {
            losses[i] = -delta;
        }
    }

    let avg_gain = wilder_smooth(&gains, period);
    let avg_loss = wilder_smooth(&losses, period);

    (0..n)
        .map(|i| {
            let rs = avg_gain[i] / (avg_loss[i] + EPSILON);
            100.0 - 100.0 / (1.0 + rs)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_rises_toward_100_on_monotonic_gains() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&values, 14);
        assert!(out[59] > 99.0, "got {}", out[59]);
        // and is monotonically attracted upward after the seed
        assert!(out[59] >= out[20]);
    }

    #[test]
    fn rsi_falls_toward_0_on_monotonic_losses() {
        let values: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let out = rsi(&values, 14);
        assert!(out[59] < 1.0, "got {}", out[59]);
    }

    #[test]
    fn rsi_stays_in_bounds() {
        let values = [100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0];
        for &v in rsi(&values, 3).iter() {
            assert!((0.0..=100.0).contains(&v), "RSI out of bounds: {v}");
        }
    }

    #[test]
    fn rsi_output_matches_input_length() {
        for n in 0..10 {
            let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
            assert_eq!(rsi(&values, 14).len(), n);
        }
    }

    #[test]
    fn rsi_flat_series_reads_zero() {
        // No gains and no losses: RS = 0/(0 + eps) = 0 -> RSI = 0.
        let out = rsi(&[1.1; 30], 14);
        assert!(out.iter().all(|&v| v == 0.0));
    }
}
