//! MACD — Moving Average Convergence Divergence.
//!
//! macd = EMA(fast) - EMA(slow); signal = EMA(macd, signal_period);
//! histogram = macd - signal. All three inherit the EMA seed-at-index-0
//! convention, so the full output is defined (though early values carry
//! little information until the slow EMA has seen enough bars).

use super::ema::ema;

/// Returns `(macd_line, signal_line, histogram)`.
pub fn macd(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let ema_fast = ema(values, fast);
    let ema_slow = ema(values, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&macd_line, signal_period);
    let histogram: Vec<f64> = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    (macd_line, signal_line, histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn macd_zero_on_constant_series() {
        let (line, signal, hist) = macd(&[1.5; 60], 12, 26, 9);
        for i in 0..60 {
            assert_approx(line[i], 0.0, DEFAULT_EPSILON);
            assert_approx(signal[i], 0.0, DEFAULT_EPSILON);
            assert_approx(hist[i], 0.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn macd_positive_in_sustained_uptrend() {
        let values: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
        let (line, _, hist) = macd(&values, 12, 26, 9);
        // Fast EMA tracks a rising series more closely than the slow EMA.
        assert!(line[79] > 0.0);
        assert!(hist[79] >= 0.0);
    }

    #[test]
    fn histogram_is_line_minus_signal() {
        let values: Vec<f64> = (0..50).map(|i| (i as f64 * 0.3).sin() + 10.0).collect();
        let (line, signal, hist) = macd(&values, 5, 13, 4);
        for i in 0..50 {
            assert_approx(hist[i], line[i] - signal[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn macd_output_matches_input_length() {
        let values: Vec<f64> = (0..7).map(|i| i as f64).collect();
        let (line, signal, hist) = macd(&values, 12, 26, 9);
        assert_eq!(line.len(), 7);
        assert_eq!(signal.len(), 7);
        assert_eq!(hist.len(), 7);
    }
}
