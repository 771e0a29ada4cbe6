//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), with
//! TR[0] = high[0] - low[0] (no previous close exists).
//! ATR is the Wilder smoothing of TR: an exponential recurrence with
//! alpha = 1/period, seeded with TR[0], so the output is defined from
//! index 0. Trailing values only become meaningful once roughly `period`
//! bars have passed; the strategy layer enforces that.

/// Per-bar true range. Columns must be the same length.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let n = close.len();
    let mut tr = vec![f64::NAN; n];
    if n == 0 {
        return tr;
    }

    tr[0] = high[0] - low[0];
    for i in 1..n {
        let hl = high[i] - low[i];
        let hc = (high[i] - close[i - 1]).abs();
        let lc = (low[i] - close[i - 1]).abs();
        tr[i] = hl.max(hc).max(lc);
    }
    tr
}

/// Wilder smoothing: exponential recurrence with alpha = 1/period, seeded
/// with the first input value.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if n == 0 || period == 0 {
        return out;
    }

    let alpha = 1.0 / period as f64;
    let mut prev = values[0];
    out[0] = prev;
    for i in 1..n {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        out[i] = prev;
    }
    out
}

/// Wilder-smoothed average true range.
pub fn atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    wilder_smooth(&true_range(high, low, close), period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn true_range_first_bar_is_high_minus_low() {
        let tr = true_range(&[105.0], &[95.0], &[102.0]);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_uses_previous_close() {
        // Gap up: prev close 100, bar 108-115
        let tr = true_range(&[102.0, 115.0], &[97.0, 108.0], &[100.0, 112.0]);
        assert_approx(tr[0], 5.0, DEFAULT_EPSILON);
        // max(7, |115-100|, |108-100|) = 15
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_recurrence_from_first_bar() {
        let high = [105.0, 108.0, 107.0];
        let low = [95.0, 100.0, 98.0];
        let close = [102.0, 106.0, 99.0];
        // TR = [10, 8, 9]; alpha = 1/2
        // ATR[0] = 10; ATR[1] = 0.5*8 + 0.5*10 = 9; ATR[2] = 0.5*9 + 0.5*9 = 9
        let out = atr(&high, &low, &close, 2);
        assert_approx(out[0], 10.0, DEFAULT_EPSILON);
        assert_approx(out[1], 9.0, DEFAULT_EPSILON);
        assert_approx(out[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_output_matches_input_length() {
        let close = [100.0, 101.0, 102.0, 103.0];
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();
        assert_eq!(atr(&high, &low, &close, 14).len(), 4);
    }

    #[test]
    fn wilder_smooth_constant_series() {
        let out = wilder_smooth(&[4.0; 20], 14);
        for &v in &out {
            assert_approx(v, 4.0, DEFAULT_EPSILON);
        }
    }
}
