//! Supertrend — ATR-band trend follower.
//!
//! Basic bands = midpoint(high, low) +/- multiplier * ATR. Bands are sticky:
//! each band only ratchets while the prior close sits beyond the prior
//! settled band value. The trend flips to down when close <= upper band,
//! to up otherwise; the returned line is always the active band (lower band
//! while trending up, upper band while trending down) and direction is
//! +1.0 / -1.0. Index 0 is defined as trending up on the lower band.

use super::atr::atr;

/// Returns `(line, direction)` with direction values in {-1.0, +1.0}.
pub fn supertrend(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    atr_period: usize,
    multiplier: f64,
) -> (Vec<f64>, Vec<f64>) {
    let n = close.len();
    let mut line = vec![f64::NAN; n];
    let mut direction = vec![1.0; n];
    if n == 0 {
        return (line, direction);
    }

    let atr = atr(high, low, close, atr_period);
    let mut upper: Vec<f64> = (0..n)
        .map(|i| (high[i] + low[i]) / 2.0 + multiplier * atr[i])
        .collect();
    let mut lower: Vec<f64> = (0..n)
        .map(|i| (high[i] + low[i]) / 2.0 - multiplier * atr[i])
        .collect();

    line[0] = lower[0];
    for i in 1..n {
        if close[i - 1] > upper[i - 1] {
            upper[i] = upper[i].max(upper[i - 1]);
        }
        if close[i - 1] < lower[i - 1] {
            lower[i] = lower[i].min(lower[i - 1]);
        }

        if close[i] <= upper[i] {
            line[i] = upper[i];
            direction[i] = -1.0;
        } else {
            line[i] = lower[i];
            direction[i] = 1.0;
        }
    }
    (line, direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::bracket;

    #[test]
    fn direction_is_always_plus_or_minus_one() {
        let close: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 10.0)
            .collect();
        let (high, low) = bracket(&close, 2.0);
        let (_, direction) = supertrend(&high, &low, &close, 10, 3.0);
        assert!(direction.iter().all(|&d| d == 1.0 || d == -1.0));
    }

    #[test]
    fn line_equals_active_band() {
        // While close stays at or below the upper band the trend is down and
        // the line is the upper band, above price.
        let close: Vec<f64> = (0..30).map(|i| 200.0 - 5.0 * i as f64).collect();
        let (high, low) = bracket(&close, 1.0);
        let (line, direction) = supertrend(&high, &low, &close, 5, 1.0);
        for i in 1..30 {
            assert_eq!(direction[i], -1.0);
            assert!(
                line[i] > close[i],
                "downtrend line {} should be above close {} at {i}",
                line[i],
                close[i]
            );
        }
    }

    #[test]
    fn burst_through_upper_band_flips_trend_up() {
        // Quiet bars, then one wide bar closing at its high: the close
        // clears midpoint + multiplier * ATR and the trend flips up, putting
        // the line on the lower band, below price.
        let mut close = vec![100.0; 20];
        close.push(103.0);
        let mut high: Vec<f64> = close.iter().map(|c| c + 0.1).collect();
        let mut low: Vec<f64> = close.iter().map(|c| c - 0.1).collect();
        // Final bar: range 100.0 .. 103.0, closing on the high.
        high[20] = 103.0;
        low[20] = 100.0;

        let (line, direction) = supertrend(&high, &low, &close, 10, 2.0);
        assert_eq!(direction[19], -1.0);
        assert_eq!(direction[20], 1.0);
        assert!(line[20] < close[20]);
    }

    #[test]
    fn single_bar_defaults_to_uptrend() {
        let (line, direction) = supertrend(&[105.0], &[95.0], &[100.0], 10, 3.0);
        assert_eq!(direction[0], 1.0);
        // lower band = 100 - 3 * 10 = 70
        assert_eq!(line[0], 70.0);
    }
}
