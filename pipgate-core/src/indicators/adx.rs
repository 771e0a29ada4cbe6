//! Average Directional Index (ADX) with the DI+ / DI- components.
//!
//! Directional movement from consecutive high/low deltas: only the larger of
//! the up-move and down-move counts, and only when positive. DM and TR are
//! Wilder-smoothed; DI = 100 * smoothed DM / smoothed TR; DX folds the DI
//! spread into 0-100 and ADX is the Wilder smoothing of DX.

use super::atr::{true_range, wilder_smooth};

const EPSILON: f64 = 1e-10;

/// Returns `(adx, di_plus, di_minus)`.
pub fn adx(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = close.len();
    if n == 0 || period == 0 {
        return (vec![f64::NAN; n], vec![f64::NAN; n], vec![f64::NAN; n]);
    }

    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];
    for i in 1..n {
        let up = high[i] - high[i - 1];
        let down = low[i - 1] - low[i];
        if up > down && up > 0.0 {
            plus_dm[i] = up;
        }
        if down > up && down > 0.0 {
            minus_dm[i] = down;
        }
    }

    let tr = true_range(high, low, close);
    let smoothed_tr = wilder_smooth(&tr, period);
    let smoothed_plus = wilder_smooth(&plus_dm, period);
    let smoothed_minus = wilder_smooth(&minus_dm, period);

    let mut di_plus = vec![0.0; n];
    let mut di_minus = vec![0.0; n];
    let mut dx = vec![0.0; n];
    for i in 0..n {
        if smoothed_tr[i] > 0.0 {
            di_plus[i] = 100.0 * smoothed_plus[i] / smoothed_tr[i];
            di_minus[i] = 100.0 * smoothed_minus[i] / smoothed_tr[i];
        }
        dx[i] = 100.0 * (di_plus[i] - di_minus[i]).abs() / (di_plus[i] + di_minus[i] + EPSILON);
    }

    (wilder_smooth(&dx, period), di_plus, di_minus)
}
