//! Market regime classification from trailing returns.
//!
//! A simplified Sharpe-like ratio (mean return over return dispersion) and
//! the raw dispersion bucket the window into four regimes. Thresholds are
//! tuned for daily FX/CFD bars:
//!
//! - dispersion > 3% per bar: Crisis
//! - |mean/dispersion| >= 0.5: Trending
//! - dispersion > 1.2% per bar: Volatile
//! - otherwise: Ranging

const EPSILON: f64 = 1e-10;
const CRISIS_VOL: f64 = 0.03;
const TREND_RATIO: f64 = 0.5;
const VOLATILE_VOL: f64 = 0.012;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketRegime {
    Trending,
    Volatile,
    Ranging,
    Crisis,
}

/// Classify the trailing `window` bars. Short or flat input reads Ranging.
pub fn market_regime(close: &[f64], window: usize) -> MarketRegime {
    let n = close.len();
    if window < 2 || n < window + 1 {
        return MarketRegime::Ranging;
    }

    let returns: Vec<f64> = (n - window..n)
        .map(|i| close[i] / close[i - 1] - 1.0)
        .collect();
    let mean = returns.iter().sum::<f64>() / window as f64;
    let var = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / window as f64;
    let vol = var.sqrt();

    if vol > CRISIS_VOL {
        MarketRegime::Crisis
    } else if (mean / (vol + EPSILON)).abs() >= TREND_RATIO {
        MarketRegime::Trending
    } else if vol > VOLATILE_VOL {
        MarketRegime::Volatile
    } else {
        MarketRegime::Ranging
    }
}
