//! Ultimate accuracy score — the weighted multi-factor composite.
//!
//! Six probability-up sub-scores (each 0-100, 50 neutral) blend into the
//! composite:
//!
//! - short-term six-factor score, weight 30%
//! - long-term six-factor score (same factors, longer windows), weight 30%
//! - candlestick pattern score, weight 20%
//! - Fibonacci level proximity, weight 10%
//! - Hurst persistence read, weight 5%
//! - Ichimoku cloud position, weight 5%
//!
//! Each horizon score itself weighs six factors at 25/20/15/15/15/10:
//! trend vs SMA, RSI zone, volume confirmation, band position, consecutive
//! candles, MACD bias. These weight constants are policy, not tuning
//! artifacts; changing them changes the product.
//!
//! The composite is the `accuracy`: above the caller's minimum it reads
//! buy-side (strong at >= 90), below the mirrored minimum it reads
//! sell-side (strong at <= 10), anything between is `wait`. Strong
//! recommendations trade at 1:3, plain ones at 1:2. Under 100 bars the
//! scorer reports a neutral 50.0 / very_low / wait result with an
//! explanatory note instead of failing.

use crate::config::StrategyParams;
use crate::domain::{Signal, StrategyVerdict};
use crate::indicators::{
    atr, bollinger_bands, fibonacci_retracement, hurst_exponent, ichimoku, macd, rsi, sma,
};
use crate::patterns::{
    is_bearish_engulfing, is_bullish_engulfing, is_evening_star, is_hammer, is_morning_star,
    is_shooting_star,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum history for the full composite.
pub const MIN_BARS: usize = 100;

/// Horizon-blend weights: short, long, pattern, fibonacci, hurst, ichimoku.
const COMPOSITE_WEIGHTS: [f64; 6] = [0.30, 0.30, 0.20, 0.10, 0.05, 0.05];

/// Factor weights inside each horizon score.
const FACTOR_WEIGHTS: [f64; 6] = [25.0, 20.0, 15.0, 15.0, 15.0, 10.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::VeryHigh => "very_high",
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
            Confidence::VeryLow => "very_low",
        }
    }

    fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            Confidence::VeryHigh
        } else if accuracy >= 75.0 {
            Confidence::High
        } else if accuracy >= 60.0 {
            Confidence::Medium
        } else if accuracy >= 45.0 {
            Confidence::Low
        } else {
            Confidence::VeryLow
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    StrongSell,
    Sell,
    Wait,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "strong_buy",
            Recommendation::Buy => "buy",
            Recommendation::StrongSell => "strong_sell",
            Recommendation::Sell => "sell",
            Recommendation::Wait => "wait",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full scorer output, exposed for hosts that display the breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UltimateScore {
    /// The weighted composite, 0-100. Reads as probability-up.
    pub accuracy: f64,
    pub confidence: Confidence,
    pub recommendation: Recommendation,
    pub short_term: f64,
    pub long_term: f64,
    pub pattern: f64,
    pub fibonacci: f64,
    pub hurst: f64,
    pub ichimoku: f64,
    /// Populated when the scorer could not run in full (e.g. short history).
    pub note: Option<String>,
}

impl UltimateScore {
    fn neutral(note: String) -> Self {
        Self {
            accuracy: 50.0,
            confidence: Confidence::VeryLow,
            recommendation: Recommendation::Wait,
            short_term: 50.0,
            long_term: 50.0,
            pattern: 50.0,
            fibonacci: 50.0,
            hurst: 50.0,
            ichimoku: 50.0,
            note: Some(note),
        }
    }
}

/// Compute the composite score. `min_accuracy` gates the recommendation.
pub fn score(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: Option<&[f64]>,
    min_accuracy: f64,
) -> UltimateScore {
    let n = close.len();
    if n < MIN_BARS {
        return UltimateScore::neutral(format!(
            "insufficient data: {n} bars, need {MIN_BARS} for the composite score"
        ));
    }

    let short_term = horizon_score(close, volume, &HorizonWindows::SHORT);
    let long_term = horizon_score(close, volume, &HorizonWindows::LONG);
    let pattern = pattern_score(high, low, close);
    let fibonacci = fibonacci_score(high, low, close);
    let hurst = hurst_score(close);
    let ichimoku = ichimoku_score(high, low, close);

    let parts = [short_term, long_term, pattern, fibonacci, hurst, ichimoku];
    let accuracy: f64 = parts
        .iter()
        .zip(COMPOSITE_WEIGHTS)
        .map(|(score, weight)| score * weight)
        .sum();

    let recommendation = if accuracy >= min_accuracy {
        if accuracy >= 90.0 {
            Recommendation::StrongBuy
        } else {
            Recommendation::Buy
        }
    } else if accuracy <= 100.0 - min_accuracy {
        if accuracy <= 10.0 {
            Recommendation::StrongSell
        } else {
            Recommendation::Sell
        }
    } else {
        Recommendation::Wait
    };

    UltimateScore {
        accuracy,
        confidence: Confidence::from_accuracy(accuracy),
        recommendation,
        short_term,
        long_term,
        pattern,
        fibonacci,
        hurst,
        ichimoku,
        note: None,
    }
}

pub fn evaluate(
    params: &StrategyParams,
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: Option<&[f64]>,
) -> StrategyVerdict {
    let atr_period = params.get_usize("atr_period", 14);
    let atr_multiplier = params.get("atr_multiplier", 2.0);
    let min_accuracy = params.get("min_accuracy", 75.0);

    let result = score(high, low, close, volume, min_accuracy);
    let summary = format!(
        "ultimate accuracy {:.1} ({}), recommendation {}",
        result.accuracy, result.confidence, result.recommendation
    );
    let reason = match &result.note {
        Some(note) => format!("{note}; {summary}"),
        None => summary,
    };

    let n = close.len();
    let (signal, reward_factor) = match result.recommendation {
        Recommendation::StrongBuy => (Signal::Buy, 3.0),
        Recommendation::Buy => (Signal::Buy, 2.0),
        Recommendation::StrongSell => (Signal::Sell, 3.0),
        Recommendation::Sell => (Signal::Sell, 2.0),
        Recommendation::Wait => {
            return with_breakdown(StrategyVerdict::no_trade(reason), &result);
        }
    };

    let curr_close = close[n - 1];
    let curr_atr = atr(high, low, close, atr_period)[n - 1];
    let stop_distance = atr_multiplier * curr_atr;
    let (stop, target) = match signal {
        Signal::Buy => (
            curr_close - stop_distance,
            curr_close + stop_distance * reward_factor,
        ),
        _ => (
            curr_close + stop_distance,
            curr_close - stop_distance * reward_factor,
        ),
    };

    with_breakdown(
        StrategyVerdict::trade(signal, curr_close, stop, target, curr_atr, reason),
        &result,
    )
}

fn with_breakdown(verdict: StrategyVerdict, result: &UltimateScore) -> StrategyVerdict {
    verdict
        .with_debug("ultimate_accuracy", result.accuracy)
        .with_debug("short_term", result.short_term)
        .with_debug("long_term", result.long_term)
        .with_debug("pattern", result.pattern)
        .with_debug("fibonacci", result.fibonacci)
        .with_debug("hurst", result.hurst)
        .with_debug("ichimoku", result.ichimoku)
}

// ─── Horizon scores ──────────────────────────────────────────────────

struct HorizonWindows {
    ma_period: usize,
    rsi_period: usize,
    volume_ma_period: usize,
    band_period: usize,
    candle_cap: usize,
    macd: (usize, usize, usize),
}

impl HorizonWindows {
    const SHORT: Self = Self {
        ma_period: 20,
        rsi_period: 14,
        volume_ma_period: 20,
        band_period: 20,
        candle_cap: 3,
        macd: (12, 26, 9),
    };
    const LONG: Self = Self {
        ma_period: 50,
        rsi_period: 21,
        volume_ma_period: 50,
        band_period: 50,
        candle_cap: 5,
        macd: (24, 52, 18),
    };
}

/// Six-factor probability-up score for one horizon, 0-100.
fn horizon_score(close: &[f64], volume: Option<&[f64]>, windows: &HorizonWindows) -> f64 {
    let factors = [
        trend_factor(close, windows.ma_period),
        rsi_zone_factor(close, windows.rsi_period),
        volume_factor(close, volume, windows.volume_ma_period),
        band_position_factor(close, windows.band_period),
        consecutive_candle_factor(close, windows.candle_cap),
        macd_bias_factor(close, windows.macd),
    ];
    factors
        .iter()
        .zip(FACTOR_WEIGHTS)
        .map(|(score, weight)| score * weight / 100.0)
        .sum()
}

/// Exposed to the AI multi-factor strategy, which scales the short-term
/// score into its probability bonus.
pub(crate) fn short_term_score(close: &[f64], volume: Option<&[f64]>) -> f64 {
    horizon_score(close, volume, &HorizonWindows::SHORT)
}

fn trend_factor(close: &[f64], ma_period: usize) -> f64 {
    let n = close.len();
    let ma = sma(close, ma_period)[n - 1];
    if !ma.is_finite() {
        return 50.0;
    }
    if close[n - 1] > ma {
        100.0
    } else if close[n - 1] < ma {
        0.0
    } else {
        50.0
    }
}

fn rsi_zone_factor(close: &[f64], period: usize) -> f64 {
    let r = rsi(close, period)[close.len() - 1];
    if !r.is_finite() {
        return 50.0;
    }
    if r < 30.0 {
        75.0 // oversold: reversion up is the likelier path
    } else if r <= 50.0 {
        40.0
    } else if r <= 70.0 {
        65.0 // bullish momentum without exhaustion
    } else {
        25.0 // overbought
    }
}

fn volume_factor(close: &[f64], volume: Option<&[f64]>, ma_period: usize) -> f64 {
    let Some(volume) = volume else {
        return 50.0;
    };
    let n = close.len();
    if n < 2 {
        return 50.0;
    }
    let vol_ma = sma(volume, ma_period)[n - 1];
    if !vol_ma.is_finite() || volume[n - 1] <= vol_ma {
        return 50.0;
    }
    // Elevated volume confirms whichever way the last bar moved.
    if close[n - 1] > close[n - 2] {
        70.0
    } else if close[n - 1] < close[n - 2] {
        30.0
    } else {
        50.0
    }
}

fn band_position_factor(close: &[f64], period: usize) -> f64 {
    let n = close.len();
    let (upper, _, lower) = bollinger_bands(close, period, 2.0);
    let width = upper[n - 1] - lower[n - 1];
    if !width.is_finite() || width <= 0.0 {
        return 50.0;
    }
    let percent_b = (close[n - 1] - lower[n - 1]) / width;
    if percent_b <= 0.2 {
        75.0 // hugging the lower band
    } else if percent_b >= 0.8 {
        25.0 // hugging the upper band
    } else {
        50.0
    }
}

/// Streak of consecutive closes in one direction, graded up to `cap` bars:
/// a full streak up reads 80, a full streak down 20.
fn consecutive_candle_factor(close: &[f64], cap: usize) -> f64 {
    let n = close.len();
    if n < 2 || cap == 0 {
        return 50.0;
    }
    let last_delta = close[n - 1] - close[n - 2];
    if last_delta == 0.0 {
        return 50.0;
    }
    let rising = last_delta > 0.0;
    let mut streak = 0usize;
    for i in (1..n).rev() {
        let delta = close[i] - close[i - 1];
        let same_way = if rising { delta > 0.0 } else { delta < 0.0 };
        if !same_way {
            break;
        }
        streak += 1;
        if streak == cap {
            break;
        }
    }
    let strength = streak as f64 / cap as f64;
    if rising {
        50.0 + 30.0 * strength
    } else {
        50.0 - 30.0 * strength
    }
}

fn macd_bias_factor(close: &[f64], (fast, slow, signal): (usize, usize, usize)) -> f64 {
    let (_, _, histogram) = macd(close, fast, slow, signal);
    let h = histogram[close.len() - 1];
    if !h.is_finite() || h == 0.0 {
        50.0
    } else if h > 0.0 {
        70.0
    } else {
        30.0
    }
}

// ─── Auxiliary sub-scores ────────────────────────────────────────────

const PATTERN_POINTS: f64 = 15.0;

/// Candlestick pattern score around 50, +/- 15 per pattern hit.
///
/// Open prices are not part of the strategy input contract, so each bar's
/// open is approximated by the previous close (open[0] = close[0]).
fn pattern_score(high: &[f64], low: &[f64], close: &[f64]) -> f64 {
    let open = super::synthetic_opens(close);
    let mut score = 50.0;
    if is_hammer(&open, high, low, close) {
        score += PATTERN_POINTS;
    }
    if is_bullish_engulfing(&open, high, low, close) {
        score += PATTERN_POINTS;
    }
    if is_morning_star(&open, high, low, close) {
        score += PATTERN_POINTS;
    }
    if is_shooting_star(&open, high, low, close) {
        score -= PATTERN_POINTS;
    }
    if is_bearish_engulfing(&open, high, low, close) {
        score -= PATTERN_POINTS;
    }
    if is_evening_star(&open, high, low, close) {
        score -= PATTERN_POINTS;
    }
    score.clamp(0.0, 100.0)
}

const FIB_LOOKBACK: usize = 50;
const FIB_TOLERANCE: f64 = 0.02;

/// Price holding just above a retracement level reads as support (70),
/// just below as resistance (30); away from any level is neutral.
fn fibonacci_score(high: &[f64], low: &[f64], close: &[f64]) -> f64 {
    let Some(fib) = fibonacci_retracement(high, low, FIB_LOOKBACK) else {
        return 50.0;
    };
    let last = close[close.len() - 1];
    let level = fib.nearest_level(last);
    if (last - level).abs() > FIB_TOLERANCE * fib.range() {
        return 50.0;
    }
    if last >= level {
        70.0
    } else {
        30.0
    }
}

const HURST_MAX_LAG: usize = 20;

/// Persistent markets score with the SMA20 trend, anti-persistent markets
/// against it.
fn hurst_score(close: &[f64]) -> f64 {
    let n = close.len();
    let h = hurst_exponent(close, HURST_MAX_LAG);
    let ma = sma(close, 20)[n - 1];
    if !ma.is_finite() || close[n - 1] == ma {
        return 50.0;
    }
    let above = close[n - 1] > ma;
    if h >= 0.55 {
        if above {
            75.0
        } else {
            25.0
        }
    } else if h <= 0.45 {
        if above {
            35.0
        } else {
            65.0
        }
    } else {
        50.0
    }
}

/// Close above the (undisplaced) cloud reads bullish, below bearish.
fn ichimoku_score(high: &[f64], low: &[f64], close: &[f64]) -> f64 {
    let n = close.len();
    let lines = ichimoku(high, low, close, 9, 26, 52);
    let a = lines.senkou_a[n - 1];
    let b = lines.senkou_b[n - 1];
    if !a.is_finite() || !b.is_finite() {
        return 50.0;
    }
    let top = a.max(b);
    let bottom = a.min(b);
    if close[n - 1] > top {
        75.0
    } else if close[n - 1] < bottom {
        25.0
    } else {
        50.0
    }
}
