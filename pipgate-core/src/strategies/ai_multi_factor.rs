//! AI multi-factor scorer — bullish vs bearish point accumulation.
//!
//! Six component groups award points to a bullish and a bearish total on a
//! 0-110 scale:
//!
//! - candlestick patterns: 10 points per hit (up to three per side)
//! - market regime: 15 points with the trend while the regime is trending
//! - momentum quality: 15 points at conviction, 8 at a lean
//! - probability model: up to 20 points; the short-term composite sub-score
//!   is the prior, Bayes-refined by a growth-rate projection
//! - trend structure: 10 for Hurst persistence with price vs SMA20 plus 10
//!   for the Ichimoku cloud side
//! - ADX strength: 10 points to the dominant DI side when ADX >= 25
//!
//! A side must reach 35 points AND strictly beat the other side to fire;
//! anything else is a no-trade carrying a diagnostic of the weak
//! components. The 35-point gate and the per-component point values are
//! policy constants.

use crate::config::StrategyParams;
use crate::domain::{Signal, StrategyVerdict};
use crate::indicators::{adx, atr, hurst_exponent, ichimoku, sma};
use crate::patterns::{
    is_bearish_engulfing, is_bullish_engulfing, is_evening_star, is_hammer, is_morning_star,
    is_shooting_star, market_regime, momentum_quality, MarketRegime,
};
use crate::probability::{bayes_update, project_growth};

use super::ultimate_accuracy::short_term_score;
use super::{insufficient_data, synthetic_opens};

/// Minimum history: enough for the 52-bar Ichimoku window plus slack for
/// the Hurst lags.
pub const MIN_BARS: usize = 60;

/// Points a side must reach before a signal can fire.
pub const SIGNAL_GATE: f64 = 35.0;

const PATTERN_POINTS: f64 = 10.0;
const REGIME_POINTS: f64 = 15.0;
const MOMENTUM_POINTS: f64 = 15.0;
const MOMENTUM_LEAN_POINTS: f64 = 8.0;
const PROBABILITY_POINTS: f64 = 20.0;
const HURST_POINTS: f64 = 10.0;
const ICHIMOKU_POINTS: f64 = 10.0;
const ADX_POINTS: f64 = 10.0;
const ADX_THRESHOLD: f64 = 25.0;

struct Component {
    name: &'static str,
    bullish: f64,
    bearish: f64,
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

    let n = close.len();
    if n < MIN_BARS {
        return insufficient_data(n, MIN_BARS);
    }

    let components = [
        pattern_component(high, low, close),
        regime_component(close),
        momentum_component(high, low, close, volume),
        probability_component(close, volume),
        trend_component(high, low, close),
        adx_component(high, low, close),
    ];

    let bullish: f64 = components.iter().map(|c| c.bullish).sum();
    let bearish: f64 = components.iter().map(|c| c.bearish).sum();

    let signal = if bullish >= SIGNAL_GATE && bullish > bearish {
        Signal::Buy
    } else if bearish >= SIGNAL_GATE && bearish > bullish {
        Signal::Sell
    } else {
        let weak: Vec<&str> = components
            .iter()
            .filter(|c| c.bullish == 0.0 && c.bearish == 0.0)
            .map(|c| c.name)
            .collect();
        let detail = if weak.is_empty() {
            String::new()
        } else {
            format!("; no contribution from: {}", weak.join(", "))
        };
        let verdict = StrategyVerdict::no_trade(format!(
            "neither side cleared the gate (bullish {bullish:.1}, bearish {bearish:.1}, \
             gate {SIGNAL_GATE:.0}){detail}"
        ));
        return with_totals(verdict, &components, bullish, bearish);
    };

    let curr_close = close[n - 1];
    let curr_atr = atr(high, low, close, atr_period)[n - 1];
    let stop_distance = atr_multiplier * curr_atr;
    let (stop, target) = match signal {
        Signal::Buy => (curr_close - stop_distance, curr_close + stop_distance * 2.0),
        _ => (curr_close + stop_distance, curr_close - stop_distance * 2.0),
    };

    let verdict = StrategyVerdict::trade(
        signal,
        curr_close,
        stop,
        target,
        curr_atr,
        format!(
            "{} factors dominate (bullish {bullish:.1} vs bearish {bearish:.1})",
            if signal == Signal::Buy {
                "bullish"
            } else {
                "bearish"
            }
        ),
    );
    with_totals(verdict, &components, bullish, bearish)
}

fn with_totals(
    mut verdict: StrategyVerdict,
    components: &[Component],
    bullish: f64,
    bearish: f64,
) -> StrategyVerdict {
    verdict = verdict
        .with_debug("bullish_points", bullish)
        .with_debug("bearish_points", bearish);
    for c in components {
        verdict.debug.insert(format!("{}_bullish", c.name), c.bullish);
        verdict.debug.insert(format!("{}_bearish", c.name), c.bearish);
    }
    verdict
}

fn pattern_component(high: &[f64], low: &[f64], close: &[f64]) -> Component {
    let open = synthetic_opens(close);
    let mut bullish = 0.0;
    let mut bearish = 0.0;
    if is_hammer(&open, high, low, close) {
        bullish += PATTERN_POINTS;
    }
    if is_bullish_engulfing(&open, high, low, close) {
        bullish += PATTERN_POINTS;
    }
    if is_morning_star(&open, high, low, close) {
        bullish += PATTERN_POINTS;
    }
    if is_shooting_star(&open, high, low, close) {
        bearish += PATTERN_POINTS;
    }
    if is_bearish_engulfing(&open, high, low, close) {
        bearish += PATTERN_POINTS;
    }
    if is_evening_star(&open, high, low, close) {
        bearish += PATTERN_POINTS;
    }
    Component {
        name: "patterns",
        bullish,
        bearish,
    }
}

fn regime_component(close: &[f64]) -> Component {
    let mut c = Component {
        name: "regime",
        bullish: 0.0,
        bearish: 0.0,
    };
    if market_regime(close, 20) == MarketRegime::Trending {
        if above_sma20(close) {
            c.bullish = REGIME_POINTS;
        } else {
            c.bearish = REGIME_POINTS;
        }
    }
    c
}

fn momentum_component(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: Option<&[f64]>,
) -> Component {
    let q = momentum_quality(high, low, close, volume, 14);
    let (bullish, bearish) = if q >= 0.7 {
        (MOMENTUM_POINTS, 0.0)
    } else if q >= 0.6 {
        (MOMENTUM_LEAN_POINTS, 0.0)
    } else if q <= 0.3 {
        (0.0, MOMENTUM_POINTS)
    } else if q <= 0.4 {
        (0.0, MOMENTUM_LEAN_POINTS)
    } else {
        (0.0, 0.0)
    };
    Component {
        name: "momentum",
        bullish,
        bearish,
    }
}

const PROJECTION_WINDOW: usize = 20;
const PROJECTION_HORIZON: usize = 5;
/// P(projection confirms | the move is real).
const CONFIRM_LIKELIHOOD: f64 = 0.7;

fn probability_component(close: &[f64], volume: Option<&[f64]>) -> Component {
    let n = close.len();
    // Prior from the short-term composite read, refined by whether a
    // growth-rate projection of the recent window confirms it.
    let prior = short_term_score(close, volume) / 100.0;
    let window = &close[n.saturating_sub(PROJECTION_WINDOW)..];
    let last = close[n - 1];

    let p_up = match project_growth(window, PROJECTION_HORIZON) {
        Some(projected) if projected > last => {
            let p_evidence = CONFIRM_LIKELIHOOD * prior + (1.0 - CONFIRM_LIKELIHOOD) * (1.0 - prior);
            bayes_update(prior, CONFIRM_LIKELIHOOD, p_evidence)
        }
        Some(projected) if projected < last => {
            let miss = 1.0 - CONFIRM_LIKELIHOOD;
            let p_evidence = miss * prior + CONFIRM_LIKELIHOOD * (1.0 - prior);
            bayes_update(prior, miss, p_evidence)
        }
        _ => prior,
    };

    let lean = (p_up - 0.5) * 2.0 * PROBABILITY_POINTS;
    Component {
        name: "probability",
        bullish: lean.max(0.0),
        bearish: (-lean).max(0.0),
    }
}

fn trend_component(high: &[f64], low: &[f64], close: &[f64]) -> Component {
    let n = close.len();
    let mut c = Component {
        name: "trend",
        bullish: 0.0,
        bearish: 0.0,
    };

    if hurst_exponent(close, 20) >= 0.55 {
        if above_sma20(close) {
            c.bullish += HURST_POINTS;
        } else {
            c.bearish += HURST_POINTS;
        }
    }

    let lines = ichimoku(high, low, close, 9, 26, 52);
    let a = lines.senkou_a[n - 1];
    let b = lines.senkou_b[n - 1];
    if a.is_finite() && b.is_finite() {
        if close[n - 1] > a.max(b) {
            c.bullish += ICHIMOKU_POINTS;
        } else if close[n - 1] < a.min(b) {
            c.bearish += ICHIMOKU_POINTS;
        }
    }
    c
}

fn adx_component(high: &[f64], low: &[f64], close: &[f64]) -> Component {
    let n = close.len();
    let (adx_line, di_plus, di_minus) = adx(high, low, close, 14);
    let mut c = Component {
        name: "adx",
        bullish: 0.0,
        bearish: 0.0,
    };
    if adx_line[n - 1] >= ADX_THRESHOLD {
        if di_plus[n - 1] > di_minus[n - 1] {
            c.bullish = ADX_POINTS;
        } else if di_minus[n - 1] > di_plus[n - 1] {
            c.bearish = ADX_POINTS;
        }
    }
    c
}

fn above_sma20(close: &[f64]) -> bool {
    let n = close.len();
    let ma = sma(close, 20)[n - 1];
    ma.is_finite() && close[n - 1] > ma
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyTable;
    use crate::strategies::StrategyId;

    fn params() -> StrategyParams {
        StrategyTable::defaults()
            .get(StrategyId::AiMultiFactor)
            .unwrap()
            .clone()
    }

    fn with_brackets(close: Vec<f64>) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let high: Vec<f64> = close.iter().map(|c| c + 0.0005).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 0.0005).collect();
        (high, low, close)
    }

    #[test]
    fn sustained_uptrend_fires_a_buy() {
        let (high, low, close) =
            with_brackets((0..120).map(|i| 1.1000 + 0.0001 * i as f64).collect());
        let v = evaluate(&params(), &high, &low, &close, None);
        assert_eq!(v.signal, Signal::Buy, "{}", v.reason);
        let bull = v.debug["bullish_points"];
        let bear = v.debug["bearish_points"];
        assert!(bull >= SIGNAL_GATE && bull > bear, "bull {bull}, bear {bear}");
        assert!(v.stop_loss < v.entry_price && v.entry_price < v.take_profit);
        // 1:2 reward on the composite entry
        let rr = (v.take_profit - v.entry_price) / (v.entry_price - v.stop_loss);
        assert!((rr - 2.0).abs() < 1e-9);
    }

    #[test]
    fn sustained_downtrend_fires_a_sell() {
        let (high, low, close) =
            with_brackets((0..120).map(|i| 1.3000 - 0.0001 * i as f64).collect());
        let v = evaluate(&params(), &high, &low, &close, None);
        assert_eq!(v.signal, Signal::Sell, "{}", v.reason);
        assert!(v.debug["bearish_points"] >= SIGNAL_GATE);
    }

    #[test]
    fn quiet_market_stays_out_with_diagnostics() {
        let (high, low, close) = with_brackets(vec![1.1000; 120]);
        let v = evaluate(&params(), &high, &low, &close, None);
        assert_eq!(v.signal, Signal::NoTrade);
        assert!(v.reason.contains("gate"), "{}", v.reason);
        assert!(v.debug.contains_key("bullish_points"));
    }

    #[test]
    fn totals_never_exceed_the_scale() {
        for direction in [1.0, -1.0] {
            let (high, low, close) = with_brackets(
                (0..120)
                    .map(|i| 1.2000 + direction * 0.0001 * i as f64)
                    .collect(),
            );
            let v = evaluate(&params(), &high, &low, &close, None);
            assert!(v.debug["bullish_points"] <= 110.0);
            assert!(v.debug["bearish_points"] <= 110.0);
        }
    }

    #[test]
    fn short_history_reports_requirement() {
        let v = evaluate(&params(), &[1.1; 30], &[1.0; 30], &[1.05; 30], None);
        assert_eq!(v.signal, Signal::NoTrade);
        assert_eq!(v.reason, "insufficient data: 30 bars, need 60");
    }
}
