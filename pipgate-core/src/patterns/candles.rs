//! Candlestick shape classifiers.
//!
//! Each classifier inspects the trailing bars of the supplied OHLC columns
//! and returns false when not enough bars are present. Thresholds:
//!
//! - doji: body <= 10% of the bar range (a zero-range bar counts as a doji);
//! - hammer / shooting star: body < 1/3 of range, the dominant shadow
//!   covers >= 60% of the range and the opposite shadow < 30%;
//! - engulfing: strict body containment plus a color flip across two bars;
//! - morning / evening star: color-doji-color across three bars, confirmed
//!   by the third close crossing the midpoint of the first bar's body.

/// One bar's geometry, taken from the columns at a trailing offset.
#[derive(Debug, Clone, Copy)]
struct Candle {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

impl Candle {
    /// `back` = 0 is the latest bar, 1 the one before it, and so on.
    fn at(open: &[f64], high: &[f64], low: &[f64], close: &[f64], back: usize) -> Option<Self> {
        let n = close.len();
        if n <= back || open.len() != n || high.len() != n || low.len() != n {
            return None;
        }
        let i = n - 1 - back;
        Some(Self {
            open: open[i],
            high: high[i],
            low: low[i],
            close: close[i],
        })
    }

    fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    fn range(&self) -> f64 {
        self.high - self.low
    }

    fn upper_shadow(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    fn lower_shadow(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    fn body_midpoint(&self) -> f64 {
        (self.open + self.close) / 2.0
    }

    fn is_doji(&self) -> bool {
        let range = self.range();
        if range <= 0.0 {
            return true;
        }
        self.body() <= 0.1 * range
    }
}

/// Body <= 10% of range on the latest bar.
pub fn is_doji(open: &[f64], high: &[f64], low: &[f64], close: &[f64]) -> bool {
    Candle::at(open, high, low, close, 0).is_some_and(|c| c.is_doji())
}

/// Small body near the top with a dominant lower shadow on the latest bar.
pub fn is_hammer(open: &[f64], high: &[f64], low: &[f64], close: &[f64]) -> bool {
    let Some(c) = Candle::at(open, high, low, close, 0) else {
        return false;
    };
    let range = c.range();
    if range <= 0.0 {
        return false;
    }
    c.body() < range / 3.0 && c.lower_shadow() >= 0.6 * range && c.upper_shadow() < 0.3 * range
}

/// Small body near the bottom with a dominant upper shadow on the latest bar.
pub fn is_shooting_star(open: &[f64], high: &[f64], low: &[f64], close: &[f64]) -> bool {
    let Some(c) = Candle::at(open, high, low, close, 0) else {
        return false;
    };
    let range = c.range();
    if range <= 0.0 {
        return false;
    }
    c.body() < range / 3.0 && c.upper_shadow() >= 0.6 * range && c.lower_shadow() < 0.3 * range
}

/// Bearish bar strictly engulfed by the latest bullish bar.
pub fn is_bullish_engulfing(open: &[f64], high: &[f64], low: &[f64], close: &[f64]) -> bool {
    let (Some(prev), Some(curr)) = (
        Candle::at(open, high, low, close, 1),
        Candle::at(open, high, low, close, 0),
    ) else {
        return false;
    };
    prev.is_bearish() && curr.is_bullish() && curr.open < prev.close && curr.close > prev.open
}

/// Bullish bar strictly engulfed by the latest bearish bar.
pub fn is_bearish_engulfing(open: &[f64], high: &[f64], low: &[f64], close: &[f64]) -> bool {
    let (Some(prev), Some(curr)) = (
        Candle::at(open, high, low, close, 1),
        Candle::at(open, high, low, close, 0),
    ) else {
        return false;
    };
    prev.is_bullish() && curr.is_bearish() && curr.open > prev.close && curr.close < prev.open
}

/// Bearish bar, doji, then a bullish bar closing above the first bar's body
/// midpoint.
pub fn is_morning_star(open: &[f64], high: &[f64], low: &[f64], close: &[f64]) -> bool {
    let (Some(first), Some(star), Some(third)) = (
        Candle::at(open, high, low, close, 2),
        Candle::at(open, high, low, close, 1),
        Candle::at(open, high, low, close, 0),
    ) else {
        return false;
    };
    first.is_bearish() && star.is_doji() && third.is_bullish() && third.close > first.body_midpoint()
}

/// Bullish bar, doji, then a bearish bar closing below the first bar's body
/// midpoint.
pub fn is_evening_star(open: &[f64], high: &[f64], low: &[f64], close: &[f64]) -> bool {
    let (Some(first), Some(star), Some(third)) = (
        Candle::at(open, high, low, close, 2),
        Candle::at(open, high, low, close, 1),
        Candle::at(open, high, low, close, 0),
    ) else {
        return false;
    };
    first.is_bullish() && star.is_doji() && third.is_bearish() && third.close < first.body_midpoint()
}
