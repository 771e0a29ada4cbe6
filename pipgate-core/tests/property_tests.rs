//! Property tests for the indicator contracts and the risk ledger algebra.

use pipgate_core::domain::TradeStats;
use pipgate_core::indicators::{atr, bollinger_bands, ema, rsi, sma, supertrend};
use pipgate_core::risk::lot_size;
use pipgate_core::SymbolInfo;
use proptest::prelude::*;

fn close_column() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.5f64..2.0, 1..200)
}

fn bracket(close: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let high: Vec<f64> = close.iter().map(|c| c + 0.01).collect();
    let low: Vec<f64> = close.iter().map(|c| c - 0.01).collect();
    (high, low)
}

proptest! {
    #[test]
    fn indicator_outputs_match_input_length(close in close_column(), period in 1usize..50) {
        let (high, low) = bracket(&close);
        prop_assert_eq!(sma(&close, period).len(), close.len());
        prop_assert_eq!(ema(&close, period).len(), close.len());
        prop_assert_eq!(rsi(&close, period).len(), close.len());
        prop_assert_eq!(atr(&high, &low, &close, period).len(), close.len());
    }

    #[test]
    fn ema_on_a_constant_series_is_the_constant(
        value in 0.5f64..100.0,
        len in 1usize..150,
        period in 1usize..40,
    ) {
        let series = vec![value; len];
        for &v in &ema(&series, period) {
            prop_assert!((v - value).abs() < 1e-9);
        }
    }

    #[test]
    fn rsi_stays_within_bounds(close in close_column(), period in 1usize..30) {
        for &v in rsi(&close, period).iter() {
            prop_assert!((0.0..=100.0).contains(&v), "RSI out of bounds: {}", v);
        }
    }

    #[test]
    fn bollinger_middle_band_is_the_sma(close in close_column(), period in 1usize..30) {
        let (_, middle, _) = bollinger_bands(&close, period, 2.0);
        let reference = sma(&close, period);
        for (m, s) in middle.iter().zip(&reference) {
            if s.is_nan() {
                prop_assert!(m.is_nan());
            } else {
                prop_assert_eq!(m.to_bits(), s.to_bits());
            }
        }
    }

    #[test]
    fn supertrend_direction_is_binary_and_line_tracks_a_band(
        close in close_column(),
        period in 1usize..20,
    ) {
        let (high, low) = bracket(&close);
        let (line, direction) = supertrend(&high, &low, &close, period, 3.0);
        prop_assert_eq!(line.len(), close.len());
        for &d in &direction {
            prop_assert!(d == 1.0 || d == -1.0, "direction {}", d);
        }
    }

    #[test]
    fn trade_recording_is_order_independent(
        mut trades in prop::collection::vec((0usize..4, -200.0f64..200.0), 1..30),
    ) {
        let symbols = ["EURUSD", "GBPUSD", "USDJPY", "XAUUSD"];

        let mut forward = TradeStats::default();
        for &(s, pl) in &trades {
            forward.record(symbols[s], pl);
        }

        trades.reverse();
        let mut reverse = TradeStats::default();
        for &(s, pl) in &trades {
            reverse.record(symbols[s], pl);
        }

        prop_assert_eq!(forward.total_trades, reverse.total_trades);
        prop_assert_eq!(forward.winning_trades, reverse.winning_trades);
        prop_assert_eq!(forward.losing_trades, reverse.losing_trades);
        prop_assert!((forward.total_profit - reverse.total_profit).abs() < 1e-9);
        prop_assert!((forward.total_loss - reverse.total_loss).abs() < 1e-9);
        prop_assert_eq!(forward.symbols_traded, reverse.symbols_traded);
    }

    #[test]
    fn lot_size_is_non_negative_and_step_aligned(
        equity in 100.0f64..1_000_000.0,
        risk_percent in 0.1f64..5.0,
        stop_points in 1.0f64..5_000.0,
    ) {
        let info = SymbolInfo::fx_default();
        let lot = lot_size(equity, risk_percent, stop_points * info.point, &info);
        prop_assert!(lot >= info.volume_min);
        // Step alignment within float tolerance.
        let steps = lot / info.volume_step;
        prop_assert!((steps - steps.round()).abs() < 1e-6, "lot {} not on step", lot);
    }
}
