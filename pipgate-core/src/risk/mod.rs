//! Risk manager — the stateful gate between signals and orders.
//!
//! `check_signal` runs ten checks in a fixed, short-circuiting order; the
//! first failure wins and its reason is returned verbatim. The cumulative
//! loss checks arm a kill switch that only an explicit operator call can
//! clear: easy to trip, manual-only reset. Trade outcomes land in daily
//! and ISO-week ledgers that feed the loss checks and the reports.
//!
//! The manager is a plain value: one instance per account, constructed with
//! its own [`RiskLimits`]. Hosts that scan symbols in parallel must
//! serialize access to it (a single lock or a single-writer task) since
//! `check_signal` reads the same ledgers `record_trade` mutates.

pub mod sizing;

pub use sizing::{calculate, lot_size, PositionCalculation};

use crate::config::RiskLimits;
use crate::domain::{Signal, TradeStats};
use crate::engine::TradingSignal;
use crate::gateway::SymbolInfo;
use crate::notify::{NotificationSink, NotifyLevel, TracingSink};
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ISO week key: (year, week number).
pub type WeekKey = (i32, u32);

/// Outcome of one risk check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDecision {
    pub approved: bool,
    pub reason: String,
    pub lot_size: f64,
}

impl RiskDecision {
    fn reject(reason: impl Into<String>) -> Self {
        Self {
            approved: false,
            reason: reason.into(),
            lot_size: 0.0,
        }
    }

    fn approve(reason: impl Into<String>, lot_size: f64) -> Self {
        Self {
            approved: true,
            reason: reason.into(),
            lot_size,
        }
    }
}

/// The safety fuse. Armed by the loss-limit checks, cleared only by
/// [`RiskManager::deactivate_kill_switch`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KillSwitchState {
    pub active: bool,
    pub reason: String,
}

/// Serializable period report for hosts and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReport {
    pub period: String,
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub win_rate: f64,
    pub total_profit: f64,
    pub total_loss: f64,
    pub net_profit: f64,
    pub symbols_traded: BTreeMap<String, u32>,
}

impl PeriodReport {
    fn from_stats(period: String, stats: &TradeStats) -> Self {
        Self {
            period,
            total_trades: stats.total_trades,
            winning_trades: stats.winning_trades,
            losing_trades: stats.losing_trades,
            win_rate: stats.win_rate(),
            total_profit: stats.total_profit,
            total_loss: stats.total_loss,
            net_profit: stats.net_profit(),
            symbols_traded: stats.symbols_traded.clone(),
        }
    }
}

/// Number of period ledgers retained per map (current + previous).
const RETAINED_PERIODS: usize = 2;

pub struct RiskManager {
    limits: RiskLimits,
    daily: BTreeMap<NaiveDate, TradeStats>,
    weekly: BTreeMap<WeekKey, TradeStats>,
    kill_switch: KillSwitchState,
    notifier: Box<dyn NotificationSink>,
}

impl RiskManager {
    pub fn new(limits: RiskLimits) -> Self {
        Self {
            limits,
            daily: BTreeMap::new(),
            weekly: BTreeMap::new(),
            kill_switch: KillSwitchState::default(),
            notifier: Box::new(TracingSink),
        }
    }

    /// Replace the notification sink (the default forwards to `tracing`).
    pub fn with_notifier(mut self, notifier: Box<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    pub fn kill_switch(&self) -> &KillSwitchState {
        &self.kill_switch
    }

    /// Run the ordered risk checks against one signal.
    ///
    /// `positions` maps symbols to currently open position counts and
    /// `info` carries the instrument properties plus the live spread.
    pub fn check_signal(
        &mut self,
        signal: &TradingSignal,
        equity: f64,
        positions: &BTreeMap<String, u32>,
        info: &SymbolInfo,
        now: DateTime<Utc>,
    ) -> RiskDecision {
        let decision = self.run_checks(signal, equity, positions, info, now);
        if decision.approved {
            tracing::info!(
                symbol = %signal.symbol,
                lot = decision.lot_size,
                "signal approved"
            );
            self.notifier.notify(
                &format!(
                    "{} {} approved at {:.2} lots",
                    signal.signal.as_str(),
                    signal.symbol,
                    decision.lot_size
                ),
                NotifyLevel::Success,
            );
        } else {
            tracing::warn!(
                symbol = %signal.symbol,
                reason = %decision.reason,
                "signal rejected"
            );
            self.notifier.notify(
                &format!("{} rejected: {}", signal.symbol, decision.reason),
                NotifyLevel::Warning,
            );
        }
        decision
    }

    /// [`check_signal`] stamped with the current time.
    pub fn check_signal_now(
        &mut self,
        signal: &TradingSignal,
        equity: f64,
        positions: &BTreeMap<String, u32>,
        info: &SymbolInfo,
    ) -> RiskDecision {
        self.check_signal(signal, equity, positions, info, Utc::now())
    }

    fn run_checks(
        &mut self,
        signal: &TradingSignal,
        equity: f64,
        positions: &BTreeMap<String, u32>,
        info: &SymbolInfo,
        now: DateTime<Utc>,
    ) -> RiskDecision {
        // 1. Kill switch.
        if self.kill_switch.active {
            return RiskDecision::reject(format!(
                "kill switch active: {}",
                self.kill_switch.reason
            ));
        }

        // 2. Signal type.
        if signal.signal == Signal::NoTrade {
            return RiskDecision::reject("no trade signal");
        }

        // 3. Open positions for this symbol.
        let open = positions.get(&signal.symbol).copied().unwrap_or(0);
        if open >= self.limits.max_positions_per_symbol {
            return RiskDecision::reject(format!(
                "position limit reached for {} ({open}/{})",
                signal.symbol, self.limits.max_positions_per_symbol
            ));
        }

        let today = now.date_naive();
        let day_stats = self.daily.get(&today).cloned().unwrap_or_default();

        // 4. Trades today, all symbols.
        if day_stats.total_trades >= self.limits.max_trades_per_day {
            return RiskDecision::reject(format!(
                "daily trade limit reached ({}/{})",
                day_stats.total_trades, self.limits.max_trades_per_day
            ));
        }

        // 5. Trades today for this symbol.
        let symbol_today = day_stats.trades_for(&signal.symbol);
        if symbol_today >= self.limits.max_trades_per_symbol_per_day {
            return RiskDecision::reject(format!(
                "daily trade limit reached for {} ({symbol_today}/{})",
                signal.symbol, self.limits.max_trades_per_symbol_per_day
            ));
        }

        // 6. Spread.
        if info.spread_points > self.limits.max_spread_points {
            return RiskDecision::reject(format!(
                "spread too wide ({:.1} > {:.1} points)",
                info.spread_points, self.limits.max_spread_points
            ));
        }

        // 7. Daily loss limit -> kill switch.
        let daily_loss_limit = equity * self.limits.daily_loss_limit_percent / 100.0;
        if day_stats.total_loss.abs() >= daily_loss_limit {
            self.arm_kill_switch(format!(
                "daily loss limit breached ({:.2} >= {:.2})",
                day_stats.total_loss.abs(),
                daily_loss_limit
            ));
            return RiskDecision::reject(self.kill_switch.reason.clone());
        }

        // 8. Weekly loss limit -> kill switch.
        let week = week_key(now);
        let week_stats = self.weekly.get(&week).cloned().unwrap_or_default();
        let weekly_loss_limit = equity * self.limits.weekly_loss_limit_percent / 100.0;
        if week_stats.total_loss.abs() >= weekly_loss_limit {
            self.arm_kill_switch(format!(
                "weekly loss limit breached ({:.2} >= {:.2})",
                week_stats.total_loss.abs(),
                weekly_loss_limit
            ));
            return RiskDecision::reject(self.kill_switch.reason.clone());
        }

        // 9. Trading hours (UTC, inclusive on both ends).
        let hour = now.hour();
        if hour < self.limits.trading_start_hour || hour > self.limits.trading_end_hour {
            return RiskDecision::reject(format!(
                "outside trading hours ({:02}-{:02} UTC)",
                self.limits.trading_start_hour, self.limits.trading_end_hour
            ));
        }

        // 10. Position sizing.
        let lot = sizing::lot_size(
            equity,
            self.limits.risk_per_trade_percent,
            signal.risk_points,
            info,
        );
        if lot <= 0.0 {
            return RiskDecision::reject("could not compute a positive lot size");
        }

        RiskDecision::approve("all risk checks passed", lot)
    }

    /// Record one closed trade into the daily and weekly ledgers.
    pub fn record_trade(&mut self, symbol: &str, profit_loss: f64, now: DateTime<Utc>) {
        let today = now.date_naive();
        self.daily
            .entry(today)
            .or_default()
            .record(symbol, profit_loss);
        self.weekly
            .entry(week_key(now))
            .or_default()
            .record(symbol, profit_loss);

        // Retain only the current and previous period per ledger.
        while self.daily.len() > RETAINED_PERIODS {
            self.daily.pop_first();
        }
        while self.weekly.len() > RETAINED_PERIODS {
            self.weekly.pop_first();
        }

        tracing::info!(symbol, profit_loss, "trade recorded");
    }

    /// [`record_trade`] stamped with the current time.
    pub fn record_trade_now(&mut self, symbol: &str, profit_loss: f64) {
        self.record_trade(symbol, profit_loss, Utc::now());
    }

    fn arm_kill_switch(&mut self, reason: String) {
        self.kill_switch = KillSwitchState {
            active: true,
            reason: reason.clone(),
        };
        tracing::error!(%reason, "kill switch armed");
        self.notifier
            .notify(&format!("KILL SWITCH ARMED: {reason}"), NotifyLevel::Error);
    }

    /// Operator-triggered reset; the only way to clear the switch.
    pub fn deactivate_kill_switch(&mut self) {
        self.kill_switch = KillSwitchState::default();
        tracing::info!("kill switch deactivated");
        self.notifier
            .notify("kill switch deactivated", NotifyLevel::Success);
    }

    /// Post-execution slippage check, informational only.
    pub fn check_max_slippage(
        &self,
        expected_price: f64,
        executed_price: f64,
        point: f64,
    ) -> (bool, f64) {
        let slippage = (expected_price - executed_price).abs() / point;
        (slippage <= self.limits.max_slippage_points, slippage)
    }

    /// Full sizing breakdown for one prospective order at the configured
    /// risk percentage.
    pub fn calculate_position(
        &self,
        signal: &TradingSignal,
        equity: f64,
        info: &SymbolInfo,
    ) -> PositionCalculation {
        sizing::calculate(
            &signal.symbol,
            signal.signal,
            signal.entry_price,
            signal.stop_loss,
            signal.take_profit,
            equity,
            info,
            self.limits.risk_per_trade_percent,
        )
    }

    pub fn daily_report(&self, date: NaiveDate) -> PeriodReport {
        let stats = self.daily.get(&date).cloned().unwrap_or_default();
        PeriodReport::from_stats(date.to_string(), &stats)
    }

    pub fn weekly_report(&self, week: WeekKey) -> PeriodReport {
        let stats = self.weekly.get(&week).cloned().unwrap_or_default();
        PeriodReport::from_stats(format!("{}-W{:02}", week.0, week.1), &stats)
    }
}

/// ISO year/week of a timestamp.
pub fn week_key(now: DateTime<Utc>) -> WeekKey {
    let iso = now.iso_week();
    (iso.year(), iso.week())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::test_support::RecordingSink;
    use crate::strategies::StrategyId;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap()
    }

    fn buy_signal(symbol: &str) -> TradingSignal {
        TradingSignal::from_verdict(
            symbol,
            StrategyId::MaCrossover,
            noon(),
            crate::domain::StrategyVerdict::trade(
                Signal::Buy,
                1.1000,
                1.0950,
                1.1100,
                0.0025,
                "test entry",
            ),
        )
    }

    fn no_trade_signal(symbol: &str) -> TradingSignal {
        TradingSignal::from_verdict(
            symbol,
            StrategyId::MaCrossover,
            noon(),
            crate::domain::StrategyVerdict::no_trade("nothing to do"),
        )
    }

    fn manager() -> RiskManager {
        RiskManager::new(RiskLimits::default())
    }

    fn info() -> SymbolInfo {
        SymbolInfo::fx_default()
    }

    #[test]
    fn clean_signal_is_approved_and_sized() {
        let mut mgr = manager();
        let d = mgr.check_signal(&buy_signal("EURUSD"), 10_000.0, &BTreeMap::new(), &info(), noon());
        assert!(d.approved, "{}", d.reason);
        // 50-pip stop at 1% of 10k: 100 / (500 * 1.0) = 0.20 lots
        assert!((d.lot_size - 0.20).abs() < 1e-12);
    }

    #[test]
    fn no_trade_is_rejected_before_any_limit() {
        let mut mgr = manager();
        let d = mgr.check_signal(
            &no_trade_signal("EURUSD"),
            10_000.0,
            &BTreeMap::new(),
            &info(),
            noon(),
        );
        assert!(!d.approved);
        assert_eq!(d.reason, "no trade signal");
    }

    #[test]
    fn position_count_outranks_spread_in_check_order() {
        let mut mgr = manager();
        let mut positions = BTreeMap::new();
        positions.insert("EURUSD".to_string(), 1);
        let wide = SymbolInfo {
            spread_points: 50.0,
            ..info()
        };
        let d = mgr.check_signal(&buy_signal("EURUSD"), 10_000.0, &positions, &wide, noon());
        assert!(!d.approved);
        assert!(
            d.reason.contains("position limit"),
            "expected the position check to win: {}",
            d.reason
        );
    }

    #[test]
    fn daily_trade_limit_applies_across_symbols() {
        let mut mgr = manager();
        for _ in 0..3 {
            mgr.record_trade("EURUSD", 10.0, noon());
        }
        let d = mgr.check_signal(&buy_signal("GBPUSD"), 10_000.0, &BTreeMap::new(), &info(), noon());
        assert!(!d.approved);
        assert!(
            d.reason.contains("daily trade limit"),
            "reason was: {}",
            d.reason
        );
    }

    #[test]
    fn per_symbol_daily_limit_rejects_repeat_entries() {
        let mut mgr = manager();
        mgr.record_trade("EURUSD", 10.0, noon());
        let d = mgr.check_signal(&buy_signal("EURUSD"), 10_000.0, &BTreeMap::new(), &info(), noon());
        assert!(!d.approved);
        assert!(d.reason.contains("EURUSD"), "{}", d.reason);
        // A different symbol still passes.
        let d2 = mgr.check_signal(&buy_signal("GBPUSD"), 10_000.0, &BTreeMap::new(), &info(), noon());
        assert!(d2.approved, "{}", d2.reason);
    }

    #[test]
    fn wide_spread_is_rejected() {
        let mut mgr = manager();
        let wide = SymbolInfo {
            spread_points: 11.0,
            ..info()
        };
        let d = mgr.check_signal(&buy_signal("EURUSD"), 10_000.0, &BTreeMap::new(), &wide, noon());
        assert!(!d.approved);
        assert!(d.reason.contains("spread"), "{}", d.reason);
    }

    #[test]
    fn daily_loss_breach_arms_the_kill_switch() {
        let mut mgr = manager();
        mgr.record_trade("EURUSD", -300.0, noon()); // 3% of 10k
        let d = mgr.check_signal(&buy_signal("GBPUSD"), 10_000.0, &BTreeMap::new(), &info(), noon());
        assert!(!d.approved);
        assert!(d.reason.contains("daily loss limit"), "{}", d.reason);
        assert!(mgr.kill_switch().active);
    }

    #[test]
    fn weekly_loss_breach_arms_the_kill_switch() {
        let mut mgr = manager();
        // Spread the loss across days within one ISO week so no single day
        // trips the daily limit.
        let monday = Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap();
        let tuesday = Utc.with_ymd_and_hms(2024, 6, 4, 12, 0, 0).unwrap();
        mgr.record_trade("EURUSD", -290.0, monday);
        mgr.record_trade("EURUSD", -290.0, tuesday);
        let wednesday = Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).unwrap();
        let d = mgr.check_signal(
            &buy_signal("GBPUSD"),
            10_000.0,
            &BTreeMap::new(),
            &info(),
            wednesday,
        );
        assert!(!d.approved);
        assert!(d.reason.contains("weekly loss limit"), "{}", d.reason);
        assert!(mgr.kill_switch().active);
    }

    #[test]
    fn kill_switch_rejections_are_idempotent_until_reset() {
        let mut mgr = manager();
        mgr.record_trade("EURUSD", -300.0, noon());
        let first = mgr.check_signal(&buy_signal("GBPUSD"), 10_000.0, &BTreeMap::new(), &info(), noon());
        assert!(mgr.kill_switch().active);
        let armed_reason = mgr.kill_switch().reason.clone();
        assert!(first.reason.contains("daily loss limit"));

        // Even with a fresh day (underlying breach resolved) every check
        // returns the same stored reason.
        let next_week = Utc.with_ymd_and_hms(2024, 6, 17, 12, 0, 0).unwrap();
        for _ in 0..3 {
            let d = mgr.check_signal(
                &buy_signal("GBPUSD"),
                10_000.0,
                &BTreeMap::new(),
                &info(),
                next_week,
            );
            assert!(!d.approved);
            assert_eq!(d.reason, format!("kill switch active: {armed_reason}"));
            assert_eq!(d.lot_size, 0.0);
        }

        mgr.deactivate_kill_switch();
        assert!(!mgr.kill_switch().active);
        let d = mgr.check_signal(
            &buy_signal("GBPUSD"),
            10_000.0,
            &BTreeMap::new(),
            &info(),
            next_week,
        );
        assert!(d.approved, "{}", d.reason);
    }

    #[test]
    fn outside_trading_hours_is_rejected() {
        let limits = RiskLimits {
            trading_start_hour: 8,
            trading_end_hour: 17,
            ..RiskLimits::default()
        };
        let mut mgr = RiskManager::new(limits);
        let late = Utc.with_ymd_and_hms(2024, 6, 3, 22, 0, 0).unwrap();
        let d = mgr.check_signal(&buy_signal("EURUSD"), 10_000.0, &BTreeMap::new(), &info(), late);
        assert!(!d.approved);
        assert!(d.reason.contains("trading hours"), "{}", d.reason);

        // The window is inclusive at both ends.
        let at_end = Utc.with_ymd_and_hms(2024, 6, 3, 17, 30, 0).unwrap();
        let d2 = mgr.check_signal(&buy_signal("EURUSD"), 10_000.0, &BTreeMap::new(), &info(), at_end);
        assert!(d2.approved, "{}", d2.reason);
    }

    #[test]
    fn unsizable_signal_is_rejected_last() {
        let mut mgr = manager();
        // Stop at the entry: zero stop distance.
        let signal = TradingSignal::from_verdict(
            "EURUSD",
            StrategyId::MaCrossover,
            noon(),
            crate::domain::StrategyVerdict::trade(
                Signal::Buy,
                1.1000,
                1.1000,
                1.1100,
                0.0025,
                "degenerate stop",
            ),
        );
        let d = mgr.check_signal(&signal, 10_000.0, &BTreeMap::new(), &info(), noon());
        assert!(!d.approved);
        assert!(d.reason.contains("lot size"), "{}", d.reason);
    }

    #[test]
    fn record_trade_updates_both_ledgers() {
        let mut mgr = manager();
        mgr.record_trade("EURUSD", 150.0, noon());
        mgr.record_trade("GBPUSD", -50.0, noon());

        let daily = mgr.daily_report(noon().date_naive());
        assert_eq!(daily.total_trades, 2);
        assert_eq!(daily.winning_trades, 1);
        assert_eq!(daily.losing_trades, 1);
        assert_eq!(daily.net_profit, 100.0);
        assert_eq!(daily.win_rate, 50.0);

        let weekly = mgr.weekly_report(week_key(noon()));
        assert_eq!(weekly.total_trades, 2);
        assert_eq!(weekly.symbols_traded.get("EURUSD"), Some(&1));
    }

    #[test]
    fn ledgers_prune_to_current_and_previous_period() {
        let mut mgr = manager();
        for day in 1..=5 {
            let ts = Utc.with_ymd_and_hms(2024, 7, day, 12, 0, 0).unwrap();
            mgr.record_trade("EURUSD", 10.0, ts);
        }
        // Only July 4 and July 5 remain.
        let kept = mgr.daily_report(NaiveDate::from_ymd_opt(2024, 7, 5).unwrap());
        assert_eq!(kept.total_trades, 1);
        let dropped = mgr.daily_report(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(dropped.total_trades, 0);
    }

    #[test]
    fn slippage_check_is_informational() {
        let mgr = manager();
        let (ok, points) = mgr.check_max_slippage(1.10000, 1.10003, 0.00001);
        assert!(ok);
        assert!((points - 3.0).abs() < 1e-6);
        let (ok, points) = mgr.check_max_slippage(1.10000, 1.10010, 0.00001);
        assert!(!ok);
        assert!((points - 10.0).abs() < 1e-6);
    }

    #[test]
    fn notifications_fire_for_approval_rejection_and_kill_switch() {
        let sink = RecordingSink::default();
        let events = sink.events.clone();
        let mut mgr = manager().with_notifier(Box::new(sink));

        mgr.check_signal(&buy_signal("EURUSD"), 10_000.0, &BTreeMap::new(), &info(), noon());
        mgr.record_trade("EURUSD", -300.0, noon());
        mgr.check_signal(&buy_signal("GBPUSD"), 10_000.0, &BTreeMap::new(), &info(), noon());

        let events = events.lock().unwrap();
        assert_eq!(events[0].1, NotifyLevel::Success);
        // Kill-switch arming fires an error before the rejection warning.
        assert!(events
            .iter()
            .any(|(msg, level)| *level == NotifyLevel::Error && msg.contains("KILL SWITCH")));
        assert!(events.iter().any(|(_, level)| *level == NotifyLevel::Warning));
    }
}
