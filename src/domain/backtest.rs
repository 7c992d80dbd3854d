//! Cost-aware crossover simulator.
//!
//! BacktestConfig defines the immutable run settings shared by every pipeline stage.

use crate::domain::error::MacrossError;
use crate::domain::indicator_frame::{validate_window, IndicatorRow};
use crate::domain::signal::Signal;
use chrono::NaiveDate;

pub const DEFAULT_SHORT_WINDOW: usize = 20;
pub const DEFAULT_LONG_WINDOW: usize = 50;
pub const DEFAULT_COST_RATE: f64 = 0.005;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub short_window: usize,
    pub long_window: usize,
    /// Fraction of notional charged per unit of signal change.
    pub cost_rate: f64,
    /// Fan optimizer cells and portfolio tickers out over the rayon pool.
    pub parallel: bool,
}

impl BacktestConfig {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        BacktestConfig {
            start_date,
            end_date,
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            cost_rate: DEFAULT_COST_RATE,
            parallel: true,
        }
    }

    /// Windows and cost rate only. The date range is checked by whoever fetches data.
    pub fn validate_parameters(&self) -> Result<(), MacrossError> {
        validate_window("short_window", self.short_window)?;
        validate_window("long_window", self.long_window)?;
        validate_cost_rate(self.cost_rate)
    }

    pub fn validate(&self) -> Result<(), MacrossError> {
        self.validate_parameters()?;
        validate_date_range(self.start_date, self.end_date)
    }
}

pub fn validate_date_range(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), MacrossError> {
    if start_date >= end_date {
        return Err(MacrossError::invalid_parameter(
            "start_date",
            format!("start_date {} must be before end_date {}", start_date, end_date),
        ));
    }
    Ok(())
}

pub fn validate_cost_rate(cost_rate: f64) -> Result<(), MacrossError> {
    if !cost_rate.is_finite() || cost_rate < 0.0 {
        return Err(MacrossError::invalid_parameter(
            "cost_rate",
            format!("must be a non-negative number, got {}", cost_rate),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyPoint {
    pub date: NaiveDate,
    /// Raw bar return of the instrument.
    pub market_return: f64,
    /// Signal decided on the previous bar, applied to this bar's return.
    pub position: Signal,
    /// |signal[t] - signal[t-1]| on unlagged signals.
    pub trade: f64,
    pub strategy_return: f64,
    pub cumulative_strategy: f64,
    pub cumulative_market: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRun {
    pub cost_rate: f64,
    pub points: Vec<StrategyPoint>,
}

impl StrategyRun {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn strategy_returns(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.strategy_return).collect()
    }

    pub fn cumulative_strategy(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.cumulative_strategy).collect()
    }

    pub fn cumulative_market(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.cumulative_market).collect()
    }

    /// Sum of trade magnitudes times the cost rate.
    pub fn total_cost(&self) -> f64 {
        self.points.iter().map(|p| p.trade).sum::<f64>() * self.cost_rate
    }

    pub fn trade_count(&self) -> usize {
        self.points.iter().filter(|p| p.trade > 0.0).count()
    }
}

/// Simulate the crossover strategy over `rows` with one signal per row.
///
/// The signal decided on bar t earns bar t+1's return. The trade cost is charged on
/// the bar where the signal changes. The first row has no prior signal and is not
/// part of the run; both cumulative series start from 1.0 before the first kept bar.
pub fn backtest(
    rows: &[IndicatorRow],
    signals: &[Signal],
    cost_rate: f64,
) -> Result<StrategyRun, MacrossError> {
    validate_cost_rate(cost_rate)?;
    if rows.len() != signals.len() {
        return Err(MacrossError::invalid_parameter(
            "signals",
            format!("{} signals for {} rows", signals.len(), rows.len()),
        ));
    }
    if rows.len() < 2 {
        return Err(MacrossError::InsufficientData {
            ticker: String::new(),
            rows: rows.len(),
            minimum: 2,
        });
    }

    let mut points = Vec::with_capacity(rows.len() - 1);
    let mut cumulative_strategy = 1.0;
    let mut cumulative_market = 1.0;

    for t in 1..rows.len() {
        let row = &rows[t];
        let position = signals[t - 1];
        let trade = signals[t].trade_magnitude(signals[t - 1]);
        let strategy_return = position.as_f64() * row.ret - trade * cost_rate;

        cumulative_strategy *= 1.0 + strategy_return;
        cumulative_market *= 1.0 + row.ret;

        points.push(StrategyPoint {
            date: row.date,
            market_return: row.ret,
            position,
            trade,
            strategy_return,
            cumulative_strategy,
            cumulative_market,
        });
    }

    Ok(StrategyRun { cost_rate, points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn rows(returns: &[f64]) -> Vec<IndicatorRow> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        returns
            .iter()
            .enumerate()
            .map(|(i, &ret)| IndicatorRow {
                date: start + chrono::Duration::days(i as i64),
                close: 100.0,
                ret,
                ma_short: 0.0,
                ma_long: 0.0,
                volatility: None,
            })
            .collect()
    }

    fn sample_config() -> BacktestConfig {
        BacktestConfig::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 16).unwrap(),
        )
    }

    #[test]
    fn config_defaults() {
        let c = sample_config();
        assert_eq!(c.short_window, 20);
        assert_eq!(c.long_window, 50);
        assert!((c.cost_rate - 0.005).abs() < f64::EPSILON);
        assert!(c.parallel);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn config_rejects_negative_cost() {
        let c = BacktestConfig {
            cost_rate: -0.01,
            ..sample_config()
        };
        assert!(matches!(
            c.validate(),
            Err(MacrossError::InvalidParameter { ref name, .. }) if name == "cost_rate"
        ));
    }

    #[test]
    fn config_rejects_reversed_dates() {
        let c = BacktestConfig {
            start_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            ..sample_config()
        };
        assert!(c.validate().is_err());
        assert!(c.validate_parameters().is_ok());
    }

    #[test]
    fn date_range_must_be_increasing() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(validate_date_range(d, d + chrono::Duration::days(1)).is_ok());
        assert!(matches!(
            validate_date_range(d, d),
            Err(MacrossError::InvalidParameter { ref name, .. }) if name == "start_date"
        ));
    }

    #[test]
    fn first_row_is_dropped() {
        let r = rows(&[0.5, 0.01, 0.02]);
        let run = backtest(&r, &[Signal::Long; 3], 0.0).unwrap();
        assert_eq!(run.len(), 2);
        assert_eq!(run.points[0].date, r[1].date);
    }

    #[test]
    fn signal_is_lagged_one_bar() {
        let r = rows(&[0.0, 0.10, 0.10]);
        let signals = [Signal::Flat, Signal::Long, Signal::Short];
        let run = backtest(&r, &signals, 0.0).unwrap();

        assert_eq!(run.points[0].position, Signal::Flat);
        assert_abs_diff_eq!(run.points[0].strategy_return, 0.0);
        assert_eq!(run.points[1].position, Signal::Long);
        assert_abs_diff_eq!(run.points[1].strategy_return, 0.10, epsilon = 1e-12);
    }

    #[test]
    fn short_position_earns_negative_return() {
        let r = rows(&[0.0, -0.05]);
        let run = backtest(&r, &[Signal::Short, Signal::Short], 0.0).unwrap();
        assert_abs_diff_eq!(run.points[0].strategy_return, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn cost_charged_on_signal_change() {
        let r = rows(&[0.0, 0.0, 0.0, 0.0]);
        let signals = [Signal::Flat, Signal::Long, Signal::Short, Signal::Short];
        let run = backtest(&r, &signals, 0.01).unwrap();

        assert_eq!(run.points[0].trade, 1.0);
        assert_eq!(run.points[1].trade, 2.0);
        assert_eq!(run.points[2].trade, 0.0);
        assert_abs_diff_eq!(run.points[0].strategy_return, -0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(run.points[1].strategy_return, -0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(run.total_cost(), 0.03, epsilon = 1e-12);
        assert_eq!(run.trade_count(), 2);
        assert_abs_diff_eq!(
            run.points[2].cumulative_strategy,
            0.99 * 0.98,
            epsilon = 1e-12
        );
    }

    #[test]
    fn cumulative_series_compound() {
        let r = rows(&[0.0, 0.10, -0.05]);
        let run = backtest(&r, &[Signal::Long; 3], 0.0).unwrap();
        assert_abs_diff_eq!(run.points[0].cumulative_market, 1.10, epsilon = 1e-12);
        assert_abs_diff_eq!(run.points[1].cumulative_market, 1.10 * 0.95, epsilon = 1e-12);
        assert_eq!(run.cumulative_strategy(), run.cumulative_market());
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let r = rows(&[0.0, 0.1]);
        let err = backtest(&r, &[Signal::Long], 0.0).unwrap_err();
        assert!(matches!(err, MacrossError::InvalidParameter { .. }));
    }

    #[test]
    fn single_row_is_insufficient() {
        let r = rows(&[0.0]);
        let err = backtest(&r, &[Signal::Long], 0.0).unwrap_err();
        assert!(matches!(err, MacrossError::InsufficientData { rows: 1, minimum: 2, .. }));
    }

    #[test]
    fn nan_cost_rate_rejected() {
        let r = rows(&[0.0, 0.1]);
        assert!(backtest(&r, &[Signal::Long; 2], f64::NAN).is_err());
    }
}
