//! Per-bar indicator rows for the crossover pipeline.
//!
//! [`compute_indicators`] joins the returns, short/long SMA and volatility series and
//! drops every row that lacks a return or either moving average. The number of
//! dropped rows is kept on the resulting [`IndicatorFrame`].

use crate::domain::error::MacrossError;
use crate::domain::indicator::returns::calculate_returns;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_volatility;
use crate::domain::indicator::VOLATILITY_WINDOW;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub ret: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    /// `None` until 20 returns are available. Does not cause the row to be dropped.
    pub volatility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub ticker: String,
    pub short_window: usize,
    pub long_window: usize,
    pub rows: Vec<IndicatorRow>,
    /// Leading rows removed for lack of history.
    pub dropped: usize,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn validate_window(name: &str, window: usize) -> Result<(), MacrossError> {
    if window == 0 {
        return Err(MacrossError::invalid_parameter(name, "window must be positive"));
    }
    Ok(())
}

/// Smallest series length that leaves at least one fully-defined row.
pub fn minimum_bars(short_window: usize, long_window: usize) -> usize {
    short_window.max(long_window).max(2)
}

pub fn compute_indicators(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Result<IndicatorFrame, MacrossError> {
    validate_window("short_window", short_window)?;
    validate_window("long_window", long_window)?;

    let bars = series.bars();
    let returns = calculate_returns(bars);
    let ma_short = calculate_sma(bars, short_window);
    let ma_long = calculate_sma(bars, long_window);
    let volatility = calculate_volatility(&returns, VOLATILITY_WINDOW);

    let rows: Vec<IndicatorRow> = bars
        .iter()
        .enumerate()
        .filter_map(|(i, bar)| {
            Some(IndicatorRow {
                date: bar.date,
                close: bar.close,
                ret: returns.get(i)?,
                ma_short: ma_short.get(i)?,
                ma_long: ma_long.get(i)?,
                volatility: volatility.get(i),
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(MacrossError::InsufficientData {
            ticker: series.ticker().to_string(),
            rows: bars.len(),
            minimum: minimum_bars(short_window, long_window),
        });
    }

    let dropped = bars.len() - rows.len();
    tracing::debug!(
        ticker = %series.ticker(),
        short_window,
        long_window,
        kept = rows.len(),
        dropped,
        "computed indicators"
    );

    Ok(IndicatorFrame {
        ticker: series.ticker().to_string(),
        short_window,
        long_window,
        rows,
        dropped,
    })
}
