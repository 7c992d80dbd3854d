//! Single-series pipeline: indicators, signals, simulation, metrics.

use crate::domain::backtest::{backtest, BacktestConfig, StrategyRun};
use crate::domain::error::MacrossError;
use crate::domain::indicator_frame::{compute_indicators, IndicatorFrame};
use crate::domain::metrics::{analyze_performance, PerformanceMetrics};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{generate_signals, Signal};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub frame: IndicatorFrame,
    pub signals: Vec<Signal>,
    pub run: StrategyRun,
    pub metrics: PerformanceMetrics,
}

/// Attach the ticker to an `InsufficientData` raised by a stage that does not know it.
pub(crate) fn with_ticker(err: MacrossError, ticker: &str) -> MacrossError {
    match err {
        MacrossError::InsufficientData {
            ticker: t,
            rows,
            minimum,
        } if t.is_empty() => MacrossError::InsufficientData {
            ticker: ticker.to_string(),
            rows,
            minimum,
        },
        other => other,
    }
}

/// Run indicators through backtest for one window pair. Shared with the optimizer.
pub(crate) fn simulate(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
    cost_rate: f64,
) -> Result<(IndicatorFrame, Vec<Signal>, StrategyRun), MacrossError> {
    let frame = compute_indicators(series, short_window, long_window)?;
    let signals = generate_signals(&frame.rows);
    let run = backtest(&frame.rows, &signals, cost_rate)
        .map_err(|e| with_ticker(e, series.ticker()))?;
    Ok((frame, signals, run))
}

/// Clean the series and run the full pipeline with the configured windows.
///
/// The config's date range is not consulted; `series` is already the range to test.
pub fn run_pipeline(
    series: &PriceSeries,
    config: &BacktestConfig,
) -> Result<PipelineOutput, MacrossError> {
    config.validate_parameters()?;

    let cleaned = series.clean();
    let (frame, signals, run) = simulate(
        &cleaned.series,
        config.short_window,
        config.long_window,
        config.cost_rate,
    )?;
    let metrics =
        analyze_performance(&run).map_err(|e| with_ticker(e, series.ticker()))?;

    Ok(PipelineOutput {
        frame,
        signals,
        run,
        metrics,
    })
}
