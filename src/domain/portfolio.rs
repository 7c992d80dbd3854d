//! Independent per-ticker backtests tabulated side by side.
//!
//! There is no cross-asset logic: each ticker is fetched and run on its own, and a
//! failing ticker only fills its own slot with the error.

use crate::domain::backtest::{validate_date_range, BacktestConfig};
use crate::domain::error::MacrossError;
use crate::domain::metrics::PerformanceMetrics;
use crate::domain::pipeline::run_pipeline;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use rayon::prelude::*;

#[derive(Debug)]
pub struct PortfolioEntry {
    pub ticker: String,
    pub outcome: Result<PerformanceMetrics, MacrossError>,
}

/// Entries in input ticker order.
#[derive(Debug)]
pub struct PortfolioResult {
    pub entries: Vec<PortfolioEntry>,
}

impl PortfolioResult {
    pub fn get(&self, ticker: &str) -> Option<&Result<PerformanceMetrics, MacrossError>> {
        self.entries
            .iter()
            .find(|e| e.ticker == ticker)
            .map(|e| &e.outcome)
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.ticker.as_str()).collect()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_ok()).count()
    }
}

fn run_ticker(
    ticker: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    ingest: &(dyn DataPort + Sync),
    config: &BacktestConfig,
) -> PortfolioEntry {
    let outcome = ingest
        .fetch_series(ticker, start_date, end_date)
        .and_then(|series| run_pipeline(&series, config))
        .map(|out| out.metrics);

    match &outcome {
        Ok(m) => tracing::debug!(ticker, sharpe = m.sharpe, total_return = m.total_return, "ticker done"),
        Err(e) => tracing::warn!(ticker, error = %e, "ticker failed"),
    }

    PortfolioEntry {
        ticker: ticker.to_string(),
        outcome,
    }
}

/// Run the full pipeline for every ticker over `[start_date, end_date]`.
///
/// Windows, cost rate and the `parallel` flag come from `config`; its own dates are
/// ignored. Bad parameters fail the whole call before any ticker is fetched. Per-ticker
/// failures after that land in the ticker's entry.
pub fn run_portfolio(
    tickers: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
    ingest: &(dyn DataPort + Sync),
    config: &BacktestConfig,
) -> Result<PortfolioResult, MacrossError> {
    config.validate_parameters()?;
    validate_date_range(start_date, end_date)?;
    tracing::info!(tickers = tickers.len(), %start_date, %end_date, "starting portfolio run");

    let entries = if config.parallel {
        tickers
            .par_iter()
            .map(|t| run_ticker(t, start_date, end_date, ingest, config))
            .collect()
    } else {
        tickers
            .iter()
            .map(|t| run_ticker(t, start_date, end_date, ingest, config))
            .collect()
    };

    Ok(PortfolioResult { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::PriceSeries;
    use std::collections::HashMap;

    struct StubPort {
        closes: HashMap<String, Vec<f64>>,
    }

    impl DataPort for StubPort {
        fn fetch_series(
            &self,
            ticker: &str,
            start_date: NaiveDate,
            _end_date: NaiveDate,
        ) -> Result<PriceSeries, MacrossError> {
            match self.closes.get(ticker) {
                Some(c) => PriceSeries::from_closes(ticker, start_date, c),
                None => Err(MacrossError::DataUnavailable {
                    ticker: ticker.to_string(),
                    reason: "unknown ticker".into(),
                }),
            }
        }
    }

    fn config(parallel: bool) -> BacktestConfig {
        BacktestConfig {
            short_window: 2,
            long_window: 4,
            parallel,
            ..BacktestConfig::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            )
        }
    }

    fn port() -> StubPort {
        let mut closes = HashMap::new();
        closes.insert(
            "UP".to_string(),
            (0..30).map(|i| 100.0 + i as f64).collect::<Vec<_>>(),
        );
        closes.insert(
            "WAVE".to_string(),
            (0..30).map(|i| 100.0 + 5.0 * (i as f64).sin()).collect::<Vec<_>>(),
        );
        closes.insert("SHORT".to_string(), vec![1.0, 2.0]);
        StubPort { closes }
    }

    fn tickers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn entries_keep_input_order() {
        let c = config(true);
        let result = run_portfolio(
            &tickers(&["WAVE", "UP", "MISSING", "SHORT"]),
            c.start_date,
            c.end_date,
            &port(),
            &c,
        )
        .unwrap();
        assert_eq!(result.tickers(), vec!["WAVE", "UP", "MISSING", "SHORT"]);
        assert_eq!(result.succeeded(), 2);
    }

    #[test]
    fn failures_are_isolated() {
        let c = config(false);
        let result = run_portfolio(
            &tickers(&["MISSING", "UP", "SHORT"]),
            c.start_date,
            c.end_date,
            &port(),
            &c,
        )
        .unwrap();
        assert!(matches!(
            result.get("MISSING"),
            Some(Err(MacrossError::DataUnavailable { .. }))
        ));
        assert!(matches!(
            result.get("SHORT"),
            Some(Err(MacrossError::InsufficientData { .. }))
        ));
        let up = result.get("UP").unwrap().as_ref().unwrap();
        assert!(up.market_return > 0.0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let list = tickers(&["UP", "WAVE"]);
        let (start, end) = (config(false).start_date, config(false).end_date);
        let seq = run_portfolio(&list, start, end, &port(), &config(false)).unwrap();
        let par = run_portfolio(&list, start, end, &port(), &config(true)).unwrap();
        for (a, b) in seq.entries.iter().zip(&par.entries) {
            assert_eq!(a.ticker, b.ticker);
            assert_eq!(a.outcome.as_ref().unwrap(), b.outcome.as_ref().unwrap());
        }
    }

    #[test]
    fn empty_ticker_list() {
        let c = config(true);
        let result = run_portfolio(&[], c.start_date, c.end_date, &port(), &c).unwrap();
        assert!(result.entries.is_empty());
    }

    #[test]
    fn zero_window_rejected_for_whole_call() {
        let c = BacktestConfig {
            short_window: 0,
            ..config(false)
        };
        let err = run_portfolio(&tickers(&["UP"]), c.start_date, c.end_date, &port(), &c)
            .unwrap_err();
        assert!(matches!(err, MacrossError::InvalidParameter { ref name, .. } if name == "short_window"));
    }

    #[test]
    fn inverted_range_rejected() {
        let c = config(false);
        let err = run_portfolio(&tickers(&["UP"]), c.end_date, c.start_date, &port(), &c)
            .unwrap_err();
        assert!(matches!(err, MacrossError::InvalidParameter { ref name, .. } if name == "start_date"));
    }
}
