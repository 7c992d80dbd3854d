#![allow(dead_code)]

use chrono::NaiveDate;
use macross::domain::error::MacrossError;
pub use macross::domain::ohlcv::{OhlcvBar, PriceSeries};
use macross::ports::data_port::DataPort;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_series(mut self, ticker: &str, closes: &[f64]) -> Self {
        let series = series_from_closes(ticker, closes);
        self.data.insert(ticker.to_string(), series.bars().to_vec());
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    /// Number of `fetch_series` calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, MacrossError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.errors.get(ticker) {
            return Err(MacrossError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        let bars: Vec<OhlcvBar> = self
            .data
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if bars.is_empty() {
            return Err(MacrossError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: "no data".to_string(),
            });
        }
        PriceSeries::new(ticker, bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, MacrossError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn start() -> NaiveDate {
    date("2024-01-01")
}

pub fn end() -> NaiveDate {
    date("2030-01-01")
}

pub fn series_from_closes(ticker: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::from_closes(ticker, start(), closes).unwrap()
}

/// Linear trend from `first`, `step` per bar.
pub fn trend(first: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| first + step * i as f64).collect()
}

/// Sine wave around `mid`, so crossovers happen in both directions.
pub fn wave(mid: f64, amplitude: f64, period: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| mid + amplitude * (i as f64 * std::f64::consts::TAU / period).sin())
        .collect()
}

/// The eight-bar fixture with windows 2/3.
pub const SCENARIO: [f64; 8] = [100.0, 101.0, 99.0, 102.0, 104.0, 103.0, 106.0, 108.0];
