//! CSV file data adapter.
//!
//! Reads `<base_path>/<TICKER>.csv`. Columns are located by header name
//! (case-insensitive): `date` and `close` are required, `open`, `high`, `low` and
//! `volume` are optional. Empty cells are read as missing values.

use crate::domain::error::MacrossError;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: usize,
    volume: Option<usize>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read_bars(&self, ticker: &str) -> Result<Vec<OhlcvBar>, MacrossError> {
        let unavailable = |reason: String| MacrossError::DataUnavailable {
            ticker: ticker.to_string(),
            reason,
        };

        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path)
            .map_err(|e| unavailable(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| unavailable(format!("CSV header error: {}", e)))?
            .clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let columns = Columns {
            date: find("date").ok_or_else(|| unavailable("missing date column".into()))?,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            close: find("close").ok_or_else(|| unavailable("missing close column".into()))?,
            volume: find("volume"),
        };

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| unavailable(format!("CSV parse error: {}", e)))?;

            let date_str = record.get(columns.date).unwrap_or("").trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| unavailable(format!("invalid date {:?}: {}", date_str, e)))?;

            let price = |idx: Option<usize>, name: &str| -> Result<f64, MacrossError> {
                match idx.and_then(|i| record.get(i)).map(str::trim) {
                    None | Some("") => Ok(f64::NAN),
                    Some(v) => v
                        .parse()
                        .map_err(|e| unavailable(format!("invalid {} value {:?}: {}", name, v, e))),
                }
            };

            let volume = match columns.volume.and_then(|i| record.get(i)).map(str::trim) {
                None | Some("") => None,
                Some(v) => Some(
                    v.parse::<f64>()
                        .map_err(|e| unavailable(format!("invalid volume value {:?}: {}", v, e)))?
                        as i64,
                ),
            };

            bars.push(OhlcvBar {
                date,
                open: price(columns.open, "open")?,
                high: price(columns.high, "high")?,
                low: price(columns.low, "low")?,
                close: price(Some(columns.close), "close")?,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, MacrossError> {
        let bars: Vec<OhlcvBar> = self
            .read_bars(ticker)?
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();

        if bars.is_empty() {
            return Err(MacrossError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: format!("no bars between {} and {}", start_date, end_date),
            });
        }

        PriceSeries::new(ticker, bars).map_err(|e| MacrossError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: e.to_string(),
        })
    }

    fn list_symbols(&self) -> Result<Vec<String>, MacrossError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name_str = name.to_string_lossy();
            if let Some(ticker) = name_str.strip_suffix(".csv") {
                symbols.push(ticker.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacrossError> {
        if !self.csv_path(ticker).exists() {
            return Ok(None);
        }
        let bars = self.read_bars(ticker)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
