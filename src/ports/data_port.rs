//! Market data port trait.
//!
//! The only contract with the data provider: ticker and date range in, ordered
//! price series out, or `DataUnavailable`. Implementations do not retry.

use crate::domain::error::MacrossError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, MacrossError>;

    fn list_symbols(&self) -> Result<Vec<String>, MacrossError> {
        Ok(Vec::new())
    }

    /// First date, last date and bar count available for `ticker`.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacrossError> {
        let _ = ticker;
        Ok(None)
    }
}
