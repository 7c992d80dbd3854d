//! OHLCV bar and price series representation.
//!
//! Only the closing price feeds the engine. Missing prices are carried as NaN and
//! missing volume as `None` until [`PriceSeries::clean`] removes incomplete rows.

use crate::domain::error::MacrossError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<i64>,
}

impl OhlcvBar {
    /// A bar with every price field set to `close`.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        OhlcvBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        }
    }

    /// True when the close is usable: present, finite and positive.
    pub fn has_valid_close(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

/// Ordered bars for one ticker. Dates are strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<OhlcvBar>,
}

/// Outcome of [`PriceSeries::clean`].
#[derive(Debug, Clone, PartialEq)]
pub struct CleanReport {
    pub series: PriceSeries,
    pub dropped: usize,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, bars: Vec<OhlcvBar>) -> Result<Self, MacrossError> {
        let ticker = ticker.into();
        if let Some(w) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(MacrossError::invalid_parameter(
                "series",
                format!(
                    "{}: dates must be strictly increasing ({} then {})",
                    ticker, w[0].date, w[1].date
                ),
            ));
        }
        Ok(PriceSeries { ticker, bars })
    }

    /// Build a series from closing prices on consecutive calendar days.
    pub fn from_closes(
        ticker: impl Into<String>,
        start: NaiveDate,
        closes: &[f64],
    ) -> Result<Self, MacrossError> {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                OhlcvBar::from_close(start + chrono::Duration::days(i as i64), close)
            })
            .collect();
        Self::new(ticker, bars)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Drop bars whose close is missing, non-finite or non-positive.
    ///
    /// Returns a new series; `self` is untouched.
    pub fn clean(&self) -> CleanReport {
        let bars: Vec<OhlcvBar> = self
            .bars
            .iter()
            .filter(|b| b.has_valid_close())
            .cloned()
            .collect();
        let dropped = self.bars.len() - bars.len();
        if dropped > 0 {
            tracing::debug!(ticker = %self.ticker, dropped, "dropped bars without a usable close");
        }
        CleanReport {
            series: PriceSeries {
                ticker: self.ticker.clone(),
                bars,
            },
            dropped,
        }
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn new_accepts_increasing_dates() {
        let bars = vec![OhlcvBar::from_close(day(1), 10.0), OhlcvBar::from_close(day(2), 11.0)];
        let series = PriceSeries::new("BHP", bars).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.ticker(), "BHP");
        assert_eq!(series.first_date(), Some(day(1)));
        assert_eq!(series.last_date(), Some(day(2)));
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let bars = vec![OhlcvBar::from_close(day(1), 10.0), OhlcvBar::from_close(day(1), 11.0)];
        let err = PriceSeries::new("BHP", bars).unwrap_err();
        assert!(matches!(err, MacrossError::InvalidParameter { .. }));
    }

    #[test]
    fn new_rejects_unordered_dates() {
        let bars = vec![OhlcvBar::from_close(day(3), 10.0), OhlcvBar::from_close(day(2), 11.0)];
        assert!(PriceSeries::new("BHP", bars).is_err());
    }

    #[test]
    fn from_closes_uses_consecutive_days() {
        let series = PriceSeries::from_closes("T", day(1), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.bars()[2].date, day(3));
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn clean_drops_unusable_closes() {
        let series =
            PriceSeries::from_closes("T", day(1), &[10.0, f64::NAN, 11.0, 0.0, -1.0, 12.0])
                .unwrap();
        let report = series.clean();
        assert_eq!(report.dropped, 3);
        assert_eq!(report.series.closes(), vec![10.0, 11.0, 12.0]);
        // source untouched
        assert_eq!(series.len(), 6);
    }

    #[test]
    fn clean_ignores_other_missing_fields() {
        let mut bar = OhlcvBar::from_close(day(1), 10.0);
        bar.open = f64::NAN;
        let series = PriceSeries::new("T", vec![bar]).unwrap();
        let report = series.clean();
        assert_eq!(report.dropped, 0);
        assert_eq!(report.series.len(), 1);
    }
}
