//! Technical indicator implementations.
//!
//! Each indicator produces an [`IndicatorSeries`] aligned one-to-one with the input
//! bars. Points inside the warmup period are kept but flagged `valid == false`;
//! callers decide whether to drop them (see [`crate::domain::indicator_frame`]).

pub mod returns;
pub mod sma;
pub mod stddev;

use chrono::NaiveDate;
use std::fmt;

/// Rolling window of the volatility indicator, independent of the MA windows.
pub const VOLATILITY_WINDOW: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Returns,
    Sma(usize),
    Volatility(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// The value at `index` if it lies past the warmup period.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values
            .get(index)
            .filter(|p| p.valid)
            .map(|p| p.value)
    }

    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|p| p.valid).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Returns => write!(f, "RETURNS"),
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Volatility(period) => write!(f, "VOLATILITY({})", period),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_type_display() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
        assert_eq!(IndicatorType::Returns.to_string(), "RETURNS");
        assert_eq!(
            IndicatorType::Volatility(VOLATILITY_WINDOW).to_string(),
            "VOLATILITY(20)"
        );
    }

    #[test]
    fn get_skips_warmup_points() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = IndicatorSeries {
            indicator_type: IndicatorType::Sma(2),
            values: vec![
                IndicatorPoint {
                    date,
                    valid: false,
                    value: 0.0,
                },
                IndicatorPoint {
                    date: date.succ_opt().unwrap(),
                    valid: true,
                    value: 1.5,
                },
            ],
        };
        assert_eq!(series.get(0), None);
        assert_eq!(series.get(1), Some(1.5));
        assert_eq!(series.get(2), None);
        assert_eq!(series.valid_count(), 1);
    }
}
