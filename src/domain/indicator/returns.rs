//! Simple returns.
//!
//! RET[i] = C[i] / C[i-1] - 1
//! Warmup: the first bar is invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_returns(bars: &[OhlcvBar]) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        let valid = i >= 1;
        let value = if valid {
            bars[i].close / bars[i - 1].close - 1.0
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            date: bars[i].date,
            valid,
            value,
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Returns,
        values,
    }
}
