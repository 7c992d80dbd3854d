//! Rolling standard deviation of returns (volatility).
//!
//! Sample standard deviation (n - 1 denominator) over the last n return points.
//! VOL(n)[i] = sqrt(sum((R[i-j] - mean)^2 for j in 0..n) / (n - 1))
//! A point is valid only when every return in its window is valid, so on a returns
//! series the first n bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};

pub fn calculate_volatility(returns: &IndicatorSeries, period: usize) -> IndicatorSeries {
    let points = &returns.values;
    let mut values = Vec::with_capacity(points.len());

    for i in 0..points.len() {
        let window = if period >= 2 && i + 1 >= period {
            Some(&points[i + 1 - period..=i])
        } else {
            None
        };
        let window = window.filter(|w| w.iter().all(|p| p.valid));

        let (valid, value) = match window {
            Some(w) => {
                let n = period as f64;
                let mean = w.iter().map(|p| p.value).sum::<f64>() / n;
                let variance = w
                    .iter()
                    .map(|p| {
                        let diff = p.value - mean;
                        diff * diff
                    })
                    .sum::<f64>()
                    / (n - 1.0);
                (true, variance.sqrt())
            }
            None => (false, 0.0),
        };

        values.push(IndicatorPoint {
            date: points[i].date,
            valid,
            value,
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Volatility(period),
        values,
    }
}
