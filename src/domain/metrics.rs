//! Performance metrics for a completed strategy run.

use crate::domain::backtest::StrategyRun;
use crate::domain::error::MacrossError;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    pub sharpe: f64,
    /// Always <= 0.
    pub max_drawdown: f64,
    pub total_return: f64,
    pub market_return: f64,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation. NaN for fewer than two values.
pub fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Annualized Sharpe ratio computed as-is: `mean / std * sqrt(252)`.
///
/// Zero variance yields NaN or an infinity, a short series yields NaN.
pub fn raw_sharpe(returns: &[f64]) -> f64 {
    mean(returns) / sample_stddev(returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Annualized Sharpe ratio, failing when the standard deviation is zero or undefined.
pub fn sharpe_ratio(returns: &[f64]) -> Result<f64, MacrossError> {
    let std = sample_stddev(returns);
    if std == 0.0 || !std.is_finite() {
        return Err(MacrossError::UndefinedMetric {
            metric: "sharpe".to_string(),
        });
    }
    Ok(mean(returns) / std * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Minimum over time of `(value - running_peak) / running_peak`.
pub fn max_drawdown(cumulative: &[f64]) -> f64 {
    let Some(&first) = cumulative.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &value in cumulative {
        if value > peak {
            peak = value;
        }
        let dd = (value - peak) / peak;
        if dd < max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

/// Score a run. An undefined Sharpe ratio is reported as 0.
pub fn analyze_performance(run: &StrategyRun) -> Result<PerformanceMetrics, MacrossError> {
    let last = run.points.last().ok_or_else(|| MacrossError::InsufficientData {
        ticker: String::new(),
        rows: 0,
        minimum: 1,
    })?;

    let returns = run.strategy_returns();
    let sharpe = match sharpe_ratio(&returns) {
        Ok(s) => s,
        Err(MacrossError::UndefinedMetric { .. }) => 0.0,
        Err(e) => return Err(e),
    };

    Ok(PerformanceMetrics {
        sharpe,
        max_drawdown: max_drawdown(&run.cumulative_strategy()),
        total_return: last.cumulative_strategy - 1.0,
        market_return: last.cumulative_market - 1.0,
    })
}
