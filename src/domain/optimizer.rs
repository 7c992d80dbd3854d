//! Grid search over moving-average window pairs.
//!
//! Every (short, long) pair is simulated from scratch on the same cleaned series and
//! scored with [`raw_sharpe`], which does not guard against zero variance: a pair
//! whose strategy never earns or loses anything ranks with a NaN or infinite Sharpe
//! ratio instead of 0. This differs from [`crate::domain::metrics::analyze_performance`].

use crate::domain::backtest::{validate_cost_rate, DEFAULT_COST_RATE};
use crate::domain::error::MacrossError;
use crate::domain::metrics::raw_sharpe;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::pipeline::simulate;
use rayon::prelude::*;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizerGrid {
    pub short_windows: Vec<usize>,
    pub long_windows: Vec<usize>,
}

impl Default for OptimizerGrid {
    fn default() -> Self {
        OptimizerGrid {
            short_windows: vec![20, 50, 100],
            long_windows: vec![50, 100, 200],
        }
    }
}

impl OptimizerGrid {
    /// Cross product in traversal order: short outer, long inner.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.short_windows
            .iter()
            .flat_map(|&s| self.long_windows.iter().map(move |&l| (s, l)))
            .collect()
    }

    pub fn validate(&self) -> Result<(), MacrossError> {
        if self.short_windows.is_empty() {
            return Err(MacrossError::invalid_parameter(
                "short_windows",
                "at least one candidate is required",
            ));
        }
        if self.long_windows.is_empty() {
            return Err(MacrossError::invalid_parameter(
                "long_windows",
                "at least one candidate is required",
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct GridCell {
    pub short_window: usize,
    pub long_window: usize,
    /// Unguarded Sharpe ratio, or the error that stopped this pair's pipeline.
    pub sharpe: Result<f64, MacrossError>,
}

#[derive(Debug)]
pub struct OptimizationResult {
    pub cells: Vec<GridCell>,
}

impl OptimizationResult {
    /// Top-ranked cell that produced a Sharpe ratio.
    pub fn best(&self) -> Option<&GridCell> {
        self.cells.iter().find(|c| c.sharpe.is_ok())
    }

    pub fn failures(&self) -> usize {
        self.cells.iter().filter(|c| c.sharpe.is_err()).count()
    }
}

/// Sorting bucket: numbers first, then NaN, then failed pairs.
fn bucket(cell: &GridCell) -> u8 {
    match cell.sharpe {
        Ok(s) if !s.is_nan() => 0,
        Ok(_) => 1,
        Err(_) => 2,
    }
}

fn rank(a: &GridCell, b: &GridCell) -> Ordering {
    bucket(a).cmp(&bucket(b)).then_with(|| match (&a.sharpe, &b.sharpe) {
        (Ok(x), Ok(y)) => y.partial_cmp(x).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    })
}

/// Evaluate one grid cell.
pub fn evaluate_pair(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
    cost_rate: f64,
) -> GridCell {
    let sharpe = simulate(series, short_window, long_window, cost_rate)
        .map(|(_, _, run)| raw_sharpe(&run.strategy_returns()));

    match &sharpe {
        Ok(s) => tracing::debug!(short_window, long_window, sharpe = *s, "grid cell"),
        Err(e) => tracing::warn!(short_window, long_window, error = %e, "grid cell failed"),
    }

    GridCell {
        short_window,
        long_window,
        sharpe,
    }
}

/// Grid search with the default cost rate, in parallel.
pub fn optimize(
    series: &PriceSeries,
    short_candidates: &[usize],
    long_candidates: &[usize],
) -> Result<OptimizationResult, MacrossError> {
    let grid = OptimizerGrid {
        short_windows: short_candidates.to_vec(),
        long_windows: long_candidates.to_vec(),
    };
    optimize_grid(series, &grid, DEFAULT_COST_RATE, true)
}

/// Grid search over `grid`, ranked by descending Sharpe ratio.
///
/// Ties keep traversal order. The ranking does not depend on `parallel`.
pub fn optimize_grid(
    series: &PriceSeries,
    grid: &OptimizerGrid,
    cost_rate: f64,
    parallel: bool,
) -> Result<OptimizationResult, MacrossError> {
    grid.validate()?;
    validate_cost_rate(cost_rate)?;

    let cleaned = series.clean().series;
    let pairs = grid.pairs();
    tracing::info!(
        ticker = %series.ticker(),
        cells = pairs.len(),
        parallel,
        "starting grid search"
    );

    let mut cells: Vec<GridCell> = if parallel {
        pairs
            .par_iter()
            .map(|&(s, l)| evaluate_pair(&cleaned, s, l, cost_rate))
            .collect()
    } else {
        pairs
            .iter()
            .map(|&(s, l)| evaluate_pair(&cleaned, s, l, cost_rate))
            .collect()
    };

    cells.sort_by(rank);

    Ok(OptimizationResult { cells })
}
