//! CSV report adapter implementing ReportPort.
//!
//! Writes one file per table into `output_dir`:
//! - `<TICKER>_run.csv` and `<TICKER>_metrics.csv` for a single run
//! - `portfolio.csv`
//! - `<TICKER>_optimization.csv`

use crate::domain::error::MacrossError;
use crate::domain::optimizer::OptimizationResult;
use crate::domain::pipeline::PipelineOutput;
use crate::domain::portfolio::PortfolioResult;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvReportAdapter {
    output_dir: PathBuf,
}

fn report_err(path: &Path, e: impl std::fmt::Display) -> MacrossError {
    MacrossError::Report {
        reason: format!("{}: {}", path.display(), e),
    }
}

impl CsvReportAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write_table(
        &self,
        file_name: &str,
        header: &[&str],
        rows: Vec<Vec<String>>,
    ) -> Result<PathBuf, MacrossError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name);

        let mut wtr = csv::Writer::from_path(&path).map_err(|e| report_err(&path, e))?;
        wtr.write_record(header).map_err(|e| report_err(&path, e))?;
        for row in rows {
            wtr.write_record(&row).map_err(|e| report_err(&path, e))?;
        }
        wtr.flush()?;

        tracing::info!(path = %path.display(), "wrote report table");
        Ok(path)
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_run(&self, ticker: &str, output: &PipelineOutput) -> Result<(), MacrossError> {
        let rows = output
            .run
            .points
            .iter()
            .map(|p| {
                vec![
                    p.date.to_string(),
                    p.market_return.to_string(),
                    p.position.to_string(),
                    p.trade.to_string(),
                    p.strategy_return.to_string(),
                    p.cumulative_strategy.to_string(),
                    p.cumulative_market.to_string(),
                ]
            })
            .collect();
        self.write_table(
            &format!("{}_run.csv", ticker),
            &[
                "date",
                "market_return",
                "position",
                "trade",
                "strategy_return",
                "cumulative_strategy",
                "cumulative_market",
            ],
            rows,
        )?;

        let m = &output.metrics;
        let metrics = vec![
            vec!["sharpe".to_string(), m.sharpe.to_string()],
            vec!["max_drawdown".to_string(), m.max_drawdown.to_string()],
            vec!["total_return".to_string(), m.total_return.to_string()],
            vec!["market_return".to_string(), m.market_return.to_string()],
        ];
        self.write_table(&format!("{}_metrics.csv", ticker), &["metric", "value"], metrics)?;
        Ok(())
    }

    fn write_portfolio(&self, result: &PortfolioResult) -> Result<(), MacrossError> {
        let rows = result
            .entries
            .iter()
            .map(|e| match &e.outcome {
                Ok(m) => vec![
                    e.ticker.clone(),
                    m.sharpe.to_string(),
                    m.max_drawdown.to_string(),
                    m.total_return.to_string(),
                    m.market_return.to_string(),
                    String::new(),
                ],
                Err(err) => vec![
                    e.ticker.clone(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    err.to_string(),
                ],
            })
            .collect();
        self.write_table(
            "portfolio.csv",
            &[
                "ticker",
                "sharpe",
                "max_drawdown",
                "total_return",
                "market_return",
                "error",
            ],
            rows,
        )?;
        Ok(())
    }

    fn write_optimization(
        &self,
        ticker: &str,
        result: &OptimizationResult,
    ) -> Result<(), MacrossError> {
        let rows = result
            .cells
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let (sharpe, error) = match &c.sharpe {
                    Ok(s) => (s.to_string(), String::new()),
                    Err(e) => (String::new(), e.to_string()),
                };
                vec![
                    (i + 1).to_string(),
                    c.short_window.to_string(),
                    c.long_window.to_string(),
                    sharpe,
                    error,
                ]
            })
            .collect();
        self.write_table(
            &format!("{}_optimization.csv", ticker),
            &["rank", "short_window", "long_window", "sharpe", "error"],
            rows,
        )?;
        Ok(())
    }
}
