//! Result table export port trait.

use crate::domain::error::MacrossError;
use crate::domain::optimizer::OptimizationResult;
use crate::domain::pipeline::PipelineOutput;
use crate::domain::portfolio::PortfolioResult;

/// Port for handing result tables to a persistence collaborator.
pub trait ReportPort {
    fn write_run(&self, ticker: &str, output: &PipelineOutput) -> Result<(), MacrossError>;

    fn write_portfolio(&self, result: &PortfolioResult) -> Result<(), MacrossError>;

    fn write_optimization(
        &self,
        ticker: &str,
        result: &OptimizationResult,
    ) -> Result<(), MacrossError>;
}
