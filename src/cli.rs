//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{
    BacktestConfig, DEFAULT_COST_RATE, DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW,
};
use crate::domain::config_validation::{
    read_date, read_tickers, validate_backtest_config, validate_optimizer_config,
};
use crate::domain::error::MacrossError;
use crate::domain::optimizer::{optimize_grid, OptimizationResult, OptimizerGrid};
use crate::domain::pipeline::{run_pipeline, PipelineOutput};
use crate::domain::portfolio::{run_portfolio, PortfolioResult};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "macross", about = "Moving-average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest one ticker with the configured windows
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Grid-search window pairs for one ticker
    Optimize {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Backtest every configured ticker independently
    Portfolio {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List tickers available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range for ticker(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            ticker,
            output,
        } => run_backtest(&config, ticker.as_deref(), output.as_deref()),
        Command::Optimize {
            config,
            ticker,
            output,
        } => run_optimize(&config, ticker.as_deref(), output.as_deref()),
        Command::Portfolio { config, output } => run_portfolio_cmd(&config, output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, MacrossError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// Immutable run settings from the `[backtest]` section, with defaults.
pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, MacrossError> {
    Ok(BacktestConfig {
        start_date: read_date(adapter, "start_date")?,
        end_date: read_date(adapter, "end_date")?,
        short_window: adapter
            .get_window("backtest", "short_window")?
            .unwrap_or(DEFAULT_SHORT_WINDOW),
        long_window: adapter
            .get_window("backtest", "long_window")?
            .unwrap_or(DEFAULT_LONG_WINDOW),
        cost_rate: adapter.get_double("backtest", "cost_rate", DEFAULT_COST_RATE),
        parallel: adapter.get_flag("backtest", "parallel")?.unwrap_or(true),
    })
}

/// Candidate windows from the `[optimizer]` section, with defaults.
pub fn build_grid(adapter: &dyn ConfigPort) -> Result<OptimizerGrid, MacrossError> {
    let defaults = OptimizerGrid::default();
    Ok(OptimizerGrid {
        short_windows: adapter
            .get_windows("optimizer", "short_windows")?
            .unwrap_or(defaults.short_windows),
        long_windows: adapter
            .get_windows("optimizer", "long_windows")?
            .unwrap_or(defaults.long_windows),
    })
}

/// `--ticker` override, else every configured ticker.
pub fn resolve_tickers(
    ticker_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, MacrossError> {
    match ticker_override {
        Some(t) if !t.trim().is_empty() => Ok(vec![t.trim().to_uppercase()]),
        _ => read_tickers(config),
    }
}

fn data_port(config: &dyn ConfigPort) -> Result<CsvAdapter, MacrossError> {
    let dir = config
        .get_string("backtest", "data_dir")
        .ok_or_else(|| MacrossError::ConfigMissing {
            section: "backtest".into(),
            key: "data_dir".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(dir)))
}

fn report_port(output: Option<&Path>, config: &dyn ConfigPort) -> Option<CsvReportAdapter> {
    output
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("report", "output_dir").map(PathBuf::from))
        .map(CsvReportAdapter::new)
}

fn load_validated(config_path: &Path) -> Result<(FileConfigAdapter, BacktestConfig), MacrossError> {
    let adapter = load_config(config_path)?;
    validate_backtest_config(&adapter)?;
    let bt_config = build_backtest_config(&adapter)?;
    bt_config.validate()?;
    Ok((adapter, bt_config))
}

fn first_ticker(ticker_override: Option<&str>, config: &dyn ConfigPort) -> Result<String, MacrossError> {
    resolve_tickers(ticker_override, config)?
        .into_iter()
        .next()
        .ok_or_else(|| MacrossError::ConfigMissing {
            section: "backtest".into(),
            key: "ticker".into(),
        })
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    ticker: &str,
    bt_config: &BacktestConfig,
) -> Result<PipelineOutput, MacrossError> {
    bt_config.validate()?;
    let series = data_port.fetch_series(ticker, bt_config.start_date, bt_config.end_date)?;
    eprintln!(
        "Running backtest: {} ({} bars, {} to {}), SMA({}) vs SMA({}), cost {}",
        ticker,
        series.len(),
        bt_config.start_date,
        bt_config.end_date,
        bt_config.short_window,
        bt_config.long_window,
        bt_config.cost_rate,
    );
    run_pipeline(&series, bt_config)
}

fn run_backtest(
    config_path: &Path,
    ticker_override: Option<&str>,
    output: Option<&Path>,
) -> Result<(), MacrossError> {
    let (adapter, bt_config) = load_validated(config_path)?;
    let ticker = first_ticker(ticker_override, &adapter)?;
    let port = data_port(&adapter)?;

    let out = run_backtest_pipeline(&port, &ticker, &bt_config)?;

    eprintln!("\n=== {} ===", ticker);
    eprintln!("Rows used:        {} ({} dropped for warmup)", out.frame.len(), out.frame.dropped);
    eprintln!("Trades:           {}", out.run.trade_count());
    print_metrics(&out);

    if let Some(report) = report_port(output, &adapter) {
        report.write_run(&ticker, &out)?;
        eprintln!("\nReport written to: {}", report.output_dir().display());
    }
    Ok(())
}

fn print_metrics(out: &PipelineOutput) {
    let m = &out.metrics;
    eprintln!("Sharpe Ratio:     {:.2}", m.sharpe);
    eprintln!("Max Drawdown:     {:.2}%", m.max_drawdown * 100.0);
    eprintln!("Strategy Return:  {:.2}%", m.total_return * 100.0);
    eprintln!("Market Return:    {:.2}%", m.market_return * 100.0);
}

fn run_optimize(
    config_path: &Path,
    ticker_override: Option<&str>,
    output: Option<&Path>,
) -> Result<(), MacrossError> {
    let (adapter, bt_config) = load_validated(config_path)?;
    validate_optimizer_config(&adapter)?;
    let grid = build_grid(&adapter)?;
    let ticker = first_ticker(ticker_override, &adapter)?;
    let port = data_port(&adapter)?;

    let series = port.fetch_series(&ticker, bt_config.start_date, bt_config.end_date)?;
    eprintln!(
        "Optimizing {}: {} short x {} long windows over {} bars",
        ticker,
        grid.short_windows.len(),
        grid.long_windows.len(),
        series.len()
    );

    let result = optimize_grid(&series, &grid, bt_config.cost_rate, bt_config.parallel)?;
    print_optimization(&result);

    if let Some(report) = report_port(output, &adapter) {
        report.write_optimization(&ticker, &result)?;
        eprintln!("\nReport written to: {}", report.output_dir().display());
    }
    Ok(())
}

pub fn print_optimization(result: &OptimizationResult) {
    println!("{:>5} {:>6} {:>6} {:>10}", "rank", "short", "long", "sharpe");
    for (i, cell) in result.cells.iter().enumerate() {
        match &cell.sharpe {
            Ok(s) => println!(
                "{:>5} {:>6} {:>6} {:>10.4}",
                i + 1,
                cell.short_window,
                cell.long_window,
                s
            ),
            Err(e) => println!(
                "{:>5} {:>6} {:>6}   failed: {}",
                i + 1,
                cell.short_window,
                cell.long_window,
                e
            ),
        }
    }
}

fn run_portfolio_cmd(config_path: &Path, output: Option<&Path>) -> Result<(), MacrossError> {
    let (adapter, bt_config) = load_validated(config_path)?;
    let tickers = read_tickers(&adapter)?;
    let port = data_port(&adapter)?;

    eprintln!(
        "Running portfolio: {} tickers, {} to {}",
        tickers.len(),
        bt_config.start_date,
        bt_config.end_date
    );
    let result = run_portfolio(
        &tickers,
        bt_config.start_date,
        bt_config.end_date,
        &port,
        &bt_config,
    )?;
    print_portfolio(&result);

    if let Some(report) = report_port(output, &adapter) {
        report.write_portfolio(&result)?;
        eprintln!("\nReport written to: {}", report.output_dir().display());
    }

    if result.succeeded() == 0 && !result.entries.is_empty() {
        return Err(MacrossError::InsufficientData {
            ticker: "all".to_string(),
            rows: 0,
            minimum: 1,
        });
    }
    Ok(())
}

pub fn print_portfolio(result: &PortfolioResult) {
    println!(
        "{:<16} {:>8} {:>10} {:>10} {:>10}",
        "ticker", "sharpe", "drawdown", "strategy", "market"
    );
    for entry in &result.entries {
        match &entry.outcome {
            Ok(m) => println!(
                "{:<16} {:>8.2} {:>9.2}% {:>9.2}% {:>9.2}%",
                entry.ticker,
                m.sharpe,
                m.max_drawdown * 100.0,
                m.total_return * 100.0,
                m.market_return * 100.0
            ),
            Err(e) => println!("{:<16} failed: {}", entry.ticker, e),
        }
    }
}

fn run_validate(config_path: &Path) -> Result<(), MacrossError> {
    let (adapter, bt_config) = load_validated(config_path)?;
    validate_optimizer_config(&adapter)?;
    let grid = build_grid(&adapter)?;
    let tickers = read_tickers(&adapter)?;

    eprintln!("\nBacktest:");
    eprintln!("  tickers:  {}", tickers.join(", "));
    eprintln!("  range:    {} to {}", bt_config.start_date, bt_config.end_date);
    eprintln!(
        "  windows:  SMA({}) vs SMA({})",
        bt_config.short_window, bt_config.long_window
    );
    eprintln!("  cost:     {}", bt_config.cost_rate);
    eprintln!("\nOptimizer grid:");
    eprintln!("  short:    {:?}", grid.short_windows);
    eprintln!("  long:     {:?}", grid.long_windows);
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), MacrossError> {
    let adapter = load_config(config_path)?;
    let port = data_port(&adapter)?;

    let symbols = port.list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn run_info(config_path: &Path, ticker_override: Option<&str>) -> Result<(), MacrossError> {
    let adapter = load_config(config_path)?;
    let port = data_port(&adapter)?;

    for t in resolve_tickers(ticker_override, &adapter)? {
        match port.get_data_range(&t) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} bars, {} to {}", t, count, first, last)
            }
            Ok(None) => eprintln!("{}: no data found", t),
            Err(e) => eprintln!("error querying {}: {}", t, e),
        }
    }
    Ok(())
}
