//! Configuration validation.
//!
//! Validates all config fields before a run starts. `read_date` and `read_tickers` are
//! also used to build the run settings.

use crate::domain::error::MacrossError;
use crate::domain::universe::parse_tickers;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    validate_data_dir(config)?;
    config.get_window("backtest", "short_window")?;
    config.get_window("backtest", "long_window")?;
    config.get_flag("backtest", "parallel")?;
    validate_cost_rate(config)?;
    validate_dates(config)?;
    read_tickers(config)?;
    Ok(())
}

pub fn validate_optimizer_config(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    config.get_windows("optimizer", "short_windows")?;
    config.get_windows("optimizer", "long_windows")?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> MacrossError {
    MacrossError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn missing(section: &str, key: &str) -> MacrossError {
    MacrossError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    match config.get_string("backtest", "data_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(missing("backtest", "data_dir")),
    }
}

fn validate_cost_rate(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    let Some(raw) = config.get_string("backtest", "cost_rate") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(()),
        _ => Err(invalid(
            "backtest",
            "cost_rate",
            "cost_rate must be a non-negative number",
        )),
    }
}

pub fn read_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, MacrossError> {
    let value = config
        .get_string("backtest", key)
        .ok_or_else(|| missing("backtest", key))?;
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        invalid(
            "backtest",
            key,
            format!("invalid {} format, expected YYYY-MM-DD", key),
        )
    })
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    let start_date = read_date(config, "start_date")?;
    let end_date = read_date(config, "end_date")?;

    if start_date >= end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

/// Tickers from `tickers`, falling back to `ticker`.
pub fn read_tickers(config: &dyn ConfigPort) -> Result<Vec<String>, MacrossError> {
    let (key, value) = match config.get_string("backtest", "tickers") {
        Some(v) => ("tickers", v),
        None => match config.get_string("backtest", "ticker") {
            Some(v) => ("ticker", v),
            None => return Err(missing("backtest", "ticker")),
        },
    };
    parse_tickers(&value).map_err(|e| invalid("backtest", key, e.to_string()))
}
