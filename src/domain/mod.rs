//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod indicator_frame;
pub mod signal;
pub mod backtest;
pub mod metrics;
pub mod pipeline;
pub mod optimizer;
pub mod portfolio;
pub mod universe;
pub mod config_validation;
pub mod error;
