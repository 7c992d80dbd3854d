//! Crossover signal generation.

use crate::domain::indicator_frame::IndicatorRow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Short,
    Flat,
    Long,
}

impl Signal {
    /// Position direction: -1, 0 or +1.
    pub fn direction(self) -> i8 {
        match self {
            Signal::Short => -1,
            Signal::Flat => 0,
            Signal::Long => 1,
        }
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.direction())
    }

    /// Position change between two consecutive signals: 0, 1 or 2.
    pub fn trade_magnitude(self, previous: Signal) -> f64 {
        f64::from((self.direction() - previous.direction()).abs())
    }

    pub fn from_averages(ma_short: f64, ma_long: f64) -> Signal {
        if ma_short > ma_long {
            Signal::Long
        } else if ma_short < ma_long {
            Signal::Short
        } else {
            Signal::Flat
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.direction())
    }
}

pub fn generate_signals(rows: &[IndicatorRow]) -> Vec<Signal> {
    rows.iter()
        .map(|row| Signal::from_averages(row.ma_short, row.ma_long))
        .collect()
}
