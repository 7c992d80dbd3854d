//! Ticker universe for portfolio runs.
//!
//! Parses ticker lists from configuration. Tickers keep their configured order,
//! which is the order of every portfolio table.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),
}

/// Split a comma-separated list into uppercase tickers.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let ticker = trimmed.to_uppercase();
        if !seen.insert(ticker.clone()) {
            return Err(UniverseError::DuplicateTicker(ticker));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tickers_basic() {
        let result = parse_tickers("INFY.NS,TCS.NS,RELIANCE.NS").unwrap();
        assert_eq!(result, vec!["INFY.NS", "TCS.NS", "RELIANCE.NS"]);
    }

    #[test]
    fn parse_tickers_with_whitespace() {
        let result = parse_tickers("  INFY.NS , TCS.NS ,HDFCBANK.NS  ").unwrap();
        assert_eq!(result, vec!["INFY.NS", "TCS.NS", "HDFCBANK.NS"]);
    }

    #[test]
    fn parse_tickers_uppercase() {
        let result = parse_tickers("infy.ns,tcs.ns").unwrap();
        assert_eq!(result, vec!["INFY.NS", "TCS.NS"]);
    }

    #[test]
    fn parse_tickers_single() {
        assert_eq!(parse_tickers("AAPL").unwrap(), vec!["AAPL"]);
    }

    #[test]
    fn parse_tickers_empty_token() {
        assert_eq!(parse_tickers("A,,B"), Err(UniverseError::EmptyToken));
        assert_eq!(parse_tickers(""), Err(UniverseError::EmptyToken));
    }

    #[test]
    fn parse_tickers_duplicate() {
        let result = parse_tickers("TCS.NS,INFY.NS,tcs.ns");
        assert!(matches!(result, Err(UniverseError::DuplicateTicker(s)) if s == "TCS.NS"));
    }
}
