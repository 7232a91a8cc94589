//! Symbol lists and history checks shared by both scanners.
//!
//! Parses comma-separated symbol lists from configuration and decides
//! whether a fetched series is long enough to evaluate.

use crate::domain::ohlcv::OhlcvBar;
use std::collections::HashSet;

pub const DEFAULT_FALLBACK_SYMBOLS: [&str; 5] =
    ["BTCUSDT", "ETHUSDT", "SOLUSDT", "DOGEUSDT", "XRPUSDT"];

pub const DEFAULT_WATCH_LIST: [&str; 12] = [
    "BTC-USD", "ETH-USD", "SOL-USD", "AVAX-USD", "NVDA", "TSLA", "AAPL", "AMD", "COIN", "MSFT",
    "GOOGL", "META",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

pub fn to_owned_list(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoData,
    InsufficientBars { bars: usize, minimum: usize },
}

/// `Some(reason)` when `bars` cannot be evaluated.
pub fn check_history(bars: &[OhlcvBar], minimum: usize) -> Option<SkipReason> {
    if bars.is_empty() {
        Some(SkipReason::NoData)
    } else if bars.len() < minimum {
        Some(SkipReason::InsufficientBars {
            bars: bars.len(),
            minimum,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bars(n: usize) -> Vec<OhlcvBar> {
        (0..n)
            .map(|_| OhlcvBar {
                symbol: "BTCUSDT".into(),
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                volume: 1.0,
            })
            .collect()
    }

    #[test]
    fn parse_symbols_basic() {
        let result = parse_symbols("BTCUSDT,ETHUSDT,SOLUSDT").unwrap();
        assert_eq!(result, vec!["BTCUSDT", "ETHUSDT", "SOLUSDT"]);
    }

    #[test]
    fn parse_symbols_trims_and_uppercases() {
        let result = parse_symbols("  btc-usd , nvda ,Meta").unwrap();
        assert_eq!(result, vec!["BTC-USD", "NVDA", "META"]);
    }

    #[test]
    fn parse_symbols_empty_token() {
        assert_eq!(parse_symbols("NVDA,,AMD"), Err(UniverseError::EmptyToken));
        assert_eq!(parse_symbols(""), Err(UniverseError::EmptyToken));
    }

    #[test]
    fn parse_symbols_duplicate() {
        let result = parse_symbols("NVDA,AMD,nvda");
        assert_eq!(result, Err(UniverseError::DuplicateSymbol("NVDA".into())));
    }

    #[test]
    fn default_lists_are_valid() {
        assert_eq!(
            parse_symbols(&DEFAULT_WATCH_LIST.join(",")).unwrap(),
            to_owned_list(&DEFAULT_WATCH_LIST)
        );
        assert_eq!(
            parse_symbols(&DEFAULT_FALLBACK_SYMBOLS.join(",")).unwrap(),
            to_owned_list(&DEFAULT_FALLBACK_SYMBOLS)
        );
    }

    #[test]
    fn check_history_reasons() {
        assert_eq!(check_history(&[], 30), Some(SkipReason::NoData));
        assert_eq!(
            check_history(&bars(12), 30),
            Some(SkipReason::InsufficientBars {
                bars: 12,
                minimum: 30
            })
        );
        assert_eq!(check_history(&bars(30), 30), None);
    }
}
