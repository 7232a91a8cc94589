#![allow(dead_code)]

use bandscan::domain::error::ScanError;
pub use bandscan::domain::ohlcv::OhlcvBar;
use bandscan::domain::whale_scan::WhaleMatch;
use bandscan::ports::data_port::{DataPort, SymbolPort};
use bandscan::ports::report_port::ReportPort;
use chrono::{Duration, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<String>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<OhlcvBar>, ScanError> {
        self.requests.borrow_mut().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ScanError::Http {
                url: format!("mock://{symbol}"),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

pub enum MockSymbolPort {
    Symbols(Vec<String>),
    Failing(u16),
}

impl MockSymbolPort {
    pub fn symbols(symbols: &[&str]) -> Self {
        MockSymbolPort::Symbols(symbols.iter().map(|s| s.to_string()).collect())
    }
}

impl SymbolPort for MockSymbolPort {
    fn active_symbols(&self) -> Result<Vec<String>, ScanError> {
        match self {
            MockSymbolPort::Symbols(symbols) => Ok(symbols.clone()),
            MockSymbolPort::Failing(status) => Err(ScanError::HttpStatus {
                url: "mock://ticker/24hr".into(),
                status: *status,
            }),
        }
    }
}

#[derive(Default)]
pub struct MockReportPort {
    pub writes: RefCell<Vec<(PathBuf, Vec<WhaleMatch>)>>,
    pub locked: bool,
}

impl MockReportPort {
    pub fn locked() -> Self {
        Self {
            locked: true,
            ..Self::default()
        }
    }
}

impl ReportPort for MockReportPort {
    fn write(&self, matches: &[WhaleMatch], output_path: &Path) -> Result<(), ScanError> {
        if self.locked {
            return Err(ScanError::ReportLocked {
                path: output_path.display().to_string(),
            });
        }
        self.writes
            .borrow_mut()
            .push((output_path.to_path_buf(), matches.to_vec()));
        Ok(())
    }
}

pub fn make_bar(symbol: &str, index: usize, open: f64, close: f64, volume: f64) -> OhlcvBar {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    OhlcvBar {
        symbol: symbol.to_string(),
        timestamp: start + Duration::hours(index as i64),
        open,
        high: open.max(close),
        low: open.min(close),
        close,
        volume,
    }
}

/// Each bar opens at the previous close.
pub fn bars_from_closes(symbol: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            make_bar(symbol, i, open, close, 1000.0)
        })
        .collect()
}

pub fn flat_bars(symbol: &str, count: usize, price: f64) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| make_bar(symbol, i, price, price, 1000.0))
        .collect()
}

/// Wide swings, a tight range, then two closes through the upper band.
pub fn squeeze_breakout_bars(symbol: &str) -> Vec<OhlcvBar> {
    let mut closes: Vec<f64> = (0..30)
        .map(|i| if i % 2 == 0 { 105.0 } else { 95.0 })
        .collect();
    closes.extend((0..28).map(|i| if i % 2 == 0 { 100.1 } else { 99.9 }));
    closes.extend([110.0, 112.0]);
    bars_from_closes(symbol, &closes)
}

/// Daily closes alternating around 100 (RSI 50) with a volume spike on the
/// last bar when `spike` is set.
pub fn balanced_bars(symbol: &str, count: usize, spike: bool) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| {
            let close = if i % 2 == 0 { 100.0 } else { 101.0 };
            let volume = if spike && i == count - 1 { 5000.0 } else { 1000.0 };
            make_bar(symbol, i, close, close, volume)
        })
        .collect()
}

pub fn rising_bars(symbol: &str, count: usize) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| 100.0 + i as f64).collect();
    bars_from_closes(symbol, &closes)
}

pub fn falling_bars(symbol: &str, count: usize) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| 200.0 - i as f64).collect();
    bars_from_closes(symbol, &closes)
}
