//! Market data port traits.

use crate::domain::error::ScanError;
use crate::domain::ohlcv::OhlcvBar;

/// Source of chronologically ordered bars for one symbol.
///
/// The bar interval and history length are properties of the adapter, so
/// both scanners can share one call shape.
pub trait DataPort {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<OhlcvBar>, ScanError>;
}

/// Discovery of the symbols worth scanning right now.
pub trait SymbolPort {
    fn active_symbols(&self) -> Result<Vec<String>, ScanError>;
}
