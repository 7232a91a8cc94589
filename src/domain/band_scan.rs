//! One polling cycle of the Bollinger band scanner.
//!
//! A cycle discovers the active symbols, then walks them strictly in order:
//! fetch bars, check history, build the indicator frame, and stop at the
//! first model that fires. Per-symbol failures are reported and the walk
//! continues. Progress is pushed to a caller-supplied observer as it
//! happens so the console can print rows live.

use crate::domain::error::ScanError;
use crate::domain::frame::{BandParams, IndicatorFrame};
use crate::domain::model::first_firing;
use crate::domain::signal::{ModelKind, ScoringParams};
use crate::domain::universe::{check_history, to_owned_list, SkipReason, DEFAULT_FALLBACK_SYMBOLS};
use crate::ports::data_port::{DataPort, SymbolPort};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct BandScanConfig {
    pub params: BandParams,
    pub scoring: ScoringParams,
    pub min_bars: usize,
    pub fallback_symbols: Vec<String>,
}

impl Default for BandScanConfig {
    fn default() -> Self {
        Self {
            params: BandParams::default(),
            scoring: ScoringParams::default(),
            min_bars: 50,
            fallback_symbols: to_owned_list(&DEFAULT_FALLBACK_SYMBOLS),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalHit {
    pub time: DateTime<Utc>,
    pub symbol: String,
    pub model: ModelKind,
    pub score: u32,
    pub price: f64,
}

/// What happened to one symbol that was fetched successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    Hit(SignalHit),
    Quiet,
    Skipped(SkipReason),
}

#[derive(Debug)]
pub enum ScanEvent<'a> {
    Universe { symbols: &'a [String], fallback: bool },
    Hit(&'a SignalHit),
    Skipped { symbol: &'a str, reason: &'a SkipReason },
    Failed { symbol: &'a str, error: &'a ScanError },
}

#[derive(Debug, Default)]
pub struct CycleReport {
    pub symbols_scanned: Vec<String>,
    pub used_fallback: bool,
    pub hits: Vec<SignalHit>,
    pub skipped: Vec<(String, SkipReason)>,
    pub failures: Vec<(String, ScanError)>,
}

impl CycleReport {
    pub fn signals_found(&self) -> usize {
        self.hits.len()
    }

    /// The cycle as a whole failed when every symbol failed to fetch.
    pub fn into_cycle_error(mut self) -> Option<ScanError> {
        if self.symbols_scanned.is_empty() || self.failures.len() < self.symbols_scanned.len() {
            return None;
        }
        self.failures.pop().map(|(_, e)| e)
    }
}

fn resolve_symbols(symbol_port: &dyn SymbolPort, config: &BandScanConfig) -> (Vec<String>, bool) {
    match symbol_port.active_symbols() {
        Ok(symbols) if !symbols.is_empty() => (symbols, false),
        Ok(_) => {
            warn!("symbol discovery returned nothing, using fallback list");
            (config.fallback_symbols.clone(), true)
        }
        Err(e) => {
            warn!(error = %e, "symbol discovery failed, using fallback list");
            (config.fallback_symbols.clone(), true)
        }
    }
}

pub fn scan_symbol(
    data_port: &dyn DataPort,
    symbol: &str,
    config: &BandScanConfig,
) -> Result<SymbolOutcome, ScanError> {
    let bars = data_port.fetch_bars(symbol)?;
    if let Some(reason) = check_history(&bars, config.min_bars) {
        return Ok(SymbolOutcome::Skipped(reason));
    }

    let frame = IndicatorFrame::build(symbol, bars, config.params);
    let price = frame.last().map(|b| b.close).unwrap_or_default();

    Ok(match first_firing(&frame, &config.scoring) {
        Some(signal) => SymbolOutcome::Hit(SignalHit {
            time: Utc::now(),
            symbol: symbol.to_string(),
            model: signal.model,
            score: signal.score,
            price,
        }),
        None => SymbolOutcome::Quiet,
    })
}

pub fn run_cycle(
    symbol_port: &dyn SymbolPort,
    data_port: &dyn DataPort,
    config: &BandScanConfig,
    observer: &mut dyn FnMut(ScanEvent<'_>),
) -> CycleReport {
    let (symbols, used_fallback) = resolve_symbols(symbol_port, config);
    info!(count = symbols.len(), fallback = used_fallback, "scanning symbols");
    observer(ScanEvent::Universe {
        symbols: &symbols,
        fallback: used_fallback,
    });

    let mut report = CycleReport {
        used_fallback,
        ..CycleReport::default()
    };

    for symbol in &symbols {
        match scan_symbol(data_port, symbol, config) {
            Ok(SymbolOutcome::Hit(hit)) => {
                info!(
                    symbol = %symbol,
                    model = hit.model.name(),
                    score = hit.score,
                    price = hit.price,
                    "signal"
                );
                observer(ScanEvent::Hit(&hit));
                report.hits.push(hit);
            }
            Ok(SymbolOutcome::Quiet) => debug!(symbol = %symbol, "no model fired"),
            Ok(SymbolOutcome::Skipped(reason)) => {
                debug!(symbol = %symbol, reason = ?reason, "skipped");
                observer(ScanEvent::Skipped {
                    symbol,
                    reason: &reason,
                });
                report.skipped.push((symbol.clone(), reason));
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "symbol processing failed");
                observer(ScanEvent::Failed { symbol, error: &e });
                report.failures.push((symbol.clone(), e));
            }
        }
    }

    report.symbols_scanned = symbols;
    report
}
