//! Single-pass RSI scan of a fixed watch-list.
//!
//! For every ticker: fetch daily bars, compute RSI on the last bar,
//! classify it, and keep the accumulation matches for the CSV report.

use crate::domain::classify::{classify, Status, WhaleThresholds};
use crate::domain::error::ScanError;
use crate::domain::indicator::mean;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::universe::{check_history, to_owned_list, SkipReason, DEFAULT_WATCH_LIST};
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct WhaleScanConfig {
    pub watch_list: Vec<String>,
    pub rsi_period: usize,
    pub min_bars: usize,
    pub thresholds: WhaleThresholds,
    pub pacing: Duration,
}

impl Default for WhaleScanConfig {
    fn default() -> Self {
        Self {
            watch_list: to_owned_list(&DEFAULT_WATCH_LIST),
            rsi_period: 14,
            min_bars: 30,
            thresholds: WhaleThresholds::default(),
            pacing: Duration::from_millis(800),
        }
    }
}

/// One CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhaleMatch {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "RSI")]
    pub rsi: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetReading {
    pub ticker: String,
    pub price: f64,
    pub rsi: f64,
    pub last_volume: f64,
    pub avg_volume: f64,
    pub status: Status,
}

impl AssetReading {
    pub fn to_match(&self) -> WhaleMatch {
        WhaleMatch {
            ticker: self.ticker.clone(),
            price: self.price,
            rsi: self.rsi,
        }
    }
}

#[derive(Debug)]
pub enum WhaleEvent<'a> {
    Reading(&'a AssetReading),
    Skipped { ticker: &'a str, reason: &'a SkipReason },
    Failed { ticker: &'a str, error: &'a ScanError },
}

#[derive(Debug, Default)]
pub struct WhaleReport {
    pub readings: Vec<AssetReading>,
    pub matches: Vec<WhaleMatch>,
    pub skipped: Vec<(String, SkipReason)>,
    pub failures: Vec<(String, ScanError)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    NothingToSave,
}

/// Classify the most recent bar of an already-fetched series.
pub fn read_asset(
    ticker: &str,
    bars: &[OhlcvBar],
    config: &WhaleScanConfig,
) -> Result<AssetReading, ScanError> {
    let last = bars.last().ok_or_else(|| ScanError::NoData {
        symbol: ticker.to_string(),
    })?;
    let rsi = calculate_rsi(bars, config.rsi_period)
        .last_value()
        .ok_or_else(|| ScanError::InsufficientData {
            symbol: ticker.to_string(),
            bars: bars.len(),
            minimum: config.rsi_period + 1,
        })?;

    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let avg_volume = mean(&volumes).unwrap_or_default();
    let status = classify(rsi, last.volume, avg_volume, &config.thresholds);

    Ok(AssetReading {
        ticker: ticker.to_string(),
        price: last.close,
        rsi,
        last_volume: last.volume,
        avg_volume,
        status,
    })
}

pub fn run_scan(
    data_port: &dyn DataPort,
    config: &WhaleScanConfig,
    observer: &mut dyn FnMut(WhaleEvent<'_>),
    sleep: &mut dyn FnMut(Duration),
) -> WhaleReport {
    let mut report = WhaleReport::default();
    info!(count = config.watch_list.len(), "scanning watch-list");

    for ticker in &config.watch_list {
        let bars = match data_port.fetch_bars(ticker) {
            Ok(bars) => bars,
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "fetch failed");
                observer(WhaleEvent::Failed { ticker, error: &e });
                report.failures.push((ticker.clone(), e));
                continue;
            }
        };

        if let Some(reason) = check_history(&bars, config.min_bars) {
            debug!(ticker = %ticker, reason = ?reason, "skipped");
            observer(WhaleEvent::Skipped {
                ticker,
                reason: &reason,
            });
            report.skipped.push((ticker.clone(), reason));
            continue;
        }

        match read_asset(ticker, &bars, config) {
            Ok(reading) => {
                debug!(ticker = %ticker, rsi = reading.rsi, status = ?reading.status, "classified");
                observer(WhaleEvent::Reading(&reading));
                if reading.status.is_match() {
                    report.matches.push(reading.to_match());
                }
                report.readings.push(reading);
                if !config.pacing.is_zero() {
                    sleep(config.pacing);
                }
            }
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "classification failed");
                observer(WhaleEvent::Failed { ticker, error: &e });
                report.failures.push((ticker.clone(), e));
            }
        }
    }

    report
}

/// Persist matches; an empty match list writes nothing.
pub fn save_report(
    report_port: &dyn ReportPort,
    matches: &[WhaleMatch],
    path: &Path,
) -> Result<SaveOutcome, ScanError> {
    if matches.is_empty() {
        return Ok(SaveOutcome::NothingToSave);
    }
    report_port.write(matches, path)?;
    info!(path = %path.display(), rows = matches.len(), "report saved");
    Ok(SaveOutcome::Saved(path.to_path_buf()))
}
