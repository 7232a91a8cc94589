//! Binance public market data adapter.
//!
//! Symbol discovery reads the 24h ticker and keeps the most traded pairs
//! for one quote asset; bars come from the klines endpoint, whose rows are
//! positional arrays with prices encoded as strings.

use crate::adapters::http::{build_client, get_text, join_url};
use crate::domain::error::ScanError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{DataPort, SymbolPort};
use chrono::DateTime;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const TICKER_PATH: &str = "/api/v3/ticker/24hr";
const KLINES_PATH: &str = "/api/v3/klines";

#[derive(Debug, Clone, PartialEq)]
pub struct BinanceSettings {
    pub base_url: String,
    pub quote_asset: String,
    pub min_quote_volume: f64,
    pub top_n: usize,
    pub interval: String,
    pub limit: usize,
    pub timeout: Duration,
}

impl Default for BinanceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://data-api.binance.vision".to_string(),
            quote_asset: "USDT".to_string(),
            min_quote_volume: 2_500_000.0,
            top_n: 15,
            interval: "1h".to_string(),
            limit: 100,
            timeout: Duration::from_secs(10),
        }
    }
}

impl BinanceSettings {
    /// Read `[binance]`; run `validate_band_config` first.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = Self::default();
        Self {
            base_url: config
                .get_nonempty("binance", "base_url")
                .unwrap_or(defaults.base_url),
            quote_asset: config
                .get_nonempty("binance", "quote_asset")
                .map(|s| s.to_uppercase())
                .unwrap_or(defaults.quote_asset),
            min_quote_volume: config.get_double(
                "binance",
                "min_quote_volume",
                defaults.min_quote_volume,
            ),
            top_n: config.get_int("binance", "top_n", defaults.top_n as i64) as usize,
            interval: config
                .get_nonempty("binance", "interval")
                .unwrap_or(defaults.interval),
            limit: config.get_int("binance", "limit", defaults.limit as i64) as usize,
            timeout: Duration::from_secs(config.get_int("binance", "timeout_secs", 10) as u64),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Ticker24h {
    #[serde(default)]
    symbol: String,
    #[serde(rename = "quoteVolume", default)]
    quote_volume: Value,
}

/// Pairs quoted in `quote_asset` above `min_volume`, busiest first, capped
/// at `top_n`. Tickers with a missing or unparseable volume are ignored.
pub fn select_active_symbols(
    body: &str,
    quote_asset: &str,
    min_volume: f64,
    top_n: usize,
) -> Result<Vec<String>, ScanError> {
    let tickers: Vec<Ticker24h> = serde_json::from_str(body).map_err(|e| ScanError::Parse {
        symbol: "24h ticker".into(),
        reason: e.to_string(),
    })?;

    let mut active: Vec<(String, f64)> = tickers
        .into_iter()
        .filter(|t| t.symbol.ends_with(quote_asset))
        .filter_map(|t| {
            let volume = number(&t.quote_volume)?;
            (volume > min_volume).then_some((t.symbol, volume))
        })
        .collect();

    active.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(active.into_iter().take(top_n).map(|(s, _)| s).collect())
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn kline_row(symbol: &str, row: &[Value]) -> Option<OhlcvBar> {
    if row.len() < 6 {
        return None;
    }
    let open_time = row[0].as_i64()?;
    Some(OhlcvBar {
        symbol: symbol.to_string(),
        timestamp: DateTime::from_timestamp_millis(open_time)?,
        open: number(&row[1])?,
        high: number(&row[2])?,
        low: number(&row[3])?,
        close: number(&row[4])?,
        volume: number(&row[5])?,
    })
}

/// Decode a klines response. Rows that do not carry numeric prices are
/// dropped; a body that is not an array of arrays is a parse error.
pub fn parse_klines(symbol: &str, body: &str) -> Result<Vec<OhlcvBar>, ScanError> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body).map_err(|e| ScanError::Parse {
        symbol: symbol.to_string(),
        reason: e.to_string(),
    })?;

    let total = rows.len();
    let bars: Vec<OhlcvBar> = rows.iter().filter_map(|r| kline_row(symbol, r)).collect();
    if bars.len() < total {
        debug!(symbol, dropped = total - bars.len(), "dropped malformed kline rows");
    }
    Ok(bars)
}

pub struct BinanceAdapter {
    client: Client,
    settings: BinanceSettings,
}

impl BinanceAdapter {
    pub fn new(settings: BinanceSettings) -> Result<Self, ScanError> {
        Ok(Self {
            client: build_client(settings.timeout)?,
            settings,
        })
    }

    pub fn settings(&self) -> &BinanceSettings {
        &self.settings
    }
}

impl SymbolPort for BinanceAdapter {
    fn active_symbols(&self) -> Result<Vec<String>, ScanError> {
        let url = join_url(&self.settings.base_url, TICKER_PATH);
        let body = get_text(&self.client, &url, &[]).inspect_err(|e| {
            warn!(error = %e, "24h ticker request failed");
        })?;
        select_active_symbols(
            &body,
            &self.settings.quote_asset,
            self.settings.min_quote_volume,
            self.settings.top_n,
        )
    }
}

impl DataPort for BinanceAdapter {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<OhlcvBar>, ScanError> {
        let url = join_url(&self.settings.base_url, KLINES_PATH);
        let limit = self.settings.limit.to_string();
        let body = get_text(
            &self.client,
            &url,
            &[
                ("symbol", symbol),
                ("interval", self.settings.interval.as_str()),
                ("limit", limit.as_str()),
            ],
        )?;
        parse_klines(symbol, &body)
    }
}
