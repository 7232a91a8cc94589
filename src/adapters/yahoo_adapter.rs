//! Yahoo Finance chart adapter for the watch-list scan.

use crate::adapters::http::{build_client, get_text, join_url};
use crate::domain::error::ScanError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use chrono::DateTime;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct YahooSettings {
    pub base_url: String,
    pub range: String,
    pub interval: String,
    pub timeout: Duration,
}

impl Default for YahooSettings {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            range: "60d".to_string(),
            interval: "1d".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl YahooSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = Self::default();
        Self {
            base_url: config
                .get_nonempty("whale", "base_url")
                .unwrap_or(defaults.base_url),
            range: config.get_nonempty("whale", "range").unwrap_or(defaults.range),
            interval: config
                .get_nonempty("whale", "interval")
                .unwrap_or(defaults.interval),
            timeout: Duration::from_secs(config.get_int("whale", "timeout_secs", 10) as u64),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn cell(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}

/// Decode a chart response into bars. Rows with any `null` field are
/// dropped; an API error object is reported as `NoData` for the ticker.
pub fn parse_chart(ticker: &str, body: &str) -> Result<Vec<OhlcvBar>, ScanError> {
    let response: ChartResponse = serde_json::from_str(body).map_err(|e| ScanError::Parse {
        symbol: ticker.to_string(),
        reason: e.to_string(),
    })?;

    if let Some(err) = response.chart.error {
        debug!(ticker, code = %err.code, description = %err.description, "chart error");
        return Err(ScanError::NoData {
            symbol: ticker.to_string(),
        });
    }

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(ScanError::NoData {
            symbol: ticker.to_string(),
        });
    };
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

    let bars = data
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            Some(OhlcvBar {
                symbol: ticker.to_string(),
                timestamp: DateTime::from_timestamp(ts, 0)?,
                open: cell(&quote.open, i)?,
                high: cell(&quote.high, i)?,
                low: cell(&quote.low, i)?,
                close: cell(&quote.close, i)?,
                volume: cell(&quote.volume, i)?,
            })
        })
        .collect();
    Ok(bars)
}

pub struct YahooAdapter {
    client: Client,
    settings: YahooSettings,
}

impl YahooAdapter {
    pub fn new(settings: YahooSettings) -> Result<Self, ScanError> {
        Ok(Self {
            client: build_client(settings.timeout)?,
            settings,
        })
    }
}

impl DataPort for YahooAdapter {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<OhlcvBar>, ScanError> {
        let url = join_url(
            &self.settings.base_url,
            &format!("/v8/finance/chart/{symbol}"),
        );
        let body = get_text(
            &self.client,
            &url,
            &[
                ("range", self.settings.range.as_str()),
                ("interval", self.settings.interval.as_str()),
            ],
        )?;
        parse_chart(symbol, &body)
    }
}
