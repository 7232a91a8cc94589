//! Shared blocking HTTP plumbing for the market data adapters.

use crate::domain::error::ScanError;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

pub fn build_client(timeout: Duration) -> Result<Client, ScanError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("bandscan/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ScanError::Http {
            url: String::new(),
            reason: e.to_string(),
        })
}

/// GET `url` and return the body. Non-2xx answers become `HttpStatus`.
pub fn get_text(client: &Client, url: &str, query: &[(&str, &str)]) -> Result<String, ScanError> {
    debug!(url, ?query, "GET");
    let response = client
        .get(url)
        .query(query)
        .send()
        .map_err(|e| ScanError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScanError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().map_err(|e| ScanError::Http {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(
            join_url("https://data-api.binance.vision/", "/api/v3/klines"),
            "https://data-api.binance.vision/api/v3/klines"
        );
        assert_eq!(join_url("http://h", "a"), "http://h/a");
    }
}
