//! OHLCV bar representation.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// close > open
    pub fn is_green(&self) -> bool {
        self.close > self.open
    }

    /// |close - open|
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_bar(open: f64, close: f64) -> OhlcvBar {
        OhlcvBar {
            symbol: "BTCUSDT".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            open,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
            close,
            volume: 50_000.0,
        }
    }

    #[test]
    fn green_when_close_above_open() {
        assert!(sample_bar(100.0, 105.0).is_green());
        assert!(!sample_bar(105.0, 100.0).is_green());
        assert!(!sample_bar(100.0, 100.0).is_green());
    }

    #[test]
    fn body_is_absolute() {
        assert!((sample_bar(100.0, 105.0).body() - 5.0).abs() < f64::EPSILON);
        assert!((sample_bar(105.0, 100.0).body() - 5.0).abs() < f64::EPSILON);
    }
}
