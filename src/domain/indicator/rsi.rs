//! RSI (Relative Strength Index) indicator implementation.
//!
//! Average gain and average loss are the simple mean of the last n
//! close-to-close changes (a rolling window, not Wilder's smoothing):
//! - gain_j = max(C[j] - C[j-1], 0)
//! - loss_j = max(C[j-1] - C[j], 0)
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n bars are invalid (need n price changes).

use crate::domain::indicator::{
    invalid_points, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.len() < 2 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values: invalid_points(bars.iter().map(|b| &b.timestamp), IndicatorValue::Simple(0.0)),
        };
    }

    // changes[k] is the move into bar k + 1
    let changes: Vec<f64> = bars.windows(2).map(|w| w[1].close - w[0].close).collect();

    let mut values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let rsi = if i >= period {
            Some(rsi_from_changes(&changes[i - period..i]))
        } else {
            None
        };

        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid: rsi.is_some(),
            value: IndicatorValue::Simple(rsi.unwrap_or(0.0)),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_changes(changes: &[f64]) -> f64 {
    let n = changes.len() as f64;
    let avg_gain = changes.iter().map(|c| c.max(0.0)).sum::<f64>() / n;
    let avg_loss = changes.iter().map(|c| (-c).max(0.0)).sum::<f64>() / n;

    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                symbol: "TEST".into(),
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn rsi_empty_bars() {
        let series = calculate_rsi(&[], 14);
        assert_eq!(series.values.len(), 0);
    }

    #[test]
    fn rsi_single_bar() {
        let series = calculate_rsi(&make_bars(&[100.0]), 14);
        assert_eq!(series.values.len(), 1);
        assert!(!series.values[0].valid);
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);

        assert_eq!(series.values.len(), 15);
        for i in 0..14 {
            assert!(!series.values[i].valid, "Bar {} should be invalid", i);
        }
        assert!(series.values[14].valid, "Bar 14 should be valid");
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);
        assert_eq!(series.last_value(), Some(100.0));
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);
        let rsi = series.last_value().unwrap();
        assert!(rsi.abs() < f64::EPSILON, "RSI should be 0 when all losses");
    }

    #[test]
    fn rsi_flat_series_is_100() {
        let series = calculate_rsi(&make_bars(&[50.0; 16]), 14);
        assert_eq!(series.last_value(), Some(100.0));
    }

    #[test]
    fn rsi_simple_window_mean() {
        // period 2: changes +2, -1 -> gain 1.0, loss 0.5 -> rs 2 -> 66.67
        let series = calculate_rsi(&make_bars(&[10.0, 12.0, 11.0]), 2);
        let rsi = series.value_at(2).unwrap();
        assert!((rsi - 200.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_window_rolls_off_old_changes() {
        // period 2: at index 3 only changes -1, -1 count -> 0
        let series = calculate_rsi(&make_bars(&[10.0, 20.0, 19.0, 18.0]), 2);
        let rsi = series.value_at(3).unwrap();
        assert!(rsi.abs() < 1e-10);
    }

    #[test]
    fn rsi_indicator_type() {
        let series = calculate_rsi(&make_bars(&[100.0]), 14);
        assert_eq!(series.indicator_type, IndicatorType::Rsi(14));
    }

    #[test]
    fn rsi_zero_period() {
        let series = calculate_rsi(&make_bars(&[100.0, 101.0]), 0);
        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| !p.valid));
    }
}
