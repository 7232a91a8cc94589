//! Rolling standard deviation of closing price.
//!
//! Sample standard deviation over n closes (divides by n-1):
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / (n-1))
//! Warmup: first (n-1) bars are invalid. Periods below 2 are never valid.

use crate::domain::indicator::{
    invalid_points, sample_stddev, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_stddev(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period < 2 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Stddev(period),
            values: invalid_points(bars.iter().map(|b| &b.timestamp), IndicatorValue::Simple(0.0)),
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let warmup = period - 1;
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let computed = if i >= warmup {
            sample_stddev(&closes[i - warmup..=i])
        } else {
            None
        };

        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid: computed.is_some(),
            value: IndicatorValue::Simple(computed.unwrap_or(0.0)),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(period),
        values,
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
                timestamp: start + Duration::hours(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn stddev_warmup() {
        let series = calculate_stddev(&make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn stddev_constant_values() {
        let series = calculate_stddev(&make_bars(&[100.0; 5]), 3);
        assert_eq!(series.value_at(2), Some(0.0));
        assert_eq!(series.value_at(4), Some(0.0));
    }

    #[test]
    fn stddev_basic_calculation() {
        let series = calculate_stddev(&make_bars(&[10.0, 20.0, 30.0]), 3);
        // mean 20, squared deviations 100 + 0 + 100 over n-1 = 2
        let v = series.value_at(2).unwrap();
        assert!((v - 10.0).abs() < 1e-10);
    }

    #[test]
    fn stddev_known_values() {
        let series = calculate_stddev(&make_bars(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 8);
        let v = series.value_at(7).unwrap();
        assert!((v - (32.0_f64 / 7.0).sqrt()).abs() < 1e-10);
    }

    #[test]
    fn stddev_period_one_is_never_valid() {
        let series = calculate_stddev(&make_bars(&[1.0, 2.0, 3.0]), 1);
        assert!(series.values.iter().all(|p| !p.valid));
        assert_eq!(series.indicator_type, IndicatorType::Stddev(1));
    }
}
