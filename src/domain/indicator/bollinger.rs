//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//! - Bandwidth: (Upper - Lower) / Middle × 100
//!
//! StdDev is the sample standard deviation (divides by N-1), matching the
//! rolling statistics used by the scoring models.
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

const EMPTY_BAND: IndicatorValue = IndicatorValue::Bollinger {
    upper: 0.0,
    middle: 0.0,
    lower: 0.0,
    bandwidth: 0.0,
};

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    bands_from_series(
        &calculate_sma(bars, period),
        &calculate_stddev(bars, period),
        period,
        stddev_mult_x100,
    )
}

/// Combine SMA(period) and STDDEV(period) series of the same bars into
/// bands. A point is valid only where both inputs are.
pub fn bands_from_series(
    sma: &IndicatorSeries,
    stddev: &IndicatorSeries,
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let mult = stddev_mult_x100 as f64 / 100.0;
    let values = sma
        .values
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let band = sma
                .value_at(i)
                .zip(stddev.value_at(i))
                .map(|(middle, sd)| band_value(middle, sd, mult));
            IndicatorPoint {
                timestamp: point.timestamp,
                valid: band.is_some(),
                value: band.unwrap_or(EMPTY_BAND),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}

fn band_value(middle: f64, stddev: f64, mult: f64) -> IndicatorValue {
    let upper = middle + mult * stddev;
    let lower = middle - mult * stddev;
    // A zero average leaves band-width undefined; report no spread.
    let bandwidth = if middle == 0.0 {
        0.0
    } else {
        (upper - lower) / middle * 100.0
    };
    IndicatorValue::Bollinger {
        upper,
        middle,
        lower,
        bandwidth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::BandField;
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
    fn bollinger_warmup() {
        let series = calculate_bollinger(&make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3, 200);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn bollinger_constant_values() {
        let series = calculate_bollinger(&make_bars(&[100.0; 5]), 3, 200);

        assert_eq!(series.band_at(2, BandField::Middle), Some(100.0));
        assert_eq!(series.band_at(2, BandField::Upper), Some(100.0));
        assert_eq!(series.band_at(2, BandField::Lower), Some(100.0));
        assert_eq!(series.band_at(2, BandField::Bandwidth), Some(0.0));
    }

    #[test]
    fn bollinger_basic_calculation() {
        let series = calculate_bollinger(&make_bars(&[10.0, 20.0, 30.0]), 3, 200);

        // mean 20, sample stddev 10
        let upper = series.band_at(2, BandField::Upper).unwrap();
        let middle = series.band_at(2, BandField::Middle).unwrap();
        let lower = series.band_at(2, BandField::Lower).unwrap();
        let bandwidth = series.band_at(2, BandField::Bandwidth).unwrap();

        assert!((middle - 20.0).abs() < 1e-10);
        assert!((upper - 40.0).abs() < 1e-10);
        assert!((lower - 0.0).abs() < 1e-10);
        assert!((bandwidth - 200.0).abs() < 1e-10);
    }

    #[test]
    fn bollinger_multiplier_variations() {
        let series = calculate_bollinger(&make_bars(&[10.0, 20.0, 30.0]), 3, 100);

        let upper = series.band_at(2, BandField::Upper).unwrap();
        let lower = series.band_at(2, BandField::Lower).unwrap();
        assert!((upper - 30.0).abs() < 1e-10);
        assert!((lower - 10.0).abs() < 1e-10);
    }

    #[test]
    fn bollinger_zero_middle_has_zero_bandwidth() {
        let series = calculate_bollinger(&make_bars(&[-1.0, 0.0, 1.0]), 3, 200);
        assert_eq!(series.band_at(2, BandField::Bandwidth), Some(0.0));
    }

    #[test]
    fn bollinger_symmetry() {
        let series = calculate_bollinger(&make_bars(&[10.0, 14.0, 11.0, 30.0]), 3, 200);

        for i in 2..4 {
            let upper = series.band_at(i, BandField::Upper).unwrap();
            let middle = series.band_at(i, BandField::Middle).unwrap();
            let lower = series.band_at(i, BandField::Lower).unwrap();
            assert!(((upper - middle) - (middle - lower)).abs() < 1e-10);
        }
    }

    #[test]
    fn bands_need_both_inputs() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let sma = calculate_sma(&bars, 3);
        let stddev = calculate_stddev(&bars, 2);

        let series = bands_from_series(&sma, &stddev, 3, 200);

        assert_eq!(series.len(), 4);
        assert!(!series.values[1].valid, "SMA(3) still warming up");
        assert!(series.values[2].valid);
        assert_eq!(series.band_at(2, BandField::Middle), sma.value_at(2));
    }

    #[test]
    fn bollinger_indicator_type() {
        let series = calculate_bollinger(&make_bars(&[10.0, 20.0, 30.0]), 20, 200);

        assert_eq!(
            series.indicator_type,
            IndicatorType::Bollinger {
                period: 20,
                stddev_mult_x100: 200
            }
        );
        assert!(series.values.iter().all(|p| !p.valid));
    }
}
