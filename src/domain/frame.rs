//! Indicator-annotated bar frame for one instrument.
//!
//! `IndicatorFrame` owns the fetched bars plus every series computed from
//! them. All lookups are relative to the end of the frame: `from_end(1)` is
//! the most recent bar, `from_end(2)` the one before it, and so on. Any
//! lookup that would fall before the first bar, or onto an indicator point
//! still in warmup, yields `None`.

use crate::domain::indicator::bollinger::bands_from_series;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::{mean, BandField, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandParams {
    pub period: usize,
    pub stddev_mult_x100: u32,
    pub rsi_period: usize,
}

impl Default for BandParams {
    fn default() -> Self {
        Self {
            period: 20,
            stddev_mult_x100: 200,
            rsi_period: 14,
        }
    }
}

impl BandParams {
    pub fn sma(&self) -> IndicatorType {
        IndicatorType::Sma(self.period)
    }

    pub fn bollinger(&self) -> IndicatorType {
        IndicatorType::Bollinger {
            period: self.period,
            stddev_mult_x100: self.stddev_mult_x100,
        }
    }

    pub fn rsi(&self) -> IndicatorType {
        IndicatorType::Rsi(self.rsi_period)
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub symbol: String,
    pub bars: Vec<OhlcvBar>,
    pub indicators: HashMap<IndicatorType, IndicatorSeries>,
    pub params: BandParams,
}

impl IndicatorFrame {
    /// Compute SMA, STDDEV, BOLLINGER and RSI for `bars`. The bands are
    /// derived from the SMA and STDDEV series rather than recomputed.
    pub fn build(symbol: impl Into<String>, bars: Vec<OhlcvBar>, params: BandParams) -> Self {
        let sma = calculate_sma(&bars, params.period);
        let stddev = calculate_stddev(&bars, params.period);
        let bands = bands_from_series(&sma, &stddev, params.period, params.stddev_mult_x100);
        let series = [sma, stddev, bands, calculate_rsi(&bars, params.rsi_period)];
        let indicators = series
            .into_iter()
            .map(|s| (s.indicator_type, s))
            .collect();

        Self {
            symbol: symbol.into(),
            bars,
            indicators,
            params,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn series(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        self.indicators.get(indicator_type)
    }

    /// Index of the `k`-th bar counted from the end (1 = last).
    pub fn index_from_end(&self, k: usize) -> Option<usize> {
        if k == 0 {
            return None;
        }
        self.bars.len().checked_sub(k)
    }

    pub fn from_end(&self, k: usize) -> Option<&OhlcvBar> {
        self.index_from_end(k).map(|i| &self.bars[i])
    }

    pub fn last(&self) -> Option<&OhlcvBar> {
        self.bars.last()
    }

    /// The last `n` bars (fewer when the frame is shorter).
    pub fn tail(&self, n: usize) -> &[OhlcvBar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }

    pub fn ma_from_end(&self, k: usize) -> Option<f64> {
        let i = self.index_from_end(k)?;
        self.series(&self.params.sma())?.value_at(i)
    }

    pub fn band_from_end(&self, k: usize, field: BandField) -> Option<f64> {
        let i = self.index_from_end(k)?;
        self.series(&self.params.bollinger())?.band_at(i, field)
    }

    pub fn rsi_from_end(&self, k: usize) -> Option<f64> {
        let i = self.index_from_end(k)?;
        self.series(&self.params.rsi())?.value_at(i)
    }

    /// Mean of a band field over the last `n` points, ignoring warmup points.
    /// `None` when none of them is valid.
    pub fn tail_band_mean(&self, field: BandField, n: usize) -> Option<f64> {
        let series = self.series(&self.params.bollinger())?;
        let start = self.bars.len().saturating_sub(n);
        let values: Vec<f64> = (start..self.bars.len())
            .filter_map(|i| series.band_at(i, field))
            .collect();
        mean(&values)
    }

    /// Mean of `f(bar)` over the last `n` bars.
    pub fn tail_mean<F>(&self, n: usize, f: F) -> Option<f64>
    where
        F: Fn(&OhlcvBar) -> f64,
    {
        let values: Vec<f64> = self.tail(n).iter().map(f).collect();
        mean(&values)
    }

    /// Trailing mean of the last `window` closes; `None` until `window`
    /// bars exist.
    pub fn rolling_close_mean(&self, window: usize) -> Option<f64> {
        if window == 0 || self.bars.len() < window {
            return None;
        }
        self.tail_mean(window, |b| b.close)
    }

    pub fn tail_closes(&self, n: usize) -> Vec<f64> {
        self.tail(n).iter().map(|b| b.close).collect()
    }
}
