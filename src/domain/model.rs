//! The five band-scan scoring models.
//!
//! Each model reads only the tail of an [`IndicatorFrame`] and returns
//! three predicates. Offsets follow the frame convention (1 = last bar).
//! A predicate whose inputs are undefined (warmup, short history) is
//! false, and a frame shorter than the model's `min_bars` yields
//! [`Signal::none`].
//!
//! | Model  | Predicates                                                       |
//! |--------|------------------------------------------------------------------|
//! | SLING  | bandwidth squeeze, close above upper band, close holds near MA   |
//! | RUBBER | close stretched below lower band, nearby support, strong body    |
//! | LADDER | rising MA, close above MA, bounce off lower band                 |
//! | DIVERG | close below lower band, bullish RSI divergence, volume expansion |
//! | 3GREEN | close above MA, SMA(50) above SMA(200), green candle             |

use crate::domain::frame::IndicatorFrame;
use crate::domain::indicator::{sample_stddev, BandField};
use crate::domain::signal::{ModelKind, ScoringParams, Signal};

const SQUEEZE_RATIO: f64 = 0.85;
const SQUEEZE_SHORT: usize = 10;
const SQUEEZE_LONG: usize = 30;
const HOLD_RATIO: f64 = 0.995;

const STRETCH_RATIO: f64 = 0.98;
const SUPPORT_LOOKBACK: usize = 50;
const SUPPORT_RATIO: f64 = 0.95;
const BODY_LOOKBACK: usize = 5;

const MA_SLOPE_OFFSET: usize = 5;

const DIVERGENCE_NEAR: usize = 10;
const DIVERGENCE_FAR: usize = 20;
const VOLUME_LOOKBACK: usize = 10;

const TREND_FAST: usize = 50;
const TREND_SLOW: usize = 200;

fn gt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

fn lt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

fn le(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a <= b)
}

fn ge(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a >= b)
}

fn close(frame: &IndicatorFrame, k: usize) -> Option<f64> {
    frame.from_end(k).map(|b| b.close)
}

fn low(frame: &IndicatorFrame, k: usize) -> Option<f64> {
    frame.from_end(k).map(|b| b.low)
}

fn slingshot(frame: &IndicatorFrame) -> [bool; 3] {
    let squeeze = lt(
        frame.tail_band_mean(BandField::Bandwidth, SQUEEZE_SHORT),
        frame
            .tail_band_mean(BandField::Bandwidth, SQUEEZE_LONG)
            .map(|m| m * SQUEEZE_RATIO),
    );
    let breakout = gt(
        frame.tail_mean(2, |b| b.close),
        frame.tail_band_mean(BandField::Upper, 2),
    );
    let hold = gt(close(frame, 1), frame.ma_from_end(1).map(|m| m * HOLD_RATIO));
    [squeeze, breakout, hold]
}

fn rubber_band(frame: &IndicatorFrame) -> [bool; 3] {
    let last = close(frame, 1);
    let stretched = lt(
        last,
        frame
            .band_from_end(1, BandField::Lower)
            .map(|l| l * STRETCH_RATIO),
    );
    let support_low = frame
        .tail(SUPPORT_LOOKBACK)
        .iter()
        .map(|b| b.low)
        .reduce(f64::min);
    let support = ge(support_low, last.map(|c| c * SUPPORT_RATIO));
    let strong_body = gt(
        frame.last().map(|b| b.body()),
        sample_stddev(&frame.tail_closes(BODY_LOOKBACK)),
    );
    [stretched, support, strong_body]
}

fn ladder_climb(frame: &IndicatorFrame) -> [bool; 3] {
    let rising = gt(frame.ma_from_end(1), frame.ma_from_end(MA_SLOPE_OFFSET));
    let above = gt(close(frame, 1), frame.ma_from_end(1));
    let bounce = le(low(frame, 2), frame.band_from_end(2, BandField::Lower)) && above;
    [rising, above, bounce]
}

fn divergence(frame: &IndicatorFrame) -> [bool; 3] {
    let below_band = lt(close(frame, 1), frame.band_from_end(1, BandField::Lower));
    let diverging = lt(low(frame, DIVERGENCE_NEAR), low(frame, DIVERGENCE_FAR))
        && gt(
            frame.rsi_from_end(DIVERGENCE_NEAR),
            frame.rsi_from_end(DIVERGENCE_FAR),
        );
    let volume_up = gt(
        frame.last().map(|b| b.volume),
        frame.tail_mean(VOLUME_LOOKBACK, |b| b.volume),
    );
    [below_band, diverging, volume_up]
}

fn three_green_lights(frame: &IndicatorFrame) -> [bool; 3] {
    let position = gt(close(frame, 1), frame.ma_from_end(1));
    let trend = gt(
        frame.rolling_close_mean(TREND_FAST),
        frame.rolling_close_mean(TREND_SLOW),
    );
    let green = frame.last().is_some_and(|b| b.is_green());
    [position, trend, green]
}

/// Raw predicate outcomes for `model`, without the history gate.
pub fn predicates(model: ModelKind, frame: &IndicatorFrame) -> [bool; 3] {
    match model {
        ModelKind::Slingshot => slingshot(frame),
        ModelKind::RubberBand => rubber_band(frame),
        ModelKind::LadderClimb => ladder_climb(frame),
        ModelKind::Divergence => divergence(frame),
        ModelKind::ThreeGreenLights => three_green_lights(frame),
    }
}

pub fn evaluate(model: ModelKind, frame: &IndicatorFrame, scoring: &ScoringParams) -> Signal {
    if frame.len() < model.min_bars() {
        return Signal::none(model);
    }
    Signal::from_predicates(model, &predicates(model, frame), scoring)
}

/// Every model, in [`ModelKind::ALL`] order.
pub fn evaluate_all(frame: &IndicatorFrame, scoring: &ScoringParams) -> Vec<Signal> {
    ModelKind::ALL
        .iter()
        .map(|&m| evaluate(m, frame, scoring))
        .collect()
}

/// The first model that fires; later models are not evaluated.
pub fn first_firing(frame: &IndicatorFrame, scoring: &ScoringParams) -> Option<Signal> {
    ModelKind::ALL
        .iter()
        .map(|&m| evaluate(m, frame, scoring))
        .find(|s| s.fired)
}
