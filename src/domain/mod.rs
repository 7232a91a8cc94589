//! Core domain types and scan logic.

pub mod ohlcv;
pub mod indicator;
pub mod frame;
pub mod signal;
pub mod model;
pub mod classify;
pub mod universe;
pub mod band_scan;
pub mod whale_scan;
pub mod scheduler;
pub mod config_validation;
pub mod error;
