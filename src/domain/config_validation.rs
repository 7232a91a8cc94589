//! Configuration validation.
//!
//! Every key is optional; these checks only reject values that are present
//! and out of range, so a scan never starts with a nonsensical setting.

use crate::domain::error::ScanError;
use crate::domain::signal::MAX_WEIGHT;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;

pub fn validate_band_config(config: &dyn ConfigPort) -> Result<(), ScanError> {
    validate_binance(config)?;
    validate_bands(config)?;
    validate_scoring(config)?;
    Ok(())
}

pub fn validate_whale_config(config: &dyn ConfigPort) -> Result<(), ScanError> {
    validate_int_at_least(config, "whale", "rsi_period", 14, 1)?;
    validate_int_at_least(config, "whale", "min_bars", 30, 1)?;
    validate_int_at_least(config, "whale", "pacing_ms", 800, 0)?;
    validate_int_at_least(config, "whale", "timeout_secs", 10, 1)?;
    validate_symbol_list(config, "whale", "watch_list")?;
    validate_thresholds(config)?;

    let factor = config.get_double("whale", "volume_factor", 1.1);
    if factor <= 0.0 {
        return Err(invalid("whale", "volume_factor", "volume_factor must be positive"));
    }
    Ok(())
}

fn validate_binance(config: &dyn ConfigPort) -> Result<(), ScanError> {
    validate_int_at_least(config, "binance", "top_n", 15, 1)?;
    validate_int_at_least(config, "binance", "timeout_secs", 10, 1)?;
    validate_symbol_list(config, "binance", "fallback_symbols")?;

    let limit = config.get_int("binance", "limit", 100);
    if !(1..=1000).contains(&limit) {
        return Err(invalid("binance", "limit", "limit must be between 1 and 1000"));
    }

    let volume = config.get_double("binance", "min_quote_volume", 2_500_000.0);
    if volume < 0.0 {
        return Err(invalid(
            "binance",
            "min_quote_volume",
            "min_quote_volume must be non-negative",
        ));
    }
    Ok(())
}

fn validate_bands(config: &dyn ConfigPort) -> Result<(), ScanError> {
    validate_int_at_least(config, "bands", "period", 20, 2)?;
    validate_int_at_least(config, "bands", "rsi_period", 14, 1)?;
    validate_int_at_least(config, "bands", "min_bars", 50, 1)?;
    validate_int_at_least(config, "bands", "poll_interval_secs", 30, 1)?;
    validate_int_at_least(config, "bands", "error_pause_secs", 10, 0)?;

    let mult = config.get_double("bands", "stddev_mult", 2.0);
    if mult <= 0.0 || mult > 10.0 {
        return Err(invalid(
            "bands",
            "stddev_mult",
            "stddev_mult must be in (0, 10]",
        ));
    }
    Ok(())
}

fn validate_scoring(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let min_hits = config.get_int("scoring", "min_hits", 2);
    if !(1..=3).contains(&min_hits) {
        return Err(invalid("scoring", "min_hits", "min_hits must be between 1 and 3"));
    }
    let weight = config.get_int("scoring", "weight", 33);
    if !(1..=i64::from(MAX_WEIGHT)).contains(&weight) {
        return Err(invalid(
            "scoring",
            "weight",
            &format!("weight must be between 1 and {MAX_WEIGHT}"),
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let oversold = config.get_double("whale", "oversold", 30.0);
    let accumulation_max = config.get_double("whale", "accumulation_max", 55.0);
    let overbought = config.get_double("whale", "overbought", 70.0);

    for (key, value) in [
        ("oversold", oversold),
        ("accumulation_max", accumulation_max),
        ("overbought", overbought),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid("whale", key, &format!("{key} must be between 0 and 100")));
        }
    }

    if oversold > accumulation_max {
        return Err(invalid(
            "whale",
            "accumulation_max",
            "accumulation_max must not be below oversold",
        ));
    }
    if oversold >= overbought {
        return Err(invalid(
            "whale",
            "overbought",
            "overbought must be above oversold",
        ));
    }
    Ok(())
}

fn validate_int_at_least(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
    minimum: i64,
) -> Result<(), ScanError> {
    if config.get_int(section, key, default) < minimum {
        return Err(invalid(
            section,
            key,
            &format!("{key} must be at least {minimum}"),
        ));
    }
    Ok(())
}

fn validate_symbol_list(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), ScanError> {
    match config.get_string(section, key) {
        None => Ok(()),
        Some(list) => parse_symbols(&list)
            .map(|_| ())
            .map_err(|e| invalid(section, key, &e.to_string())),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> ScanError {
    ScanError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
