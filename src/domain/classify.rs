//! RSI status buckets for the watch-list scan.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhaleThresholds {
    pub oversold: f64,
    pub accumulation_max: f64,
    pub overbought: f64,
    pub volume_factor: f64,
}

impl Default for WhaleThresholds {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            accumulation_max: 55.0,
            overbought: 70.0,
            volume_factor: 1.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Oversold,
    WhaleIn,
    Overbought,
    Neutral,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Oversold => "OVERSOLD - HIGH RISK",
            Status::WhaleIn => "MATCH FOUND - WHALE IN",
            Status::Overbought => "OVERBOUGHT - COOLING",
            Status::Neutral => "NEUTRAL",
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            Status::Oversold => "Panic selling detected. No whale entry yet.",
            Status::WhaleIn => "Strong momentum and volume. Breakout likely.",
            Status::Overbought => "Price peaked. Waiting for correction.",
            Status::Neutral => "Scanning for volume spikes...",
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Status::WhaleIn)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.label())
    }
}

/// Buckets are checked in order: oversold, accumulation with a volume
/// spike, overbought, then neutral.
pub fn classify(
    last_rsi: f64,
    last_volume: f64,
    avg_volume: f64,
    thresholds: &WhaleThresholds,
) -> Status {
    if last_rsi < thresholds.oversold {
        Status::Oversold
    } else if last_rsi < thresholds.accumulation_max
        && last_volume > avg_volume * thresholds.volume_factor
    {
        Status::WhaleIn
    } else if last_rsi > thresholds.overbought {
        Status::Overbought
    } else {
        Status::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> WhaleThresholds {
        WhaleThresholds::default()
    }

    #[test]
    fn oversold_below_30() {
        assert_eq!(classify(29.9, 5000.0, 1000.0, &t()), Status::Oversold);
    }

    #[test]
    fn whale_in_needs_volume_spike() {
        assert_eq!(classify(30.0, 1200.0, 1000.0, &t()), Status::WhaleIn);
        assert_eq!(classify(54.9, 1101.0, 1000.0, &t()), Status::WhaleIn);
        assert_eq!(classify(45.0, 1100.0, 1000.0, &t()), Status::Neutral);
    }

    #[test]
    fn accumulation_upper_bound_is_exclusive() {
        assert_eq!(classify(55.0, 5000.0, 1000.0, &t()), Status::Neutral);
    }

    #[test]
    fn overbought_above_70() {
        assert_eq!(classify(70.0, 1000.0, 1000.0, &t()), Status::Neutral);
        assert_eq!(classify(70.1, 1000.0, 1000.0, &t()), Status::Overbought);
        assert_eq!(classify(100.0, 9000.0, 1000.0, &t()), Status::Overbought);
    }

    #[test]
    fn only_whale_in_is_a_match() {
        assert!(Status::WhaleIn.is_match());
        assert!(!Status::Oversold.is_match());
        assert!(!Status::Overbought.is_match());
        assert!(!Status::Neutral.is_match());
    }

    #[test]
    fn display_wraps_label() {
        assert_eq!(Status::Neutral.to_string(), "[NEUTRAL]");
    }
}
