//! Signal scoring.
//!
//! A model produces a fixed set of boolean predicates. The signal fires
//! when at least `min_hits` of them hold, and its score is
//! `hits × weight`. With the defaults (2 of 3, weight 33) a fired signal
//! scores 66 or 99.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Slingshot,
    RubberBand,
    LadderClimb,
    Divergence,
    ThreeGreenLights,
}

impl ModelKind {
    /// Evaluation order used when scanning.
    pub const ALL: [ModelKind; 5] = [
        ModelKind::Slingshot,
        ModelKind::RubberBand,
        ModelKind::LadderClimb,
        ModelKind::Divergence,
        ModelKind::ThreeGreenLights,
    ];

    /// Short label printed in the scan table.
    pub fn code(&self) -> &'static str {
        match self {
            ModelKind::Slingshot => "SLING",
            ModelKind::RubberBand => "RUBBER",
            ModelKind::LadderClimb => "LADDER",
            ModelKind::Divergence => "DIVERG",
            ModelKind::ThreeGreenLights => "3GREEN",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Slingshot => "Slingshot",
            ModelKind::RubberBand => "Rubber Band",
            ModelKind::LadderClimb => "Ladder Climb",
            ModelKind::Divergence => "RSI Divergence",
            ModelKind::ThreeGreenLights => "Three Green Lights",
        }
    }

    /// Bars required before the model will evaluate at all.
    pub fn min_bars(&self) -> usize {
        match self {
            ModelKind::ThreeGreenLights => 50,
            _ => 30,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Largest weight that keeps three hits on the 0-100 score scale.
pub const MAX_WEIGHT: u32 = 33;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringParams {
    pub min_hits: usize,
    pub weight: u32,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            min_hits: 2,
            weight: 33,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub model: ModelKind,
    pub fired: bool,
    pub score: u32,
    pub hits: usize,
}

impl Signal {
    /// Result for a model that could not evaluate (e.g. too little history).
    pub fn none(model: ModelKind) -> Self {
        Self {
            model,
            fired: false,
            score: 0,
            hits: 0,
        }
    }

    pub fn from_predicates(model: ModelKind, predicates: &[bool], scoring: &ScoringParams) -> Self {
        let hits = predicates.iter().filter(|&&p| p).count();
        Self {
            model,
            fired: hits >= scoring.min_hits,
            score: (hits as u32).saturating_mul(scoring.weight),
            hits,
        }
    }
}
