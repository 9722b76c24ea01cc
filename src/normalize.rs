// Copyright 2026 The Weft Project
// SPDX-License-Identifier: Apache-2.0

// Status normalization.
//
// Maps a qualitative status to a suitability score in [0, 1] for the
// decision engine. `Undefined` never maps to a number: indicators
// without data are excluded from aggregation, not nudged toward a
// mid value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::kpi::Status;

/// Suitability scores for the three defined statuses.
///
/// Custom mappings are validated at construction: every score must lie
/// in [0, 1]. Raw symbol tables (the shape callers send over the wire)
/// must additionally cover all four symbols, INDEFINITO included; the
/// INDEFINITO entry is accepted for completeness but never used, since
/// exclusion is not overridable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusMapping {
    pub green: f64,
    pub yellow: f64,
    pub red: f64,
}

impl Default for StatusMapping {
    fn default() -> Self {
        Self {
            green: 1.0,
            yellow: 0.6,
            red: 0.2,
        }
    }
}

/// A custom mapping that cannot be used as supplied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MappingError {
    #[error("status mapping must cover \"{0}\"")]
    MissingSymbol(&'static str),

    #[error("status mapping score for \"{symbol}\" must be in [0, 1], got {score}")]
    ScoreOutOfRange { symbol: String, score: f64 },
}

impl StatusMapping {
    /// Build a mapping from explicit scores, rejecting anything outside
    /// [0, 1].
    pub fn new(green: f64, yellow: f64, red: f64) -> Result<Self, MappingError> {
        for (symbol, score) in [
            (Status::Green, green),
            (Status::Yellow, yellow),
            (Status::Red, red),
        ] {
            check_score(symbol.symbol(), score)?;
        }
        Ok(Self { green, yellow, red })
    }

    /// Build a mapping from a raw symbol table, e.g.
    /// `{"🟢": 1.0, "🟡": 0.6, "🔴": 0.2, "INDEFINITO": 0.0}`.
    ///
    /// All four symbols must be present. Unknown extra keys are ignored,
    /// matching the lookup semantics of the snapshot producers.
    pub fn from_symbol_table(table: &BTreeMap<String, f64>) -> Result<Self, MappingError> {
        let lookup = |symbol: &'static str| -> Result<f64, MappingError> {
            let score = *table
                .get(symbol)
                .ok_or(MappingError::MissingSymbol(symbol))?;
            check_score(symbol, score)?;
            Ok(score)
        };
        let green = lookup("🟢")?;
        let yellow = lookup("🟡")?;
        let red = lookup("🔴")?;
        // Required for completeness, range-checked, never used.
        lookup("INDEFINITO")?;
        Ok(Self { green, yellow, red })
    }

    /// Suitability score for a status. `None` for `Undefined`.
    pub fn score(&self, status: Status) -> Option<f64> {
        match status {
            Status::Green => Some(self.green),
            Status::Yellow => Some(self.yellow),
            Status::Red => Some(self.red),
            Status::Undefined => None,
        }
    }
}

fn check_score(symbol: &str, score: f64) -> Result<(), MappingError> {
    if (0.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(MappingError::ScoreOutOfRange {
            symbol: symbol.to_string(),
            score,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
