// Copyright 2026 The Weft Project
// SPDX-License-Identifier: Apache-2.0

// Target bands and status evaluation.
//
// A target definition declares the thresholds one indicator is judged
// against. The targets file itself lives upstream; this module only
// gives its entries a typed shape and the evaluation semantics.
//
// Band shapes, in precedence order:
// - centered: `target` ± `tol` is green, an extra `yellow_extra` margin
//   on each side is yellow (positioning-style metrics);
// - directional (`direction: higher | lower | center`): green threshold
//   on one side, or a green interval in the middle, with yellow
//   intervals between;
// - banded: plain green interval plus optional yellow intervals.

use serde::{Deserialize, Serialize};

use crate::kpi::Status;

/// Which side of the target range counts as good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[serde(alias = "higher_integer")]
    Higher,
    Lower,
    Center,
}

/// Declarative thresholds for one indicator, as they appear in the
/// targets file. All fields are optional; an entry with no usable
/// thresholds evaluates every reading to `Undefined`.
///
/// Yellow is always a list of intervals, even when there is only one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub yellow: Vec<(f64, f64)>,
    /// Center of a `target` ± `tol` band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tol: Option<f64>,
    /// Symmetric yellow margin outside the green band of a centered target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yellow_extra: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl TargetDef {
    /// Whether this definition can classify a reading at all.
    /// Entries that only carry a unit are placeholders.
    pub fn has_thresholds(&self) -> bool {
        (self.target.is_some() && self.tol.is_some()) || self.green.is_some()
    }

    /// Judge a reading against this definition.
    ///
    /// A missing reading or a threshold-less definition is `Undefined`,
    /// never silently red or green.
    pub fn evaluate(&self, value: Option<f64>) -> Status {
        let v = match value {
            Some(v) => v,
            None => return Status::Undefined,
        };
        if !self.has_thresholds() {
            return Status::Undefined;
        }

        if let (Some(center), Some(tol)) = (self.target, self.tol) {
            return self.evaluate_centered(v, center, tol);
        }

        match self.direction {
            Some(Direction::Higher) => self.evaluate_higher(v),
            Some(Direction::Lower) => self.evaluate_lower(v),
            Some(Direction::Center) | None => self.evaluate_banded(v),
        }
    }

    fn evaluate_centered(&self, v: f64, center: f64, tol: f64) -> Status {
        let extra = self.yellow_extra.unwrap_or(0.0);
        if (center - tol..=center + tol).contains(&v) {
            Status::Green
        } else if (center - tol - extra..=center + tol + extra).contains(&v) {
            Status::Yellow
        } else {
            Status::Red
        }
    }

    fn evaluate_banded(&self, v: f64) -> Status {
        if let Some((lo, hi)) = self.green {
            if (lo..=hi).contains(&v) {
                return Status::Green;
            }
        }
        if self.in_yellow(v) {
            Status::Yellow
        } else {
            Status::Red
        }
    }

    fn evaluate_higher(&self, v: f64) -> Status {
        if let Some((lo, _)) = self.green {
            if v >= lo {
                return Status::Green;
            }
        }
        if self.in_yellow(v) {
            Status::Yellow
        } else {
            Status::Red
        }
    }

    fn evaluate_lower(&self, v: f64) -> Status {
        if let Some((_, hi)) = self.green {
            if v <= hi {
                return Status::Green;
            }
        }
        if self.in_yellow(v) {
            Status::Yellow
        } else {
            Status::Red
        }
    }

    fn in_yellow(&self, v: f64) -> bool {
        self.yellow.iter().any(|(lo, hi)| (*lo..=*hi).contains(&v))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
