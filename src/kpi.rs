// Copyright 2026 The Weft Project
// SPDX-License-Identifier: Apache-2.0

// Canonical KPI types.
//
// These are the types every stage operates on. Snapshot producers
// (the sensor and social tooling upstream of this crate) emit them as
// JSON; the decision engine consumes them read-only. The struct layout
// is intentionally flat and mirrors the wire shape one to one.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::target::TargetDef;

// ---------------------------------------------------------------------------
// Status / trend vocabulary
// ---------------------------------------------------------------------------

/// Qualitative status of one indicator, already judged against its target.
///
/// `Undefined` marks an indicator with no usable reading or no usable
/// target. It is excluded from every aggregation: no suitability score,
/// no share of the within-category weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "🟢")]
    Green,
    #[serde(rename = "🟡")]
    Yellow,
    #[serde(rename = "🔴")]
    Red,
    #[serde(rename = "INDEFINITO")]
    Undefined,
}

impl Status {
    /// Whether this status carries information (anything but `Undefined`).
    pub fn is_defined(self) -> bool {
        !matches!(self, Status::Undefined)
    }

    /// Report points for the snapshot-level score: 10 / 7 / 3.
    /// `Undefined` yields no points and does not dilute the mean.
    pub fn points(self) -> Option<u8> {
        match self {
            Status::Green => Some(10),
            Status::Yellow => Some(7),
            Status::Red => Some(3),
            Status::Undefined => None,
        }
    }

    /// The wire symbol, as the snapshot producers print it.
    pub fn symbol(self) -> &'static str {
        match self {
            Status::Green => "🟢",
            Status::Yellow => "🟡",
            Status::Red => "🔴",
            Status::Undefined => "INDEFINITO",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Direction of an indicator over its observation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "↗")]
    Rising,
    #[serde(rename = "→")]
    Steady,
    #[serde(rename = "↘")]
    Falling,
}

impl Default for Trend {
    /// Producers emit `→` when there is not enough history to judge.
    fn default() -> Self {
        Trend::Steady
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trend::Rising => "↗",
            Trend::Steady => "→",
            Trend::Falling => "↘",
        })
    }
}

/// Decision category at the top level of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Environment,
    Social,
    Economic,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Environment => "environment",
            Category::Social => "social",
            Category::Economic => "economic",
        })
    }
}

// ---------------------------------------------------------------------------
// Records and snapshots
// ---------------------------------------------------------------------------

/// One indicator's current reading.
///
/// `value` is `None` when no reading was available; the status is then
/// `Undefined` by construction upstream, but the engine trusts `status`
/// alone and never re-derives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRecord {
    #[serde(default)]
    pub value: Option<f64>,
    /// Display unit from the targets file (e.g. "°C", "%", "ppm").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub status: Status,
    #[serde(default)]
    pub trend: Trend,
    /// The target this reading was judged against, carried along for
    /// reporting. Not consulted here: `status` is already the verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetDef>,
}

impl KpiRecord {
    /// A record with only a status, as the worked examples use.
    pub fn from_status(status: Status) -> Self {
        Self {
            value: None,
            unit: None,
            status,
            trend: Trend::Steady,
            target: None,
        }
    }
}

/// Reporting window a snapshot was computed over. Timestamps are kept
/// as the producers emit them (ISO 8601 strings), not reparsed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Where and when a snapshot comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(default)]
    pub period: Period,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
}

/// A named set of indicator readings for one category.
///
/// Indicators are keyed by name in a `BTreeMap`: iteration order is
/// ascending by name, and the engine's matrix row/column correspondence
/// relies on exactly that ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub category: Category,
    #[serde(default)]
    pub provenance: Provenance,
    pub indicators: BTreeMap<String, KpiRecord>,
}

impl KpiSnapshot {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            provenance: Provenance::default(),
            indicators: BTreeMap::new(),
        }
    }

    /// Insert or replace an indicator reading.
    pub fn insert(&mut self, name: impl Into<String>, record: KpiRecord) {
        self.indicators.insert(name.into(), record);
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Indicators with a defined status, in ascending name order.
    pub fn defined(&self) -> impl Iterator<Item = (&str, &KpiRecord)> {
        self.indicators
            .iter()
            .filter(|(_, r)| r.status.is_defined())
            .map(|(n, r)| (n.as_str(), r))
    }

    /// Indicators whose status is `Undefined`, in ascending name order.
    pub fn undefined(&self) -> impl Iterator<Item = &str> {
        self.indicators
            .iter()
            .filter(|(_, r)| !r.status.is_defined())
            .map(|(n, _)| n.as_str())
    }

    /// Snapshot-level report score on a 0-100 scale: the mean of the
    /// per-status points (10/7/3) times ten. `None` when every status
    /// is `Undefined`.
    pub fn score(&self) -> Option<f64> {
        let points: Vec<f64> = self
            .indicators
            .values()
            .filter_map(|r| r.status.points())
            .map(f64::from)
            .collect();
        if points.is_empty() {
            return None;
        }
        Some(points.iter().sum::<f64>() / points.len() as f64 * 10.0)
    }

    /// Traffic-light rating of the snapshot score: 🟢 at 90 and above,
    /// 🟡 at 70 and above, 🔴 below.
    pub fn rating(&self) -> Option<Status> {
        self.score().map(|s| {
            if s >= 90.0 {
                Status::Green
            } else if s >= 70.0 {
                Status::Yellow
            } else {
                Status::Red
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
