// Copyright 2026 The Weft Project
// SPDX-License-Identifier: Apache-2.0

// Decision engine.
//
// Folds environment and social KPI snapshots into a single weighted
// ranking: one AHP solve across the categories, one inside each
// category, then per-indicator contributions and gaps. The computation
// is pure and stateless; every call gets its configuration explicitly
// and allocates a fresh result, so concurrent callers cannot interfere.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::ahp::{MatrixError, PairwiseMatrix, Priorities};
use crate::kpi::{Category, KpiSnapshot};
use crate::normalize::{MappingError, StatusMapping};


/// Placeholder suitability for the economic category until economic
/// KPIs exist: deliberately neutral.
pub const DEFAULT_ECONOMIC_VALUE: f64 = 0.5;

/// Number of top-level categories: environment, social, economic.
const CATEGORY_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// Errors and warnings
// ---------------------------------------------------------------------------

/// Which pairwise matrix a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixLevel {
    Category,
    Environment,
    Social,
}

impl fmt::Display for MatrixLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatrixLevel::Category => "category",
            MatrixLevel::Environment => "environment",
            MatrixLevel::Social => "social",
        })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The engine never fabricates KPI data; an empty snapshot aborts
    /// the computation before any weights are derived.
    #[error("{category} snapshot has no indicators")]
    MissingInput { category: Category },

    #[error("invalid {level} matrix: {source}")]
    InvalidMatrix {
        level: MatrixLevel,
        #[source]
        source: MatrixError,
    },

    #[error(
        "{level} matrix has order {got}, expected {expected} (one row per included indicator)"
    )]
    MatrixSizeMismatch {
        level: MatrixLevel,
        expected: usize,
        got: usize,
    },

    #[error("invalid status mapping: {0}")]
    Configuration(#[from] MappingError),

    #[error("economic_value must be in [0, 1], got {0}")]
    EconomicValueOutOfRange(f64),
}

/// Advisory flag for a matrix whose consistency ratio crossed the
/// threshold. The computed weights are reported unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InconsistencyWarning {
    pub level: MatrixLevel,
    pub consistency_ratio: f64,
}

impl fmt::Display for InconsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "consistency ratio {:.3} for the {} matrix is above 0.1: review the pairwise comparisons",
            self.consistency_ratio, self.level
        )
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Per-call engine configuration. Every default is an explicit value
/// here, never process-wide state.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// 3x3 comparison over {environment, social, economic}, in that
    /// row/column order. `None` means equal category weights.
    pub category_matrix: Option<PairwiseMatrix>,
    /// Comparison over the environment snapshot's included indicators,
    /// rows/columns in ascending indicator-name order. `None` means
    /// equal weights.
    pub environment_matrix: Option<PairwiseMatrix>,
    /// Same, for the social snapshot.
    pub social_matrix: Option<PairwiseMatrix>,
    /// Status suitability overrides. `None` means 1.0 / 0.6 / 0.2.
    pub status_mapping: Option<StatusMapping>,
    /// Suitability stand-in for the data-less economic category.
    pub economic_value: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            category_matrix: None,
            environment_matrix: None,
            social_matrix: None,
            status_mapping: None,
            economic_value: DEFAULT_ECONOMIC_VALUE,
        }
    }
}

impl EngineOptions {
    /// Attach a category matrix from raw rows, attributing validation
    /// failures to the category level.
    pub fn with_category_matrix(mut self, rows: Vec<Vec<f64>>) -> Result<Self, EngineError> {
        self.category_matrix = Some(checked_matrix(rows, MatrixLevel::Category)?);
        Ok(self)
    }

    pub fn with_environment_matrix(mut self, rows: Vec<Vec<f64>>) -> Result<Self, EngineError> {
        self.environment_matrix = Some(checked_matrix(rows, MatrixLevel::Environment)?);
        Ok(self)
    }

    pub fn with_social_matrix(mut self, rows: Vec<Vec<f64>>) -> Result<Self, EngineError> {
        self.social_matrix = Some(checked_matrix(rows, MatrixLevel::Social)?);
        Ok(self)
    }

    /// Attach a status mapping from a raw symbol table
    /// (`{"🟢": …, "🟡": …, "🔴": …, "INDEFINITO": …}`).
    pub fn with_status_symbols(
        mut self,
        table: &BTreeMap<String, f64>,
    ) -> Result<Self, EngineError> {
        self.status_mapping = Some(StatusMapping::from_symbol_table(table)?);
        Ok(self)
    }

    pub fn with_economic_value(mut self, value: f64) -> Result<Self, EngineError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(EngineError::EconomicValueOutOfRange(value));
        }
        self.economic_value = value;
        Ok(self)
    }
}

fn checked_matrix(rows: Vec<Vec<f64>>, level: MatrixLevel) -> Result<PairwiseMatrix, EngineError> {
    PairwiseMatrix::new(rows).map_err(|source| EngineError::InvalidMatrix { level, source })
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Top-level weights across the three categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryWeights {
    pub environment: f64,
    pub social: f64,
    pub economic: f64,
    pub consistency_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorWeight {
    pub indicator: String,
    pub weight: f64,
}

/// Weights inside one category, over its included indicators only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithinWeights {
    pub weights: Vec<IndicatorWeight>,
    pub consistency_ratio: f64,
}

/// One row of the final table. `final_weight` is the category weight
/// times the within-category weight; `gap` is the weighted shortfall
/// from perfect suitability and drives the priority ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalItem {
    pub indicator: String,
    pub category: Category,
    pub final_weight: f64,
    pub norm_value: f64,
    pub contribution: f64,
    pub gap: f64,
}

/// An indicator left out of the computation because its status is
/// undefined. Reported so callers can see what the ranking ignores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedIndicator {
    pub category: Category,
    pub indicator: String,
}

/// Everything one engine invocation produces. Freshly allocated per
/// call; the engine keeps no state between calls.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionResult {
    pub category_weights: CategoryWeights,
    /// `None` when every environment indicator was excluded.
    pub environment: Option<WithinWeights>,
    /// `None` when every social indicator was excluded.
    pub social: Option<WithinWeights>,
    /// Final items in table order: environment, social (each in
    /// ascending indicator-name order), then the synthetic economic row.
    pub items: Vec<FinalItem>,
    /// The same items sorted by descending gap, ties broken by
    /// ascending indicator name.
    pub ranking: Vec<FinalItem>,
    /// 100 x the contribution sum, in [0, 100].
    pub overall_score_pct: f64,
    pub excluded: Vec<ExcludedIndicator>,
    pub warnings: Vec<InconsistencyWarning>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Run the full decision computation over two snapshots.
///
/// Pure and synchronous: no I/O, no shared state, safe to call from any
/// number of threads at once. Inconsistent matrices (CR at or above
/// 0.1) are flagged in `warnings` and logged, never rejected.
pub fn compute(
    env: &KpiSnapshot,
    social: &KpiSnapshot,
    options: &EngineOptions,
) -> Result<DecisionResult, EngineError> {
    if !(0.0..=1.0).contains(&options.economic_value) {
        return Err(EngineError::EconomicValueOutOfRange(options.economic_value));
    }
    if env.is_empty() {
        return Err(EngineError::MissingInput {
            category: Category::Environment,
        });
    }
    if social.is_empty() {
        return Err(EngineError::MissingInput {
            category: Category::Social,
        });
    }

    let mapping = options.status_mapping.unwrap_or_default();
    let mut warnings = Vec::new();

    // Category level: environment / social / economic.
    let category_matrix = match &options.category_matrix {
        Some(m) if m.order() != CATEGORY_COUNT => {
            return Err(EngineError::MatrixSizeMismatch {
                level: MatrixLevel::Category,
                expected: CATEGORY_COUNT,
                got: m.order(),
            });
        }
        Some(m) => m.clone(),
        None => uniform_matrix(CATEGORY_COUNT, MatrixLevel::Category)?,
    };
    let category = category_matrix.solve();
    note_consistency(MatrixLevel::Category, &category, &mut warnings);
    let category_weights = CategoryWeights {
        environment: category.weights[0],
        social: category.weights[1],
        economic: category.weights[2],
        consistency_ratio: category.consistency_ratio,
    };
    tracing::debug!(
        environment = category_weights.environment,
        social = category_weights.social,
        economic = category_weights.economic,
        cr = category.consistency_ratio,
        "solved category weights"
    );

    // Within each category, over the included indicators only.
    let environment = solve_within(
        env,
        options.environment_matrix.as_ref(),
        MatrixLevel::Environment,
        &mut warnings,
    )?;
    let social_within = solve_within(
        social,
        options.social_matrix.as_ref(),
        MatrixLevel::Social,
        &mut warnings,
    )?;

    // Fold weights and normalized statuses into the final table.
    let mut items = Vec::new();
    if let Some(within) = &environment {
        collect_items(
            env,
            Category::Environment,
            within,
            category_weights.environment,
            &mapping,
            &mut items,
        );
    }
    if let Some(within) = &social_within {
        collect_items(
            social,
            Category::Social,
            within,
            category_weights.social,
            &mapping,
            &mut items,
        );
    }
    items.push(final_item(
        "economic",
        Category::Economic,
        category_weights.economic,
        options.economic_value,
    ));

    let overall_score_pct =
        (100.0 * items.iter().map(|i| i.contribution).sum::<f64>()).clamp(0.0, 100.0);

    let mut ranking = items.clone();
    ranking.sort_by(|a, b| {
        b.gap
            .total_cmp(&a.gap)
            .then_with(|| a.indicator.cmp(&b.indicator))
    });

    let mut excluded: Vec<ExcludedIndicator> = Vec::new();
    for (category, snap) in [(Category::Environment, env), (Category::Social, social)] {
        excluded.extend(snap.undefined().map(|name| ExcludedIndicator {
            category,
            indicator: name.to_string(),
        }));
    }

    Ok(DecisionResult {
        category_weights,
        environment,
        social: social_within,
        items,
        ranking,
        overall_score_pct,
        excluded,
        warnings,
    })
}

/// Solve the within-category matrix over a snapshot's included
/// indicators. `None` when everything in the category is excluded:
/// the category then contributes nothing, which is reported, not an
/// error.
fn solve_within(
    snapshot: &KpiSnapshot,
    supplied: Option<&PairwiseMatrix>,
    level: MatrixLevel,
    warnings: &mut Vec<InconsistencyWarning>,
) -> Result<Option<WithinWeights>, EngineError> {
    let included: Vec<&str> = snapshot.defined().map(|(name, _)| name).collect();
    if included.is_empty() {
        tracing::debug!(level = %level, "every indicator excluded; category contributes nothing");
        return Ok(None);
    }

    let matrix = match supplied {
        Some(m) if m.order() != included.len() => {
            return Err(EngineError::MatrixSizeMismatch {
                level,
                expected: included.len(),
                got: m.order(),
            });
        }
        Some(m) => m.clone(),
        None => uniform_matrix(included.len(), level)?,
    };
    let priorities = matrix.solve();
    note_consistency(level, &priorities, warnings);
    tracing::debug!(
        level = %level,
        indicators = included.len(),
        cr = priorities.consistency_ratio,
        "solved within-category weights"
    );

    let weights = included
        .into_iter()
        .zip(&priorities.weights)
        .map(|(indicator, &weight)| IndicatorWeight {
            indicator: indicator.to_string(),
            weight,
        })
        .collect();
    Ok(Some(WithinWeights {
        weights,
        consistency_ratio: priorities.consistency_ratio,
    }))
}

/// Build final items for one category. `within.weights` and
/// `snapshot.defined()` share the same ascending-name order and the
/// same inclusion filter, so they zip one to one. The category comes
/// from the call position, not the snapshot's own tag.
fn collect_items(
    snapshot: &KpiSnapshot,
    category: Category,
    within: &WithinWeights,
    category_weight: f64,
    mapping: &StatusMapping,
    items: &mut Vec<FinalItem>,
) {
    items.extend(
        snapshot
            .defined()
            .zip(&within.weights)
            .filter_map(|((name, record), iw)| {
                mapping.score(record.status).map(|norm_value| {
                    final_item(name, category, category_weight * iw.weight, norm_value)
                })
            }),
    );
}

fn final_item(indicator: &str, category: Category, final_weight: f64, norm_value: f64) -> FinalItem {
    FinalItem {
        indicator: indicator.to_string(),
        category,
        final_weight,
        norm_value,
        contribution: final_weight * norm_value,
        gap: final_weight * (1.0 - norm_value),
    }
}

fn uniform_matrix(n: usize, level: MatrixLevel) -> Result<PairwiseMatrix, EngineError> {
    PairwiseMatrix::uniform(n).map_err(|source| EngineError::InvalidMatrix { level, source })
}

fn note_consistency(
    level: MatrixLevel,
    priorities: &Priorities,
    warnings: &mut Vec<InconsistencyWarning>,
) {
    if !priorities.is_consistent() {
        tracing::warn!(
            level = %level,
            cr = priorities.consistency_ratio,
            "pairwise comparisons are inconsistent; review the matrix"
        );
        warnings.push(InconsistencyWarning {
            level,
            consistency_ratio: priorities.consistency_ratio,
        });
    }
}
