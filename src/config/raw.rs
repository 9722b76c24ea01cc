// Copyright 2026 The Weft Project
// SPDX-License-Identifier: Apache-2.0

// Raw YAML deserialization types (internal)
// These are separate from the public Policy struct because:
// 1. Matrices and mappings are validated between raw and public
//    (reciprocity, symbol coverage, ranges), and the failures need to
//    name the offending level.
// 2. Keeps the public API clean: a loaded Policy is valid by
//    construction.

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RawPolicy {
    /// Policy contract version. Always "v1".
    pub weft: String,
    /// 3x3 rows over {environment, social, economic}.
    pub category_matrix: Option<Vec<Vec<f64>>>,
    /// Rows over the environment snapshot's included indicators,
    /// ascending name order.
    pub environment_matrix: Option<Vec<Vec<f64>>>,
    pub social_matrix: Option<Vec<Vec<f64>>>,
    /// Symbol table: all four status symbols to scores in [0, 1].
    pub status_mapping: Option<BTreeMap<String, f64>>,
    pub economic_value: Option<f64>,
}
