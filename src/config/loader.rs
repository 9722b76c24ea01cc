// Copyright 2026 The Weft Project
// SPDX-License-Identifier: Apache-2.0

use sha2::{Digest, Sha256};

use crate::engine::EngineOptions;

use super::error::ConfigError;
use super::raw;
use super::source::ConfigSource;
use super::Policy;

/// Load and validate a weighting policy from the given source.
///
/// Steps:
/// 1. Read raw YAML bytes from source
/// 2. Compute the SHA-256 policy hash
/// 3. Parse YAML into raw deserialization types
/// 4. Validate matrices, mapping, and economic value into typed
///    `EngineOptions`
pub fn load_policy(source: &dyn ConfigSource) -> Result<Policy, ConfigError> {
    let raw_yaml = source.load()?;
    let policy_hash = compute_hash(&raw_yaml);

    let raw: raw::RawPolicy = serde_yaml::from_str(&raw_yaml)?;

    if raw.weft != "v1" {
        return Err(ConfigError::Validation(format!(
            "unsupported policy version \"{}\", expected \"v1\"",
            raw.weft
        )));
    }

    let mut options = EngineOptions::default();
    if let Some(rows) = raw.category_matrix {
        options = options.with_category_matrix(rows)?;
    }
    if let Some(rows) = raw.environment_matrix {
        options = options.with_environment_matrix(rows)?;
    }
    if let Some(rows) = raw.social_matrix {
        options = options.with_social_matrix(rows)?;
    }
    if let Some(table) = raw.status_mapping {
        options = options.with_status_symbols(&table)?;
    }
    if let Some(value) = raw.economic_value {
        options = options.with_economic_value(value)?;
    }

    Ok(Policy {
        version: raw.weft,
        options,
        policy_hash,
    })
}

fn compute_hash(raw_yaml: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_yaml.as_bytes());
    let hash = hasher.finalize();
    format!("sha256:{hash:x}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
