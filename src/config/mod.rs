// Copyright 2026 The Weft Project
// SPDX-License-Identifier: Apache-2.0

// Weighting-policy loader and validator.
//
// A policy file carries the pairwise comparison matrices, an optional
// status mapping, and the economic placeholder, version-controlled
// separately from code. Loading validates everything into typed
// `EngineOptions`; the SHA-256 policy hash identifies exactly which
// policy produced a ranking.

mod error;
mod loader;
mod raw;
mod source;

pub use error::ConfigError;
pub use loader::load_policy;
pub use source::{ConfigSource, FileSource, StringSource};

use crate::engine::EngineOptions;

/// A loaded, validated weighting policy.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Policy contract version. Always "v1".
    pub version: String,
    /// Engine configuration carried by the policy, with explicit
    /// defaults for everything the file leaves out.
    pub options: EngineOptions,
    /// SHA-256 hash of the raw YAML bytes: "sha256:{hex}".
    pub policy_hash: String,
}
