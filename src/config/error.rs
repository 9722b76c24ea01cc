// Copyright 2026 The Weft Project
// SPDX-License-Identifier: Apache-2.0

use crate::engine::EngineError;

/// All errors that can occur during policy loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read policy source: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid weighting policy: {0}")]
    Policy(#[from] EngineError),
}
