// Copyright 2026 The Weft Project
// SPDX-License-Identifier: Apache-2.0

pub mod ahp;
pub mod config;
pub mod engine;
pub mod kpi;
pub mod normalize;
pub mod target;
pub mod trend;
