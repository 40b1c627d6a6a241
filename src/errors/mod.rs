// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod analysis;
mod artifact;
mod config;
mod plan;

pub use analysis::AnalysisError;
pub use artifact::ArtifactError;
pub use config::ConfigError;
pub use plan::PlanError;
