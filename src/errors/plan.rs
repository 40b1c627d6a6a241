// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Umbrella error for the top-level planning entry point.

use std::fmt;

use crate::errors::{AnalysisError, ArtifactError};

/// Anything that can go wrong inside `plan()`: an analysis failure or an
/// artifact write failure. Partial planner state is discarded either way.
#[derive(Debug)]
pub enum PlanError {
    Analysis(AnalysisError),
    Artifact(ArtifactError),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Analysis(e) => write!(f, "{}", e),
            PlanError::Artifact(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanError::Analysis(e) => Some(e),
            PlanError::Artifact(e) => Some(e),
        }
    }
}

impl From<AnalysisError> for PlanError {
    fn from(e: AnalysisError) -> Self {
        PlanError::Analysis(e)
    }
}

impl From<ArtifactError> for PlanError {
    fn from(e: ArtifactError) -> Self {
        PlanError::Artifact(e)
    }
}
