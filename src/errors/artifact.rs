// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for ILP artifact emission.
//!
//! Artifact writes are the only I/O the planner performs. Failures wrap the
//! underlying `std::io::Error` via `thiserror` so callers keep the full
//! source chain.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing the ILP solver artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// The caller-supplied output directory is missing. The planner never
    /// creates it.
    #[error("artifact directory '{path}' does not exist or is not a directory")]
    MissingDirectory { path: PathBuf },

    /// Writing one of the artifact files failed.
    #[error("failed to write ILP artifact '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
