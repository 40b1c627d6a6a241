// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for ILP artifact emission events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// All four solver artifacts were written.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ArtifactsWritten<'a> {
    pub directory: &'a Path,
    pub steps: usize,
    pub tensor_count: usize,
}

impl Display for ArtifactsWritten<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Wrote ILP artifacts to '{}': {} steps, {} tensors",
            self.directory.display(),
            self.steps,
            self.tensor_count
        )
    }
}

impl StructuredLog for ArtifactsWritten<'_> {
    fn log(&self) {
        tracing::info!(
            directory = %self.directory.display(),
            steps = self.steps,
            tensor_count = self.tensor_count,
            "{}",
            self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "artifacts_written",
            span_name = name,
            directory = %self.directory.display(),
            steps = self.steps,
            tensor_count = self.tensor_count,
        )
    }
}

/// A failed emission removed the artifacts it had already written.
///
/// # Log Level
/// `error!` - The planning pass is about to surface an error
pub struct ArtifactsDiscarded<'a> {
    pub directory: &'a Path,
    pub written: usize,
}

impl Display for ArtifactsDiscarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Discarded {} partial ILP artifacts under '{}'",
            self.written,
            self.directory.display()
        )
    }
}

impl StructuredLog for ArtifactsDiscarded<'_> {
    fn log(&self) {
        tracing::error!(
            directory = %self.directory.display(),
            written = self.written,
            "{}",
            self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "artifacts_discarded",
            span_name = name,
            directory = %self.directory.display(),
            written = self.written,
        )
    }
}
