// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for scheduling, liveness and pin-planning events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A planning pass started on a network.
///
/// # Log Level
/// `info!` - Important operational event
pub struct AnalysisStarted<'a> {
    pub network: &'a str,
    pub operator_count: usize,
}

impl Display for AnalysisStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Analyzing network '{}': {} operators",
            self.network, self.operator_count
        )
    }
}

impl StructuredLog for AnalysisStarted<'_> {
    fn log(&self) {
        tracing::info!(
            network = self.network,
            operator_count = self.operator_count,
            "{}",
            self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "analysis",
            span_name = name,
            network = self.network,
            operator_count = self.operator_count,
        )
    }
}

/// The topological schedule was built.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ScheduleBuilt {
    pub steps: usize,
}

impl Display for ScheduleBuilt {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Built execution schedule: {} steps", self.steps)
    }
}

impl StructuredLog for ScheduleBuilt {
    fn log(&self) {
        tracing::info!(steps = self.steps, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("schedule", span_name = name, steps = self.steps)
    }
}

/// The schedule was compared against the graph build order.
///
/// # Log Level
/// `info!` - Diagnostic comparison requested by the caller
pub struct BuildOrderCompared {
    pub steps: usize,
    pub matches_build_order: bool,
}

impl Display for BuildOrderCompared {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Schedule over {} steps {} the graph build order",
            self.steps,
            if self.matches_build_order {
                "matches"
            } else {
                "differs from"
            }
        )
    }
}

impl StructuredLog for BuildOrderCompared {
    fn log(&self) {
        tracing::info!(
            steps = self.steps,
            matches_build_order = self.matches_build_order,
            "{}",
            self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "schedule_comparison",
            span_name = name,
            steps = self.steps,
            matches_build_order = self.matches_build_order,
        )
    }
}

/// Liveness records were built for every referenced tensor.
///
/// # Log Level
/// `info!` - Important operational event
pub struct LivenessRecorded {
    pub tensor_count: usize,
}

impl Display for LivenessRecorded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Recorded liveness for {} tensors", self.tensor_count)
    }
}

impl StructuredLog for LivenessRecorded {
    fn log(&self) {
        tracing::info!(tensor_count = self.tensor_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "liveness",
            span_name = name,
            tensor_count = self.tensor_count
        )
    }
}

/// A pin candidate was dropped from one schedule step.
///
/// # Log Level
/// `debug!` - High-volume pruning detail
pub struct PinDropped<'a> {
    pub tensor: &'a str,
    pub step: usize,
    pub reason: &'a str,
}

impl Display for PinDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dropped pin '{}' at step {}: {}",
            self.tensor, self.step, self.reason
        )
    }
}

impl StructuredLog for PinDropped<'_> {
    fn log(&self) {
        tracing::debug!(
            tensor = self.tensor,
            step = self.step,
            reason = self.reason,
            "{}",
            self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "pin_dropped",
            span_name = name,
            tensor = self.tensor,
            step = self.step,
        )
    }
}

/// A tensor can never fit in a scratchpad and was removed from every step.
///
/// # Log Level
/// `warn!` - The plan loses a candidate the graph builder probably expected
pub struct TensorNeverPinnable<'a> {
    pub tensor: &'a str,
    pub bytes: u64,
    pub capacity: u64,
}

impl Display for TensorNeverPinnable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Tensor '{}' ({} bytes) exceeds scratchpad capacity ({} bytes); never pinned",
            self.tensor, self.bytes, self.capacity
        )
    }
}

impl StructuredLog for TensorNeverPinnable<'_> {
    fn log(&self) {
        tracing::warn!(
            tensor = self.tensor,
            bytes = self.bytes,
            capacity = self.capacity,
            "{}",
            self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "never_pinnable",
            span_name = name,
            tensor = self.tensor,
            bytes = self.bytes,
        )
    }
}

/// A planning pass completed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct PlanCompleted {
    pub steps: usize,
    pub pinned_total: usize,
}

impl Display for PlanCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Plan complete: {} pins across {} steps",
            self.pinned_total, self.steps
        )
    }
}

impl StructuredLog for PlanCompleted {
    fn log(&self) {
        tracing::info!(
            steps = self.steps,
            pinned_total = self.pinned_total,
            "{}",
            self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "plan_completed",
            span_name = name,
            steps = self.steps,
            pinned_total = self.pinned_total,
        )
    }
}

/// The in-process scratchpad mapper finished its search.
///
/// # Log Level
/// `info!` - Important operational event
pub struct MappingCompleted {
    pub steps: usize,
    pub pinned_outputs: u32,
}

impl Display for MappingCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Scratchpad mapping complete: {} pinned outputs across {} steps",
            self.pinned_outputs, self.steps
        )
    }
}

impl StructuredLog for MappingCompleted {
    fn log(&self) {
        tracing::info!(
            steps = self.steps,
            pinned_outputs = self.pinned_outputs,
            "{}",
            self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "mapping_completed",
            span_name = name,
            steps = self.steps,
            pinned_outputs = self.pinned_outputs,
        )
    }
}
