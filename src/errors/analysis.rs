// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by the graph analysis passes.

use std::fmt;

/// Errors that can occur while scheduling and pin-planning a network.
///
/// All analysis errors are fatal for the current planning pass: the analyzer
/// discards its partial state and surfaces the error to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The operator graph contains a cycle, so no topological schedule exists
    CyclicGraph {
        /// An operator left unscheduled when the ready queue drained
        operator: String,
    },
    /// A liveness lookup was made for a tensor the schedule never references.
    /// This indicates a graph-construction bug in the caller
    UnknownTensor {
        tensor: String,
    },
    /// An operator's mandatory inputs alone cannot fit in the writable
    /// scratchpad budget, so no safe pin assignment exists
    PlanInfeasible {
        /// The operator whose inputs overflow the budget
        operator: String,
        /// The offending input tensor
        tensor: String,
        /// Storage the tensor requires, in bytes
        bytes: u64,
        /// The budget it had to fit in, in bytes
        budget: u64,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::CyclicGraph { operator } => {
                write!(
                    f,
                    "Operator graph is cyclic: '{}' can never become ready",
                    operator
                )
            }
            AnalysisError::UnknownTensor { tensor } => {
                write!(f, "Tensor '{}' has no liveness record", tensor)
            }
            AnalysisError::PlanInfeasible {
                operator,
                tensor,
                bytes,
                budget,
            } => {
                write!(
                    f,
                    "Input '{}' of operator '{}' needs {} bytes but only {} bytes of scratchpad are writable",
                    tensor, operator, bytes, budget
                )
            }
        }
    }
}

impl std::error::Error for AnalysisError {}
