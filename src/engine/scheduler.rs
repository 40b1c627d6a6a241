// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Topological linearization of the operator DAG.
//!
//! The scheduler turns the network into an ordered execution queue using
//! Kahn's algorithm with a FIFO ready queue. Ties between simultaneously
//! ready operators are broken by graph insertion order, so the same DAG
//! always yields the same schedule. Every later pass (liveness, pin
//! planning, artifact emission) is defined over the step indices this
//! module hands out.

use std::collections::{HashMap, VecDeque};

use crate::errors::AnalysisError;
use crate::graph::{Network, OpId};

/// A deterministic linear execution order over the network's operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    order: Vec<OpId>,
    steps: HashMap<OpId, usize>,
}

impl Schedule {
    fn new(order: Vec<OpId>) -> Self {
        let steps = order
            .iter()
            .enumerate()
            .map(|(step, &op)| (op, step))
            .collect();
        Self { order, steps }
    }

    /// Operators in execution order.
    pub fn order(&self) -> &[OpId] {
        &self.order
    }

    /// Number of schedule steps.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Operator executing at `step`.
    pub fn op_at(&self, step: usize) -> OpId {
        self.order[step]
    }

    /// Step index at which `op` executes.
    pub fn step_of(&self, op: OpId) -> Option<usize> {
        self.steps.get(&op).copied()
    }

    /// Iterate `(step, op)` pairs in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, OpId)> + '_ {
        self.order.iter().enumerate().map(|(step, &op)| (step, op))
    }
}

/// Linearize the operator DAG into a [`Schedule`].
///
/// Seeds a FIFO ready queue with all zero-in-degree operators in insertion
/// order, then repeatedly pops the front, appends it to the schedule, and
/// decrements the in-degrees of its successors, enqueueing any that reach
/// zero. Newly ready operators keep their insertion order relative to each
/// other because successor edges are stored in insertion order.
///
/// Returns [`AnalysisError::CyclicGraph`] if the ready queue drains before
/// every operator is scheduled, naming one of the stuck operators.
pub fn topological_schedule(network: &Network) -> Result<Schedule, AnalysisError> {
    let op_count = network.op_count();
    let mut in_degree: Vec<usize> = network
        .build_order()
        .map(|op| network.in_degree(op))
        .collect();

    let mut ready: VecDeque<OpId> = network
        .build_order()
        .filter(|op| in_degree[op.0] == 0)
        .collect();

    let mut order = Vec::with_capacity(op_count);
    while let Some(op) = ready.pop_front() {
        order.push(op);
        for succ in network.successors(op) {
            in_degree[succ.0] -= 1;
            if in_degree[succ.0] == 0 {
                ready.push_back(succ);
            }
        }
    }

    if order.len() != op_count {
        // Name the first operator that never became ready
        if let Some(stuck) = network.build_order().find(|op| in_degree[op.0] > 0) {
            return Err(AnalysisError::CyclicGraph {
                operator: network.operator(stuck).name().to_string(),
            });
        }
    }

    Ok(Schedule::new(order))
}
