// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-tensor liveness profiles over the execution schedule.
//!
//! The builder walks the schedule once, appending the step index to the use
//! list of every tensor the step's operator touches, then deduplicates each
//! list. A tensor that appears as both input and output of the same step (or
//! twice as an input) is recorded once for that step.
//!
//! The derived quantities drive pin selection:
//! * `ttl` - the step interval over which the tensor is live
//! * `unused_liveness` - steps during which a live tensor sits idle; a high
//!   value marks a weak pin candidate
//! * `fomd` - the figure of merit the validator orders candidates by

use std::collections::HashMap;

use crate::graph::{Network, TensorId};
use crate::engine::Schedule;

/// Use-time profile of a single tensor.
///
/// `uses` is a sorted set of distinct schedule steps and is never empty:
/// records exist only for tensors the schedule actually references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessRecord {
    name: String,
    uses: Vec<usize>,
}

impl LivenessRecord {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uses: Vec::new(),
        }
    }

    fn record_use(&mut self, step: usize) {
        self.uses.push(step);
    }

    fn dedup(&mut self) {
        self.uses.sort_unstable();
        self.uses.dedup();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sorted distinct steps at which the tensor is referenced.
    pub fn uses(&self) -> &[usize] {
        &self.uses
    }

    /// First step referencing the tensor.
    pub fn start(&self) -> usize {
        self.uses[0]
    }

    /// Last step referencing the tensor.
    pub fn end(&self) -> usize {
        self.uses[self.uses.len() - 1]
    }

    /// Live interval length in steps.
    pub fn ttl(&self) -> usize {
        self.end() - self.start()
    }

    /// Steps during which the tensor is live but unreferenced. Negative for
    /// densely used tensors, which makes them the strongest candidates.
    pub fn unused_liveness(&self) -> i64 {
        self.ttl() as i64 - self.uses.len() as i64
    }

    /// Reserved figure-of-merit term; always 0 for now.
    pub fn memory_boundness(&self) -> f64 {
        0.0
    }

    /// Reserved figure-of-merit term; always 0 for now.
    pub fn impact(&self) -> f64 {
        0.0
    }

    /// Figure of merit for pinning decisions. Lower is better; the reserved
    /// terms keep the ordering contract stable for future extensions.
    pub fn fomd(&self) -> f64 {
        self.unused_liveness() as f64 + self.memory_boundness() + self.impact()
    }

    /// Whether the tensor is live at `step`.
    pub fn live_at(&self, step: usize) -> bool {
        self.start() <= step && step <= self.end()
    }
}

impl std::fmt::Display for LivenessRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let times: Vec<String> = self.uses.iter().map(|s| s.to_string()).collect();
        write!(f, "{}: [{}]", self.name, times.join(", "))
    }
}

/// Builds the tensor-to-liveness map from a schedule.
pub struct LivenessBuilder;

impl LivenessBuilder {
    /// Walk the schedule and record every input and output use.
    ///
    /// Idempotent: a second run over the same schedule produces equal
    /// records.
    pub fn build(network: &Network, schedule: &Schedule) -> HashMap<TensorId, LivenessRecord> {
        let mut map: HashMap<TensorId, LivenessRecord> = HashMap::new();
        for (step, op_id) in schedule.iter() {
            let op = network.operator(op_id);
            for &tensor in op.inputs().iter().chain(op.outputs().iter()) {
                map.entry(tensor)
                    .or_insert_with(|| LivenessRecord::new(network.tensor(tensor).name()))
                    .record_use(step);
            }
        }
        for record in map.values_mut() {
            record.dedup();
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::topological_schedule;
    use crate::graph::{DataType, OpType, Operator, Tensor, TensorShape};

    fn byte_tensor(net: &mut Network, name: &str, elems: usize) -> TensorId {
        net.add_tensor(Tensor::new(
            name,
            TensorShape::new(vec![elems]),
            DataType::Int8,
        ))
    }

    fn chain() -> (Network, TensorId, TensorId, TensorId) {
        // a -> op1 -> b -> op2 -> c
        let mut net = Network::new("chain");
        let a = byte_tensor(&mut net, "a", 256);
        let b = byte_tensor(&mut net, "b", 256);
        let c = byte_tensor(&mut net, "c", 256);
        net.add_operator(Operator::new("op1", OpType::Activation, vec![a], vec![b]));
        net.add_operator(Operator::new("op2", OpType::Activation, vec![b], vec![c]));
        (net, a, b, c)
    }

    #[test]
    fn test_uses_cover_inputs_and_outputs() {
        let (net, a, b, c) = chain();
        let schedule = topological_schedule(&net).unwrap();
        let liveness = LivenessBuilder::build(&net, &schedule);

        assert_eq!(liveness[&a].uses(), &[0]);
        assert_eq!(liveness[&b].uses(), &[0, 1]);
        assert_eq!(liveness[&c].uses(), &[1]);
    }

    #[test]
    fn test_derived_quantities() {
        let (net, a, b, _c) = chain();
        let schedule = topological_schedule(&net).unwrap();
        let liveness = LivenessBuilder::build(&net, &schedule);

        assert_eq!(liveness[&b].start(), 0);
        assert_eq!(liveness[&b].end(), 1);
        assert_eq!(liveness[&b].ttl(), 1);
        assert_eq!(liveness[&b].unused_liveness(), -1);
        assert_eq!(liveness[&b].fomd(), -1.0);

        assert_eq!(liveness[&a].ttl(), 0);
        assert_eq!(liveness[&a].unused_liveness(), -1);
    }

    #[test]
    fn test_same_step_duplicate_uses_collapse() {
        // x feeds both input slots of one operator
        let mut net = Network::new("alias");
        let x = byte_tensor(&mut net, "x", 8);
        let y = byte_tensor(&mut net, "y", 8);
        net.add_operator(Operator::new("square", OpType::EltwiseAdd, vec![x, x], vec![y]));

        let schedule = topological_schedule(&net).unwrap();
        let liveness = LivenessBuilder::build(&net, &schedule);
        assert_eq!(liveness[&x].uses(), &[0]);
    }

    #[test]
    fn test_unreferenced_tensors_have_no_record() {
        let (mut net, ..) = chain();
        let orphan = byte_tensor(&mut net, "orphan", 8);

        let schedule = topological_schedule(&net).unwrap();
        let liveness = LivenessBuilder::build(&net, &schedule);
        assert!(!liveness.contains_key(&orphan));
    }

    #[test]
    fn test_build_is_idempotent() {
        let (net, ..) = chain();
        let schedule = topological_schedule(&net).unwrap();
        let first = LivenessBuilder::build(&net, &schedule);
        let second = LivenessBuilder::build(&net, &schedule);
        assert_eq!(first, second);
    }

    #[test]
    fn test_display_renders_access_times() {
        let (net, _a, b, _c) = chain();
        let schedule = topological_schedule(&net).unwrap();
        let liveness = LivenessBuilder::build(&net, &schedule);
        assert_eq!(format!("{}", liveness[&b]), "b: [0, 1]");
    }
}
