// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pin-table validation: liveness consistency and capacity pruning.
//!
//! The planner's reverse walk produces an upper bound on what could be
//! pinned. Validation trims it down to an assignment that is safe at every
//! step, in two phases:
//!
//! 1. **Liveness consistency.** A tensor must not be claimed resident at a
//!    step outside its live interval.
//! 2. **Capacity pruning.** At every step the surviving pins must fit in the
//!    writable budget - every scratchpad except the reserved output pad.
//!    Mandatory inputs are placed first; the remaining candidates compete in
//!    ascending figure-of-merit order, with ties broken by tensor name so the
//!    outcome never depends on map iteration order.
//!
//! A tensor whose storage exceeds a single scratchpad can never be pinned at
//! all and is removed from every step (the on-SRAM lifetime rule). If such a
//! tensor is a mandatory input of an accelerator operator, no safe plan
//! exists and validation fails with `PlanInfeasible`.

use std::collections::HashMap;

use crate::config::BackendConfig;
use crate::engine::{PinTable, Schedule};
use crate::engine::liveness::LivenessRecord;
use crate::errors::AnalysisError;
use crate::graph::{Network, TensorId};
use crate::observability::messages::analysis::{PinDropped, TensorNeverPinnable};
use crate::observability::messages::StructuredLog;

/// Prunes a candidate [`PinTable`] against liveness and scratchpad capacity.
pub struct PinValidator<'a> {
    network: &'a Network,
    schedule: &'a Schedule,
    liveness: &'a HashMap<TensorId, LivenessRecord>,
    config: &'a BackendConfig,
}

impl<'a> PinValidator<'a> {
    pub fn new(
        network: &'a Network,
        schedule: &'a Schedule,
        liveness: &'a HashMap<TensorId, LivenessRecord>,
        config: &'a BackendConfig,
    ) -> Self {
        Self {
            network,
            schedule,
            liveness,
            config,
        }
    }

    /// Run both phases. On success the table satisfies, at every step: all
    /// pins live, mandatory inputs present, total pinned bytes within the
    /// writable budget.
    pub fn validate(&self, table: &mut PinTable) -> Result<(), AnalysisError> {
        self.prune_dead_pins(table)?;
        self.prune_capacity(table)
    }

    fn record(&self, tensor: TensorId) -> Result<&LivenessRecord, AnalysisError> {
        self.liveness
            .get(&tensor)
            .ok_or_else(|| AnalysisError::UnknownTensor {
                tensor: self.network.tensor(tensor).name().to_string(),
            })
    }

    fn tensor_bytes(&self, tensor: TensorId) -> u64 {
        self.network.tensor(tensor).storage_bytes()
    }

    /// Phase A: drop any pin claimed outside its tensor's live interval.
    fn prune_dead_pins(&self, table: &mut PinTable) -> Result<(), AnalysisError> {
        for step in 0..table.len() {
            let pinned: Vec<TensorId> = table.pins_at(step).to_vec();
            for tensor in pinned {
                let record = self.record(tensor)?;
                if !record.live_at(step) {
                    PinDropped {
                        tensor: record.name(),
                        step,
                        reason: "outside live interval",
                    }
                    .log();
                    table.remove(step, tensor);
                }
            }
        }
        Ok(())
    }

    /// Phase B: enforce the writable budget at every step.
    fn prune_capacity(&self, table: &mut PinTable) -> Result<(), AnalysisError> {
        let capacity = self.config.spm_capacity;
        let budget = self.config.writable_budget();

        // Mandatory inputs come first; if they alone cannot fit, no amount
        // of pruning rescues the plan.
        for (_, op_id) in self.schedule.iter() {
            let op = self.network.operator(op_id);
            if op.is_host_side() {
                continue;
            }
            let inputs = unique_tensors(op.inputs());
            let mut required = 0u64;
            for &input in &inputs {
                let bytes = self.tensor_bytes(input);
                if bytes > capacity {
                    return Err(AnalysisError::PlanInfeasible {
                        operator: op.name().to_string(),
                        tensor: self.network.tensor(input).name().to_string(),
                        bytes,
                        budget: capacity,
                    });
                }
                required += bytes;
            }
            if required > budget {
                let largest = largest_tensor(self.network, &inputs);
                return Err(AnalysisError::PlanInfeasible {
                    operator: op.name().to_string(),
                    tensor: self.network.tensor(largest).name().to_string(),
                    bytes: required,
                    budget,
                });
            }
        }

        // On-SRAM lifetime rule: a tensor that can never fit in one pad is
        // never pinned, at any step.
        let oversize: Vec<TensorId> = {
            let mut seen = Vec::new();
            for step in 0..table.len() {
                for &tensor in table.pins_at(step) {
                    if self.tensor_bytes(tensor) > capacity && !seen.contains(&tensor) {
                        seen.push(tensor);
                    }
                }
            }
            seen
        };
        for tensor in oversize {
            TensorNeverPinnable {
                tensor: self.network.tensor(tensor).name(),
                bytes: self.tensor_bytes(tensor),
                capacity,
            }
            .log();
            table.remove_everywhere(tensor);
        }

        // Greedy pruning per step: inputs are placed unconditionally, the
        // rest compete in ascending FoMd order (name-tie-broken).
        for step in 0..table.len() {
            let op = self.network.operator(self.schedule.op_at(step));
            let inputs: Vec<TensorId> = if op.is_host_side() {
                Vec::new()
            } else {
                unique_tensors(op.inputs())
            };

            let mut used: u64 = inputs
                .iter()
                .filter(|&&t| table.contains(step, t))
                .map(|&t| self.tensor_bytes(t))
                .sum();

            let mut others: Vec<TensorId> = table
                .pins_at(step)
                .iter()
                .copied()
                .filter(|t| !inputs.contains(t))
                .collect();
            self.sort_by_merit(&mut others)?;

            for tensor in others {
                let bytes = self.tensor_bytes(tensor);
                if used + bytes > budget {
                    PinDropped {
                        tensor: self.network.tensor(tensor).name(),
                        step,
                        reason: "exceeds writable scratchpad budget",
                    }
                    .log();
                    table.remove(step, tensor);
                } else {
                    used += bytes;
                }
            }
        }

        Ok(())
    }

    /// Order candidates by ascending FoMd, then by ascending tensor name.
    /// The ordering is a contract: it decides which of two equally-ranked
    /// candidates survives.
    fn sort_by_merit(&self, tensors: &mut [TensorId]) -> Result<(), AnalysisError> {
        let mut keyed = Vec::with_capacity(tensors.len());
        for &tensor in tensors.iter() {
            let record = self.record(tensor)?;
            keyed.push((record.fomd(), record.name().to_string(), tensor));
        }
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        for (slot, (_, _, tensor)) in keyed.into_iter().enumerate() {
            tensors[slot] = tensor;
        }
        Ok(())
    }
}

/// Distinct tensors of a slot list, preserving first-appearance order.
fn unique_tensors(tensors: &[TensorId]) -> Vec<TensorId> {
    let mut unique = Vec::with_capacity(tensors.len());
    for &tensor in tensors {
        if !unique.contains(&tensor) {
            unique.push(tensor);
        }
    }
    unique
}

fn largest_tensor(network: &Network, tensors: &[TensorId]) -> TensorId {
    let mut largest = tensors[0];
    for &tensor in &tensors[1..] {
        if network.tensor(tensor).storage_bytes() > network.tensor(largest).storage_bytes() {
            largest = tensor;
        }
    }
    largest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::liveness::LivenessBuilder;
    use crate::engine::pin_planner::collect_candidates;
    use crate::engine::topological_schedule;
    use crate::graph::{DataType, OpType, Operator, Tensor, TensorShape};

    fn byte_tensor(net: &mut Network, name: &str, elems: usize) -> TensorId {
        net.add_tensor(Tensor::new(
            name,
            TensorShape::new(vec![elems]),
            DataType::Int8,
        ))
    }

    fn validate(
        net: &Network,
        config: &BackendConfig,
    ) -> Result<(PinTable, Schedule), AnalysisError> {
        let schedule = topological_schedule(net)?;
        let liveness = LivenessBuilder::build(net, &schedule);
        let mut table = collect_candidates(net, &schedule);
        PinValidator::new(net, &schedule, &liveness, config).validate(&mut table)?;
        Ok((table, schedule))
    }

    #[test]
    fn test_dead_pins_are_dropped() {
        // d is only consumed at step 1; it must not survive at step 0
        let mut net = Network::new("dead");
        let a = byte_tensor(&mut net, "a", 128);
        let b = byte_tensor(&mut net, "b", 128);
        let c = byte_tensor(&mut net, "c", 128);
        let d = byte_tensor(&mut net, "d", 128);
        let e = byte_tensor(&mut net, "e", 128);
        net.add_operator(Operator::new("op", OpType::MatrixMultiply, vec![a, b], vec![c]));
        net.add_operator(Operator::new("op2", OpType::MatrixMultiply, vec![c, d], vec![e]));

        let config = BackendConfig::new(512, 3);
        let (table, _) = validate(&net, &config).unwrap();

        assert_eq!(table.pins_at(0), &[a, b]);
        assert_eq!(table.pins_at(1), &[c, d]);
        assert!(table.views_consistent());
    }

    #[test]
    fn test_carried_candidate_dropped_when_budget_is_full() {
        // v is consumed again at step 2, so the planner carries it through
        // step 1. The budget at step 1 is filled by the step's own inputs,
        // leaving no room for the carry-over.
        let mut net = Network::new("competition");
        let x = byte_tensor(&mut net, "x", 100);
        let v = byte_tensor(&mut net, "v", 200);
        let w = byte_tensor(&mut net, "w", 200);
        let y = byte_tensor(&mut net, "y", 100);
        let z = byte_tensor(&mut net, "z", 100);
        let out = byte_tensor(&mut net, "out", 100);
        net.add_operator(Operator::new("first", OpType::MatrixMultiply, vec![x, v], vec![y]));
        net.add_operator(Operator::new("second", OpType::MatrixMultiply, vec![y, w], vec![z]));
        net.add_operator(Operator::new("third", OpType::MatrixMultiply, vec![v, w], vec![out]));

        // budget = 2 * 200 = 400; step 1 inputs y+w use 300, so the
        // 200-byte carry-over of v overflows
        let config = BackendConfig::new(200, 3);
        let (table, _) = validate(&net, &config).unwrap();

        assert!(table.contains(1, y));
        assert!(table.contains(1, w));
        assert!(!table.contains(1, v));
        // v is still mandatory where it is an input
        assert!(table.contains(0, v));
        assert!(table.contains(2, v));
    }

    #[test]
    fn test_fomd_tie_breaks_by_ascending_tensor_name() {
        // u and w have identical FoMd (two uses over a 3-step span). Both
        // are carried through step 2, where only one fits: the name
        // tie-break keeps 'u'.
        let mut net = Network::new("tie");
        let a = byte_tensor(&mut net, "a", 100);
        let b = byte_tensor(&mut net, "b", 100);
        let c = byte_tensor(&mut net, "c", 100);
        let u = byte_tensor(&mut net, "u", 200);
        let w = byte_tensor(&mut net, "w", 200);
        let c2 = byte_tensor(&mut net, "c2", 100);
        let d = byte_tensor(&mut net, "d", 100);
        let e = byte_tensor(&mut net, "e", 100);
        net.add_operator(Operator::new("p0", OpType::Convolution, vec![a], vec![u]));
        net.add_operator(Operator::new("p1", OpType::Convolution, vec![b], vec![w]));
        net.add_operator(Operator::new("p2", OpType::Activation, vec![c], vec![c2]));
        net.add_operator(Operator::new("p3", OpType::MatrixMultiply, vec![u, c2], vec![d]));
        net.add_operator(Operator::new("p4", OpType::MatrixMultiply, vec![w, d], vec![e]));

        let config = BackendConfig::new(200, 3);
        let (table, _) = validate(&net, &config).unwrap();

        // Step 2 holds its own input (100 bytes) and exactly one of the two
        // 200-byte carry-overs within the 400-byte budget
        assert_eq!(table.pins_at(2), &[c, u]);
        assert!(!table.contains(2, w));
    }

    #[test]
    fn test_oversize_tensor_never_pinned_when_not_mandatory() {
        // big is produced at step 0 and consumed at step 2 by a host-side
        // operator, so it is never a mandatory accelerator input
        let mut net = Network::new("oversize");
        let x = byte_tensor(&mut net, "x", 100);
        let big = byte_tensor(&mut net, "big", 2048);
        let y = byte_tensor(&mut net, "y", 100);
        let z = byte_tensor(&mut net, "z", 100);
        let out = byte_tensor(&mut net, "out", 100);
        net.add_operator(Operator::new("produce", OpType::Convolution, vec![x], vec![big]));
        net.add_operator(Operator::new("middle", OpType::Activation, vec![x], vec![y]));
        net.add_operator(Operator::new("reorder_big", OpType::Reorder, vec![big, y], vec![z]));
        net.add_operator(Operator::new("tail", OpType::Activation, vec![z], vec![out]));

        let config = BackendConfig::new(1024, 3);
        let (table, _) = validate(&net, &config).unwrap();

        for step in 0..table.len() {
            assert!(
                !table.contains(step, big),
                "oversize tensor pinned at step {}",
                step
            );
        }
    }

    #[test]
    fn test_oversize_mandatory_input_is_infeasible() {
        let mut net = Network::new("infeasible");
        let x = byte_tensor(&mut net, "x", 2048); // 2 * capacity
        let y = byte_tensor(&mut net, "y", 100);
        net.add_operator(Operator::new("conv", OpType::Convolution, vec![x], vec![y]));

        let config = BackendConfig::new(1024, 3);
        let err = validate(&net, &config).unwrap_err();
        match err {
            AnalysisError::PlanInfeasible {
                operator, tensor, ..
            } => {
                assert_eq!(operator, "conv");
                assert_eq!(tensor, "x");
            }
            other => panic!("expected PlanInfeasible, got {:?}", other),
        }
    }

    #[test]
    fn test_mandatory_inputs_always_survive() {
        let mut net = Network::new("mandatory");
        let a = byte_tensor(&mut net, "a", 512);
        let b = byte_tensor(&mut net, "b", 512);
        let c = byte_tensor(&mut net, "c", 512);
        net.add_operator(Operator::new("mul", OpType::MatrixMultiply, vec![a, b], vec![c]));

        // Inputs exactly fill the writable budget
        let config = BackendConfig::new(512, 3);
        let (table, _) = validate(&net, &config).unwrap();
        assert_eq!(table.pins_at(0), &[a, b]);
    }

    #[test]
    fn test_budget_invariant_holds_at_every_step() {
        let mut net = Network::new("budget");
        let a = byte_tensor(&mut net, "a", 300);
        let b = byte_tensor(&mut net, "b", 300);
        let c = byte_tensor(&mut net, "c", 300);
        let d = byte_tensor(&mut net, "d", 300);
        let e = byte_tensor(&mut net, "e", 300);
        let f = byte_tensor(&mut net, "f", 300);
        net.add_operator(Operator::new("m1", OpType::MatrixMultiply, vec![a, b], vec![c]));
        net.add_operator(Operator::new("m2", OpType::MatrixMultiply, vec![c, d], vec![e]));
        net.add_operator(Operator::new("m3", OpType::MatrixMultiply, vec![a, e], vec![f]));

        let config = BackendConfig::new(400, 3);
        let (table, _) = validate(&net, &config).unwrap();

        let budget = config.writable_budget();
        for step in 0..table.len() {
            let total: u64 = table
                .pins_at(step)
                .iter()
                .map(|&t| net.tensor(t).storage_bytes())
                .sum();
            assert!(
                total <= budget,
                "step {} pins {} bytes, budget {}",
                step,
                total,
                budget
            );
        }
    }
}
