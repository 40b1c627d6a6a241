// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-step scratchpad occupancy bookkeeping.
//!
//! The timeline records, for every schedule step, how full each scratchpad
//! is under the initial slot assignment: input slot 0 on pad 0, input slot 1
//! on pad 1, the output on the last pad. This is the state of the world
//! before any pinning, and it is what the ILP matrices encode.

use crate::config::BackendConfig;
use crate::engine::Schedule;
use crate::graph::Network;

/// Remaining-capacity snapshot of one scratchpad at one schedule step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpmStatus {
    pub bytes_used: u64,
    pub bytes_free: u64,
    /// Whether this pad is the reserved output pad.
    pub is_output: bool,
}

impl SpmStatus {
    /// An empty pad.
    pub fn vacant(capacity: u64, is_output: bool) -> Self {
        Self {
            bytes_used: 0,
            bytes_free: capacity,
            is_output,
        }
    }

    /// A pad holding `bytes`. Oversized occupants clamp to the capacity,
    /// leaving zero bytes free.
    pub fn occupied(capacity: u64, bytes: u64, is_output: bool) -> Self {
        let bytes_used = bytes.min(capacity);
        Self {
            bytes_used,
            bytes_free: capacity - bytes_used,
            is_output,
        }
    }
}

/// Build the per-step, per-pad occupancy timeline for the initial slot
/// assignment. Host-side operators occupy no pads.
pub fn build_timeline(
    network: &Network,
    schedule: &Schedule,
    config: &BackendConfig,
) -> Vec<Vec<SpmStatus>> {
    let capacity = config.spm_capacity;
    let output_pad = config.output_pad();

    let mut timeline = Vec::with_capacity(schedule.len());
    for (_, op_id) in schedule.iter() {
        let op = network.operator(op_id);
        let mut pads: Vec<SpmStatus> = (0..config.spm_count)
            .map(|pad| SpmStatus::vacant(capacity, pad == output_pad))
            .collect();

        if !op.is_host_side() {
            for (slot, &input) in op.inputs().iter().take(output_pad).enumerate() {
                let bytes = network.tensor(input).storage_bytes();
                pads[slot] = SpmStatus::occupied(capacity, bytes, false);
            }
            for &output in op.outputs() {
                let bytes = network.tensor(output).storage_bytes();
                pads[output_pad] = SpmStatus::occupied(capacity, bytes, true);
            }
        }
        timeline.push(pads);
    }
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::topological_schedule;
    use crate::graph::{DataType, OpType, Operator, Tensor, TensorShape};

    #[test]
    fn test_occupied_clamps_to_capacity() {
        let status = SpmStatus::occupied(1024, 4096, false);
        assert_eq!(status.bytes_used, 1024);
        assert_eq!(status.bytes_free, 0);
    }

    #[test]
    fn test_timeline_places_slots_on_their_pads() {
        let mut net = Network::new("two_input");
        let a = net.add_tensor(Tensor::new("a", TensorShape::new(vec![100]), DataType::Int8));
        let b = net.add_tensor(Tensor::new("b", TensorShape::new(vec![200]), DataType::Int8));
        let c = net.add_tensor(Tensor::new("c", TensorShape::new(vec![300]), DataType::Int8));
        net.add_operator(Operator::new("mul", OpType::MatrixMultiply, vec![a, b], vec![c]));

        let schedule = topological_schedule(&net).unwrap();
        let config = BackendConfig::new(1024, 3);
        let timeline = build_timeline(&net, &schedule, &config);

        assert_eq!(timeline.len(), 1);
        let pads = &timeline[0];
        assert_eq!(pads[0], SpmStatus::occupied(1024, 100, false));
        assert_eq!(pads[1], SpmStatus::occupied(1024, 200, false));
        assert_eq!(pads[2], SpmStatus::occupied(1024, 300, true));
        assert!(pads[2].is_output);
    }

    #[test]
    fn test_host_side_steps_leave_pads_vacant() {
        let mut net = Network::new("host");
        let raw = net.add_tensor(Tensor::new("raw", TensorShape::new(vec![64]), DataType::Int8));
        let out = net.add_tensor(Tensor::new("out", TensorShape::new(vec![64]), DataType::Int8));
        net.add_operator(Operator::new("reorder_1", OpType::Reorder, vec![raw], vec![out]));

        let schedule = topological_schedule(&net).unwrap();
        let config = BackendConfig::new(1024, 3);
        let timeline = build_timeline(&net, &schedule, &config);

        for pad in &timeline[0] {
            assert_eq!(pad.bytes_used, 0);
            assert_eq!(pad.bytes_free, 1024);
        }
    }
}
