// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runtime-facing pin lookups.
//!
//! At dispatch time the runtime knows operator names and input tensor
//! handles, not planner state. The `SpmManager` is a snapshot of a validated
//! plan answering exactly those lookups. It is instance state handed to the
//! runtime explicitly; the planner keeps no process-wide maps.

use std::collections::HashMap;

use crate::config::BackendConfig;
use crate::engine::{PinTable, Schedule};
use crate::graph::{Network, TensorId};

/// Snapshot of a validated plan for runtime consumption.
#[derive(Debug, Clone)]
pub struct SpmManager {
    pins_by_name: HashMap<String, Vec<TensorId>>,
    spm_ids: HashMap<TensorId, usize>,
    offsets: HashMap<TensorId, u64>,
}

impl SpmManager {
    /// Build the lookup tables from a validated pin table.
    ///
    /// Scratchpad ids follow the initial slot assignment: input slot `k`
    /// lands on pad `k`, outputs on the reserved output pad. A tensor keeps
    /// the pad where it first appears. All offsets are zero in the initial
    /// layout.
    pub fn from_plan(
        network: &Network,
        schedule: &Schedule,
        table: &PinTable,
        config: &BackendConfig,
    ) -> Self {
        let output_pad = config.output_pad();
        let mut spm_ids: HashMap<TensorId, usize> = HashMap::new();
        let mut offsets: HashMap<TensorId, u64> = HashMap::new();

        for (_, op_id) in schedule.iter() {
            let op = network.operator(op_id);
            if op.is_host_side() {
                continue;
            }
            for (slot, &input) in op.inputs().iter().take(output_pad).enumerate() {
                spm_ids.entry(input).or_insert(slot);
                offsets.entry(input).or_insert(0);
            }
            for &output in op.outputs() {
                spm_ids.entry(output).or_insert(output_pad);
                offsets.entry(output).or_insert(0);
            }
        }

        Self {
            pins_by_name: table.by_name().clone(),
            spm_ids,
            offsets,
        }
    }

    /// Which of `inputs` are already resident when `op_name` dispatches.
    /// These need no DMA transfer.
    pub fn pinned_inputs(&self, op_name: &str, inputs: &[TensorId]) -> Vec<TensorId> {
        match self.pins_by_name.get(op_name) {
            Some(pinned) => inputs
                .iter()
                .copied()
                .filter(|t| pinned.contains(t))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Scratchpad a tensor is staged on, if it ever touches one.
    pub fn spm_id(&self, tensor: TensorId) -> Option<usize> {
        self.spm_ids.get(&tensor).copied()
    }

    /// Byte offset of a tensor inside its scratchpad.
    pub fn spm_offset(&self, tensor: TensorId) -> Option<u64> {
        self.offsets.get(&tensor).copied()
    }
}
