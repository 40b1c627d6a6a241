// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Initial pin-candidate collection.
//!
//! The planner walks the schedule in reverse. At step `i` the tensors
//! required as inputs were produced by earlier steps; if an earlier step's
//! output is already resident, the DMA for the current step's input is
//! avoided. Walking right-to-left propagates that downstream demand backward:
//! whatever a later step expects resident, every intervening step must keep
//! resident too.
//!
//! The result is a superset of what can actually be pinned; the validator
//! prunes it against liveness and capacity.

use crate::engine::{PinTable, Schedule};
use crate::graph::Network;

/// Build the initial (upper-bound) pin table.
///
/// For each step, from the last to the first:
/// 1. Pin every input of the step's operator, unless the operator is
///    host-side - `reorder*`/`data*` operators move nothing into the
///    scratchpads, so they never cause pinning.
/// 2. Copy forward every tensor the next step expects resident, except the
///    tensor this step itself produces: nothing can be resident at the start
///    of the step that creates it.
pub fn collect_candidates(network: &Network, schedule: &Schedule) -> PinTable {
    let op_names: Vec<String> = schedule
        .iter()
        .map(|(_, op_id)| network.operator(op_id).name().to_string())
        .collect();
    let mut table = PinTable::new(op_names);

    let steps = schedule.len();
    for step in (0..steps).rev() {
        let op = network.operator(schedule.op_at(step));

        if !op.is_host_side() {
            for &input in op.inputs() {
                table.insert(step, input);
            }
        }

        if step + 1 < steps {
            let expected_later: Vec<_> = table.pins_at(step + 1).to_vec();
            for tensor in expected_later {
                if op.outputs().contains(&tensor) {
                    continue;
                }
                table.insert(step, tensor);
            }
        }
    }

    table
}
