// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process backtracking search over scratchpad assignments.
//!
//! The mapper is the alternative to handing the occupancy matrices to an
//! external ILP solver: a depth-first search that assigns each step's two
//! input slots and one output slot to distinct scratchpads, trying to keep
//! outputs resident on the pad a downstream consumer will read them from.
//!
//! The search is bounded in the worst case by the pair enumeration at every
//! step, but the capacity check prunes branches early in practice. The
//! enumeration order is fixed, so the result is deterministic.

use crate::observability::messages::analysis::MappingCompleted;
use crate::observability::messages::StructuredLog;

/// Number of scratchpads the search enumerates over. With three pads the id
/// left over by a distinct input pair is `0 + 1 + 2 - a - b`.
const PAD_COUNT: usize = 3;
const PAD_ID_SUM: usize = 3;

/// A complete per-step scratchpad assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpmAssignment {
    /// Scratchpad ids of the two input slots, per step.
    pub inputs: Vec<(usize, usize)>,
    /// Scratchpad id of the output slot, per step.
    pub outputs: Vec<usize>,
    /// Number of pinned outputs the assignment achieves.
    pub pinned_outputs: u32,
}

#[derive(Debug, Clone)]
struct SearchState {
    in_assign: Vec<(usize, usize)>,
    out_assign: Vec<usize>,
    /// Steps whose output pad was fixed by an upstream reuse decision.
    forced: Vec<bool>,
}

/// Backtracking scratchpad mapper.
///
/// Inputs are plain per-step size tables plus the reuse relation
/// `step -> downstream steps consuming the step's output`, so the mapper is
/// independent of the graph representation.
pub struct SpmMapper {
    capacity: u64,
    input_sizes: Vec<Vec<u64>>,
    output_sizes: Vec<u64>,
    reuse_edges: Vec<Vec<usize>>,
}

impl SpmMapper {
    pub fn new(
        capacity: u64,
        input_sizes: Vec<Vec<u64>>,
        output_sizes: Vec<u64>,
        reuse_edges: Vec<Vec<usize>>,
    ) -> Self {
        Self {
            capacity,
            input_sizes,
            output_sizes,
            reuse_edges,
        }
    }

    fn len(&self) -> usize {
        self.output_sizes.len()
    }

    fn input_size(&self, step: usize, slot: usize) -> u64 {
        self.input_sizes
            .get(step)
            .and_then(|slots| slots.get(slot))
            .copied()
            .unwrap_or(0)
    }

    /// Run the search and return the best assignment found.
    ///
    /// Every step starts from the canonical layout (inputs on pads 0 and 1,
    /// output on pad 2); steps the search never constrains keep it. The
    /// returned assignment always has three distinct pads per step and
    /// respects the capacity at every step of every reuse interval.
    pub fn solve(&self) -> SpmAssignment {
        let steps = self.len();
        let mut state = SearchState {
            in_assign: vec![(0, 1); steps],
            out_assign: vec![2; steps],
            forced: vec![false; steps],
        };
        let pinned_outputs = self.search(0, &mut state);

        MappingCompleted {
            steps,
            pinned_outputs,
        }
        .log();

        SpmAssignment {
            inputs: state.in_assign,
            outputs: state.out_assign,
            pinned_outputs,
        }
    }

    /// Depth-first over steps in schedule order. Returns the best pin count
    /// achievable from `step` onward; on return, `state` holds the
    /// assignments of that best branch.
    fn search(&self, step: usize, state: &mut SearchState) -> u32 {
        if step >= self.len() {
            return 0;
        }

        let entry_state = state.clone();
        let mut best = 0u32;
        let mut best_state: Option<SearchState> = None;

        for a in 0..PAD_COUNT {
            for b in 0..PAD_COUNT {
                if a == b {
                    continue;
                }
                let out = PAD_ID_SUM - a - b;
                // An upstream reuse decision may already have fixed our
                // output pad; only pairs consistent with it keep the
                // distinct-per-step contract.
                if state.forced[step] && state.out_assign[step] != out {
                    continue;
                }

                state.in_assign[step] = (a, b);
                if !state.forced[step] {
                    state.out_assign[step] = out;
                }

                let mut gained = 0u32;
                let mut feasible = true;
                for &consumer in &self.reuse_edges[step] {
                    if state.forced[consumer] && state.out_assign[consumer] != out {
                        feasible = false;
                        break;
                    }
                    state.out_assign[consumer] = out;
                    state.forced[consumer] = true;
                    if !self.fits_through(step, consumer, out, state) {
                        feasible = false;
                        break;
                    }
                    gained += 1;
                }

                if feasible {
                    let total = gained + self.search(step + 1, state);
                    if total > best {
                        best = total;
                        best_state = Some(state.clone());
                    }
                }

                *state = entry_state.clone();
            }
        }

        if let Some(winner) = best_state {
            *state = winner;
        }
        best
    }

    /// Check that keeping `step`'s output resident on `pad` until `consumer`
    /// runs overflows no scratchpad anywhere in the interval.
    fn fits_through(
        &self,
        step: usize,
        consumer: usize,
        pad: usize,
        state: &SearchState,
    ) -> bool {
        let pinned = self.output_sizes[step];
        if pinned > self.capacity {
            return false;
        }
        for mid in step + 1..consumer {
            for spm in 0..PAD_COUNT {
                let mut occupied = if spm == pad { pinned } else { 0 };
                let (slot0, slot1) = state.in_assign[mid];
                // Each resident size counts once per slot it occupies
                if slot0 == spm {
                    occupied += self.input_size(mid, 0);
                }
                if slot1 == spm {
                    occupied += self.input_size(mid, 1);
                }
                if state.out_assign[mid] == spm {
                    occupied += self.output_sizes[mid];
                }
                if occupied > self.capacity {
                    return false;
                }
            }
        }
        true
    }
}
