// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The pin table: which tensors are expected resident at each schedule step.
//!
//! The table keeps two views of the same assignment: one indexed by schedule
//! step (what the planner works with) and one keyed by operator name (what
//! the runtime looks up at dispatch time, when operator identities are no
//! longer available). Every mutation goes through the helpers below so the
//! views can never drift apart.

use std::collections::HashMap;

use crate::graph::TensorId;

/// Dual-view mapping from schedule position to pinned tensors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinTable {
    /// Operator name executing at each step.
    op_names: Vec<String>,
    /// Step-indexed view: tensors expected resident at each step, in the
    /// order the planner selected them.
    by_step: Vec<Vec<TensorId>>,
    /// Name-keyed view of the same lists.
    by_name: HashMap<String, Vec<TensorId>>,
}

impl PinTable {
    /// Create an empty table over a schedule described by its operator names.
    pub fn new(op_names: Vec<String>) -> Self {
        let by_step = vec![Vec::new(); op_names.len()];
        let by_name = op_names
            .iter()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        Self {
            op_names,
            by_step,
            by_name,
        }
    }

    /// Number of schedule steps covered.
    pub fn len(&self) -> usize {
        self.by_step.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_step.is_empty()
    }

    pub fn op_name(&self, step: usize) -> &str {
        &self.op_names[step]
    }

    /// Tensors pinned at `step`, in selection order.
    pub fn pins_at(&self, step: usize) -> &[TensorId] {
        &self.by_step[step]
    }

    /// Tensors pinned for the operator named `op_name`.
    pub fn pins_for(&self, op_name: &str) -> Option<&[TensorId]> {
        self.by_name.get(op_name).map(|v| v.as_slice())
    }

    /// The full step-indexed view.
    pub fn by_step(&self) -> &[Vec<TensorId>] {
        &self.by_step
    }

    /// The full name-keyed view.
    pub fn by_name(&self) -> &HashMap<String, Vec<TensorId>> {
        &self.by_name
    }

    pub fn contains(&self, step: usize, tensor: TensorId) -> bool {
        self.by_step[step].contains(&tensor)
    }

    /// Total number of pin entries across all steps.
    pub fn total_pins(&self) -> usize {
        self.by_step.iter().map(|pins| pins.len()).sum()
    }

    /// Add `tensor` to `step` unless it is already pinned there. Both views
    /// are updated together.
    pub fn insert(&mut self, step: usize, tensor: TensorId) {
        if self.by_step[step].contains(&tensor) {
            return;
        }
        self.by_step[step].push(tensor);
        if let Some(named) = self.by_name.get_mut(&self.op_names[step]) {
            named.push(tensor);
        }
    }

    /// Remove `tensor` from `step` in both views.
    pub fn remove(&mut self, step: usize, tensor: TensorId) {
        self.by_step[step].retain(|&t| t != tensor);
        if let Some(named) = self.by_name.get_mut(&self.op_names[step]) {
            named.retain(|&t| t != tensor);
        }
    }

    /// Remove every occurrence of `tensor` across all steps.
    pub fn remove_everywhere(&mut self, tensor: TensorId) {
        for step in 0..self.by_step.len() {
            self.remove(step, tensor);
        }
    }

    /// Check the cross-view invariant: both views agree element-wise for
    /// every step.
    pub fn views_consistent(&self) -> bool {
        self.by_step.iter().enumerate().all(|(step, pins)| {
            self.by_name
                .get(&self.op_names[step])
                .map(|named| named == pins)
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PinTable {
        PinTable::new(vec!["op1".to_string(), "op2".to_string()])
    }

    #[test]
    fn test_insert_updates_both_views() {
        let mut t = table();
        t.insert(0, TensorId(3));
        t.insert(0, TensorId(7));

        assert_eq!(t.pins_at(0), &[TensorId(3), TensorId(7)]);
        assert_eq!(t.pins_for("op1"), Some(&[TensorId(3), TensorId(7)][..]));
        assert!(t.views_consistent());
    }

    #[test]
    fn test_insert_is_idempotent_per_step() {
        let mut t = table();
        t.insert(1, TensorId(5));
        t.insert(1, TensorId(5));
        assert_eq!(t.pins_at(1), &[TensorId(5)]);
        assert!(t.views_consistent());
    }

    #[test]
    fn test_remove_updates_both_views() {
        let mut t = table();
        t.insert(0, TensorId(1));
        t.insert(0, TensorId(2));
        t.remove(0, TensorId(1));

        assert_eq!(t.pins_at(0), &[TensorId(2)]);
        assert_eq!(t.pins_for("op1"), Some(&[TensorId(2)][..]));
        assert!(t.views_consistent());
    }

    #[test]
    fn test_remove_everywhere() {
        let mut t = table();
        t.insert(0, TensorId(9));
        t.insert(1, TensorId(9));
        t.insert(1, TensorId(4));
        t.remove_everywhere(TensorId(9));

        assert!(t.pins_at(0).is_empty());
        assert_eq!(t.pins_at(1), &[TensorId(4)]);
        assert!(t.views_consistent());
    }

    #[test]
    fn test_total_pins_counts_every_step() {
        let mut t = table();
        t.insert(0, TensorId(1));
        t.insert(1, TensorId(1));
        t.insert(1, TensorId(2));
        assert_eq!(t.total_pins(), 3);
    }
}
