// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Arena-backed operator DAG.
//!
//! Operators and tensors live in contiguous vectors; edges are `(srcIdx,
//! dstIdx)` pairs recorded in insertion order. Replacing pointer-keyed
//! adjacency with arena indices keeps identity comparisons trivial and makes
//! every traversal deterministic, which the scheduler's tie-break contract
//! depends on.
//!
//! Data edges are wired automatically: adding an operator creates one edge
//! from the producer of each of its input tensors. [`Network::add_edge`] adds
//! explicit control edges on top for graphs the builder cannot express through
//! producers alone.

use std::collections::HashMap;

use crate::graph::{OpId, Operator, Tensor, TensorId};

/// The operator graph consumed by the analyzer.
#[derive(Debug, Clone, Default)]
pub struct Network {
    name: String,
    operators: Vec<Operator>,
    tensors: Vec<Tensor>,
    /// Producer-to-consumer edges in insertion order.
    edges: Vec<(OpId, OpId)>,
    /// The operator (if any) that produces each tensor as an output.
    producers: HashMap<TensorId, OpId>,
}

impl Network {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a tensor and return its arena handle.
    pub fn add_tensor(&mut self, tensor: Tensor) -> TensorId {
        let id = TensorId(self.tensors.len());
        self.tensors.push(tensor);
        id
    }

    /// Append an operator, wiring a data edge from the producer of each of
    /// its inputs. The returned id doubles as the insertion rank.
    pub fn add_operator(&mut self, op: Operator) -> OpId {
        let id = OpId(self.operators.len());
        for input in op.inputs() {
            if let Some(&producer) = self.producers.get(input) {
                self.edges.push((producer, id));
            }
        }
        for output in op.outputs() {
            self.producers.insert(*output, id);
        }
        self.operators.push(op);
        id
    }

    /// Add an explicit dependency edge between two operators.
    pub fn add_edge(&mut self, src: OpId, dst: OpId) {
        self.edges.push((src, dst));
    }

    pub fn operator(&self, id: OpId) -> &Operator {
        &self.operators[id.0]
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn tensor(&self, id: TensorId) -> &Tensor {
        &self.tensors[id.0]
    }

    pub fn tensors(&self) -> &[Tensor] {
        &self.tensors
    }

    pub fn op_count(&self) -> usize {
        self.operators.len()
    }

    pub fn tensor_count(&self) -> usize {
        self.tensors.len()
    }

    pub fn edges(&self) -> &[(OpId, OpId)] {
        &self.edges
    }

    /// Operator that produces `tensor`, if any. Graph inputs have none.
    pub fn producer_of(&self, tensor: TensorId) -> Option<OpId> {
        self.producers.get(&tensor).copied()
    }

    /// Number of incoming edges, counted per edge.
    pub fn in_degree(&self, id: OpId) -> usize {
        self.edges.iter().filter(|(_, dst)| *dst == id).count()
    }

    /// Downstream operators of `id` in edge insertion order.
    pub fn successors(&self, id: OpId) -> impl Iterator<Item = OpId> + '_ {
        self.edges
            .iter()
            .filter(move |(src, _)| *src == id)
            .map(|&(_, dst)| dst)
    }

    /// Graph insertion order of all operators.
    pub fn build_order(&self) -> impl Iterator<Item = OpId> {
        (0..self.operators.len()).map(OpId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DataType, OpType, TensorShape};

    fn byte_tensor(net: &mut Network, name: &str, elems: usize) -> TensorId {
        net.add_tensor(Tensor::new(
            name,
            TensorShape::new(vec![elems]),
            DataType::Int8,
        ))
    }

    #[test]
    fn test_data_edges_follow_producers() {
        // a -> op1 -> b -> op2 -> c
        let mut net = Network::new("chain");
        let a = byte_tensor(&mut net, "a", 16);
        let b = byte_tensor(&mut net, "b", 16);
        let c = byte_tensor(&mut net, "c", 16);

        let op1 = net.add_operator(Operator::new("op1", OpType::Activation, vec![a], vec![b]));
        let op2 = net.add_operator(Operator::new("op2", OpType::Activation, vec![b], vec![c]));

        assert_eq!(net.edges(), &[(op1, op2)]);
        assert_eq!(net.in_degree(op1), 0);
        assert_eq!(net.in_degree(op2), 1);
        assert_eq!(net.producer_of(b), Some(op1));
        assert_eq!(net.producer_of(a), None);
    }

    #[test]
    fn test_successors_preserve_insertion_order() {
        let mut net = Network::new("fanout");
        let src = byte_tensor(&mut net, "src", 8);
        let l = byte_tensor(&mut net, "l", 8);
        let r = byte_tensor(&mut net, "r", 8);

        let producer =
            net.add_operator(Operator::new("producer", OpType::Data, vec![], vec![src]));
        let left = net.add_operator(Operator::new("left", OpType::Pooling, vec![src], vec![l]));
        let right = net.add_operator(Operator::new("right", OpType::Pooling, vec![src], vec![r]));

        let succs: Vec<OpId> = net.successors(producer).collect();
        assert_eq!(succs, vec![left, right]);
    }

    #[test]
    fn test_shared_producer_counts_one_edge_per_input() {
        let mut net = Network::new("alias");
        let x = byte_tensor(&mut net, "x", 8);
        let y = byte_tensor(&mut net, "y", 8);

        let producer = net.add_operator(Operator::new("producer", OpType::Data, vec![], vec![x]));
        let consumer =
            net.add_operator(Operator::new("square", OpType::EltwiseAdd, vec![x, x], vec![y]));

        // Both input slots read the same tensor: two parallel edges
        assert_eq!(net.edges(), &[(producer, consumer), (producer, consumer)]);
        assert_eq!(net.in_degree(consumer), 2);
    }
}
