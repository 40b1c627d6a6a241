// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Operators: nodes of the dataflow graph.

use crate::config::consts::HOST_OP_PREFIXES;
use crate::graph::TensorId;

/// Index of an operator in the [`Network`](crate::graph::Network) arena.
///
/// Arena indices double as the graph insertion order, which is what the
/// scheduler's deterministic tie-break is defined over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpId(pub usize);

/// Kind of computation an operator performs.
///
/// Kernels themselves live outside this crate; the planner only needs the
/// kind for diagnostics and for telling host-side data movement apart from
/// accelerator work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpType {
    Data,
    Reorder,
    Convolution,
    MatrixMultiply,
    Pooling,
    BatchNorm,
    Activation,
    EltwiseAdd,
}

impl OpType {
    pub fn name(&self) -> &'static str {
        match self {
            OpType::Data => "Data",
            OpType::Reorder => "Reorder",
            OpType::Convolution => "Convolution",
            OpType::MatrixMultiply => "MatrixMultiply",
            OpType::Pooling => "Pooling",
            OpType::BatchNorm => "BatchNorm",
            OpType::Activation => "Activation",
            OpType::EltwiseAdd => "EltwiseAdd",
        }
    }
}

/// A node in the operator DAG.
///
/// Operators carry at most two input tensors and exactly one output tensor;
/// the pin planner relies on that slot layout. They are created by the graph
/// builder and immutable thereafter.
#[derive(Debug, Clone)]
pub struct Operator {
    name: String,
    op_type: OpType,
    inputs: Vec<TensorId>,
    outputs: Vec<TensorId>,
}

impl Operator {
    pub fn new(
        name: impl Into<String>,
        op_type: OpType,
        inputs: Vec<TensorId>,
        outputs: Vec<TensorId>,
    ) -> Self {
        Self {
            name: name.into(),
            op_type,
            inputs,
            outputs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn op_type(&self) -> OpType {
        self.op_type
    }

    pub fn inputs(&self) -> &[TensorId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TensorId] {
        &self.outputs
    }

    /// Host-side operators (`reorder*`, `data*`) run on the CPU and never
    /// move anything into a scratchpad, so they never cause pinning.
    pub fn is_host_side(&self) -> bool {
        HOST_OP_PREFIXES
            .iter()
            .any(|prefix| self.name.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_side_detection_by_name_prefix() {
        let data = Operator::new("data_1", OpType::Data, vec![], vec![TensorId(0)]);
        let reorder = Operator::new(
            "reorder_1",
            OpType::Reorder,
            vec![TensorId(0)],
            vec![TensorId(1)],
        );
        let matmul = Operator::new(
            "mat_mul_3",
            OpType::MatrixMultiply,
            vec![TensorId(0), TensorId(1)],
            vec![TensorId(2)],
        );

        assert!(data.is_host_side());
        assert!(reorder.is_host_side());
        assert!(!matmul.is_host_side());
    }

    #[test]
    fn test_prefix_must_lead_the_name() {
        // "data" buried inside a name does not make an operator host-side
        let op = Operator::new(
            "conv_data_path",
            OpType::Convolution,
            vec![TensorId(0)],
            vec![TensorId(1)],
        );
        assert!(!op.is_host_side());
    }
}
