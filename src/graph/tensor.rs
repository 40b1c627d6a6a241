// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tensor handles and their shape/type metadata.
//!
//! Tensors are created once by the graph builder and are immutable afterwards.
//! Identity is the arena index ([`TensorId`]), never the name: two tensors with
//! the same name are still distinct storage.

/// Index of a tensor in the [`Network`](crate::graph::Network) arena.
///
/// Handles are compared by identity, which for an arena representation is
/// simply index equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TensorId(pub usize);

/// Scalar element types with a fixed byte width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int8,
    Float16,
    Float32,
    Int32,
}

impl DataType {
    /// Byte width of a single element.
    pub fn size_bytes(&self) -> u64 {
        match self {
            DataType::Int8 => 1,
            DataType::Float16 => 2,
            DataType::Float32 => 4,
            DataType::Int32 => 4,
        }
    }
}

/// Ordered dimension sizes of a tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorShape(pub Vec<usize>);

impl TensorShape {
    pub fn new(dims: Vec<usize>) -> Self {
        Self(dims)
    }

    /// Number of elements covered by the shape.
    pub fn storage_size(&self) -> u64 {
        self.0.iter().map(|&d| d as u64).product()
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }
}

/// A tensor in the operator graph.
#[derive(Debug, Clone)]
pub struct Tensor {
    name: String,
    shape: TensorShape,
    data_type: DataType,
}

impl Tensor {
    pub fn new(name: impl Into<String>, shape: TensorShape, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            shape,
            data_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Total storage footprint in bytes: `product(shape) * elementBytes`.
    pub fn storage_bytes(&self) -> u64 {
        self.shape.storage_size() * self.data_type.size_bytes()
    }
}
