// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod network;
mod operator;
mod tensor;

pub use network::Network;
pub use operator::{OpId, OpType, Operator};
pub use tensor::{DataType, Tensor, TensorId, TensorShape};
