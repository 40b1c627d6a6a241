// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::graph::Operator;

/// Pre-scheduling tiling hook.
///
/// Kernel implementations and their tiling strategies live outside this
/// crate. The analyzer invokes the hook exactly once per operator, in graph
/// insertion order, before building the schedule.
pub trait Tiler {
    fn tile(&mut self, op: &Operator);
}

/// A tiler that does nothing. Used for dry runs and in tests, where the
/// planner's output does not depend on tiling at all.
#[derive(Debug, Default)]
pub struct NoopTiler;

impl Tiler for NoopTiler {
    fn tile(&mut self, _op: &Operator) {}
}
