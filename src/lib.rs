// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // backend constants + config loading
pub mod engine;     // scheduling and pin-planning passes
pub mod errors;     // error handling
pub mod graph;      // operator/tensor arena
pub mod observability;
pub mod traits;     // tiling seam
