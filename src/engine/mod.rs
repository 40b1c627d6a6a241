// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod analyzer;
pub mod ilp;
pub mod liveness;
pub mod pin_planner;
pub mod pin_table;
pub mod pin_validator;
pub mod scheduler;
pub mod spm_manager;
pub mod spm_mapper;
pub mod spm_status;

pub use analyzer::GraphAnalyzer;
pub use ilp::{IlpArtifacts, IlpMatrixEmitter};
pub use liveness::{LivenessBuilder, LivenessRecord};
pub use pin_planner::collect_candidates;
pub use pin_table::PinTable;
pub use pin_validator::PinValidator;
pub use scheduler::{topological_schedule, Schedule};
pub use spm_manager::SpmManager;
pub use spm_mapper::{SpmAssignment, SpmMapper};
pub use spm_status::SpmStatus;
