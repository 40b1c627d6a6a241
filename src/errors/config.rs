// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur during backend configuration validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The per-scratchpad capacity is zero
    ZeroCapacity,
    /// The scratchpad count is not the layout this planner supports
    UnsupportedPadCount {
        /// The configured number of scratchpads
        requested: usize,
        /// The number the slot layout and mapper are built for
        supported: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => {
                write!(f, "Scratchpad capacity must be non-zero")
            }
            ConfigError::UnsupportedPadCount {
                requested,
                supported,
            } => {
                write!(
                    f,
                    "Backend declares {} scratchpads but the planner's slot layout supports exactly {}",
                    requested, supported
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
