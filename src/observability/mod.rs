// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging in the planner. Message types follow a struct-based
//! pattern with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Enable future internationalization without code changes
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::analysis` - scheduling, liveness and pin-planning events
//! * `messages::artifact` - ILP artifact emission events
//!
//! # Usage
//!
//! ```rust
//! use spadplan::observability::messages::analysis::ScheduleBuilt;
//!
//! let msg = ScheduleBuilt { steps: 12 };
//! tracing::info!("{}", msg);
//! ```

pub mod messages;
