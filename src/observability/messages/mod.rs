// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging and tracing.
//!
//! Each message type implements:
//!
//! * `Display` - Human-readable output (supports future i18n)
//! * `StructuredLog` - Machine-readable fields + span creation
//!
//! # Organization
//!
//! * `analysis` - scheduling, liveness and pin-planning events
//! * `artifact` - ILP artifact emission events
//!
//! # Usage Patterns
//!
//! ## Basic Logging (Human-Readable)
//! ```rust
//! use spadplan::observability::messages::analysis::ScheduleBuilt;
//!
//! tracing::info!("{}", ScheduleBuilt { steps: 12 });
//! ```
//!
//! ## Structured Logging (Machine-Readable)
//! ```rust
//! use spadplan::observability::messages::{StructuredLog, analysis::ScheduleBuilt};
//!
//! // Emits both the human-readable message AND structured fields
//! ScheduleBuilt { steps: 12 }.log();
//! ```

pub mod analysis;
pub mod artifact;

use tracing::Span;

/// Trait for messages that support structured logging and tracing.
///
/// `log()` emits an event carrying both the `Display` rendering and the
/// message's fields; `span()` creates a `tracing::Span` with the fields as
/// attributes so nested work inherits the context.
pub trait StructuredLog {
    /// Emit a log event with structured fields.
    ///
    /// The appropriate log level (info, warn, error) is determined by the
    /// message type's semantic meaning.
    fn log(&self);

    /// Create a span with this message's fields as attributes.
    fn span(&self, name: &str) -> Span;
}
