// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging and distributed tracing.
//!
//! Each message type implements:
//!
//! * `Display` - Human-readable output (supports future i18n)
//! * `StructuredLog` - Machine-readable fields + span creation
//!
//! # Organization
//!
//! * `engine` - run lifecycle and per-task completion events
//! * `worker` - worker submission, panics, and drain events
//!
//! # Usage Patterns
//!
//! ## Basic Logging (Human-Readable)
//! ```rust
//! use dagrun::observability::messages::engine::RunStarted;
//!
//! let msg = RunStarted {
//!     node_count: 5,
//!     worker_count: 4,
//! };
//!
//! tracing::info!("{}", msg);
//! ```
//!
//! ## Structured Logging (Machine-Readable)
//! ```rust
//! use dagrun::observability::messages::{StructuredLog, engine::RunStarted};
//!
//! // Emits both human-readable message AND structured fields
//! RunStarted {
//!     node_count: 5,
//!     worker_count: 4,
//! }.log();
//! ```

pub mod engine;
pub mod worker;

use tracing::Span;

/// Trait for messages that support structured logging and tracing.
///
/// `log` emits an event carrying both the human-readable message (via
/// `Display`) and the message's fields in machine-readable form, at the log
/// level matching the message's semantic meaning. `span` creates a
/// `tracing::Span` with the same fields as attributes for callers that want
/// the event's context to wrap surrounding work.
pub trait StructuredLog {
    /// Emit a log event with structured fields.
    fn log(&self);

    /// Create a span with this message's fields as attributes.
    ///
    /// # Arguments
    /// * `name` - The span name (e.g., "run", "task_completion")
    fn span(&self, name: &str) -> Span;
}
