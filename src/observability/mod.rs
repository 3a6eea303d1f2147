// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for the diagnostic and
//! operational logging emitted while a run drives its graph. Message types
//! follow a struct-based pattern with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Enable future internationalization without code changes
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - run lifecycle and per-task completion events
//! * `messages::worker` - worker submission, panics, and drain events
//!
//! Messages are diagnostics, not contract: the executor's behavior never
//! depends on whether a subscriber is installed.
//!
//! # Usage
//!
//! ```rust
//! use dagrun::observability::messages::engine::RunFailed;
//!
//! let msg = RunFailed { message: "task failed" };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;
