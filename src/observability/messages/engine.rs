// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for run lifecycle and per-task completion events.
//!
//! This module contains message types for logging events related to:
//! * Run start, completion, and failure
//! * Individual task completions and failures observed by the driver loop

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A run started over a freshly constructed graph.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use dagrun::observability::messages::engine::RunStarted;
///
/// let msg = RunStarted {
///     node_count: 5,
///     worker_count: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted {
    pub node_count: usize,
    pub worker_count: usize,
}

impl Display for RunStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting run: {} nodes, worker pool width {}",
            self.node_count, self.worker_count
        )
    }
}

impl StructuredLog for RunStarted {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            worker_count = self.worker_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run",
            span_name = name,
            node_count = self.node_count,
            worker_count = self.worker_count,
        )
    }
}

/// A run drained its graph and completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use dagrun::observability::messages::engine::RunCompleted;
/// use std::time::Duration;
///
/// let msg = RunCompleted {
///     tasks_run: 5,
///     duration: Duration::from_millis(250),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunCompleted {
    pub tasks_run: usize,
    pub duration: std::time::Duration,
}

impl Display for RunCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Run completed: {} tasks in {:?}",
            self.tasks_run, self.duration
        )
    }
}

impl StructuredLog for RunCompleted {
    fn log(&self) {
        tracing::info!(
            tasks_run = self.tasks_run,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run_completed",
            span_name = name,
            tasks_run = self.tasks_run,
            duration = ?self.duration,
        )
    }
}

/// A run was abandoned after its first failure.
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use dagrun::observability::messages::engine::RunFailed;
///
/// let msg = RunFailed {
///     message: "task failed",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct RunFailed<'a> {
    pub message: &'a str,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Run failed: {}", self.message)
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(error = self.message, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "run_failed",
            span_name = name,
            error = self.message,
        )
    }
}

/// The driver consumed a successful task completion and removed its node.
///
/// # Log Level
/// `debug!` - Per-task progress detail
///
/// # Example
/// ```
/// use dagrun::observability::messages::engine::TaskCompleted;
///
/// let msg = TaskCompleted {
///     task: "\"compile\"",
///     remaining: 3,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct TaskCompleted<'a> {
    pub task: &'a str,
    pub remaining: usize,
}

impl Display for TaskCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task {} completed, {} nodes remaining",
            self.task, self.remaining
        )
    }
}

impl StructuredLog for TaskCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            task = self.task,
            remaining = self.remaining,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "task_completed",
            span_name = name,
            task = self.task,
            remaining = self.remaining,
        )
    }
}

/// The driver consumed a failed task completion; the run is abandoning.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use dagrun::observability::messages::engine::TaskFailed;
///
/// let msg = TaskFailed {
///     task: "\"compile\"",
///     message: "rustc exited with status 1",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct TaskFailed<'a> {
    pub task: &'a str,
    pub message: &'a str,
}

impl Display for TaskFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task {} failed: {}", self.task, self.message)
    }
}

impl StructuredLog for TaskFailed<'_> {
    fn log(&self) {
        tracing::error!(
            task = self.task,
            error = self.message,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "task_failed",
            span_name = name,
            task = self.task,
            error = self.message,
        )
    }
}
