// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for worker submission, panics, and drain events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// One frontier batch was handed to the factory and submitted to the pool.
///
/// The worker count can differ from the task count: factories may coalesce
/// tasks into fewer workers or fan them out into more.
///
/// # Log Level
/// `debug!` - Per-cycle progress detail
///
/// # Example
/// ```
/// use dagrun::observability::messages::worker::WorkersSubmitted;
///
/// let msg = WorkersSubmitted {
///     task_count: 3,
///     worker_count: 3,
///     running: 4,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct WorkersSubmitted {
    pub task_count: usize,
    pub worker_count: usize,
    pub running: usize,
}

impl Display for WorkersSubmitted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Submitted {} workers for {} free tasks, {} in flight",
            self.worker_count, self.task_count, self.running
        )
    }
}

impl StructuredLog for WorkersSubmitted {
    fn log(&self) {
        tracing::debug!(
            task_count = self.task_count,
            worker_count = self.worker_count,
            running = self.running,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "workers_submitted",
            span_name = name,
            task_count = self.task_count,
            worker_count = self.worker_count,
            running = self.running,
        )
    }
}

/// A worker panicked instead of reporting through its outcome.
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use dagrun::observability::messages::worker::WorkerPanicked;
///
/// let msg = WorkerPanicked {
///     message: "index out of bounds",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct WorkerPanicked<'a> {
    pub message: &'a str,
}

impl Display for WorkerPanicked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker panicked: {}", self.message)
    }
}

impl StructuredLog for WorkerPanicked<'_> {
    fn log(&self) {
        tracing::error!(error = self.message, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "worker_panicked",
            span_name = name,
            error = self.message,
        )
    }
}

/// A failure arrived while draining after the run was already abandoning.
///
/// Only the first failure is reported as the run's result; later ones are
/// logged here and absorbed.
///
/// # Log Level
/// `warn!` - Noteworthy but already handled
///
/// # Example
/// ```
/// use dagrun::observability::messages::worker::FailureAbsorbed;
///
/// let msg = FailureAbsorbed {
///     task: "\"package\"",
///     message: "archive truncated",
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct FailureAbsorbed<'a> {
    pub task: &'a str,
    pub message: &'a str,
}

impl Display for FailureAbsorbed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Absorbed failure from {} during drain: {}",
            self.task, self.message
        )
    }
}

impl StructuredLog for FailureAbsorbed<'_> {
    fn log(&self) {
        tracing::warn!(
            task = self.task,
            error = self.message,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "failure_absorbed",
            span_name = name,
            task = self.task,
            error = self.message,
        )
    }
}

/// A success arrived while draining; the run is abandoning, so the result
/// is discarded without touching the graph.
///
/// # Log Level
/// `debug!` - Per-task drain detail
///
/// # Example
/// ```
/// use dagrun::observability::messages::worker::CompletionDiscarded;
///
/// let msg = CompletionDiscarded {
///     task: "\"test\"",
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct CompletionDiscarded<'a> {
    pub task: &'a str,
}

impl Display for CompletionDiscarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Discarded completion from {} after run abandonment",
            self.task
        )
    }
}

impl StructuredLog for CompletionDiscarded<'_> {
    fn log(&self) {
        tracing::debug!(task = self.task, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "completion_discarded",
            span_name = name,
            task = self.task,
        )
    }
}
