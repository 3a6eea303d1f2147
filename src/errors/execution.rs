// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Operational error types for the executor and its worker pool.

use std::fmt;

use thiserror::Error;

/// Errors surfaced by worker-pool operations during a run.
///
/// Clean task failures are not represented here — they travel through
/// [`TaskOutcome`](crate::traits::TaskOutcome) and end up in the run's
/// aggregate result. These variants cover the machinery around the tasks.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// A submission was refused because the pool was already shut down.
    #[error("worker pool is shut down")]
    PoolShutDown,

    /// The completion stream closed while workers were still outstanding.
    #[error("completion stream closed with {outstanding} workers outstanding")]
    CompletionStreamClosed { outstanding: usize },
}

/// Panic payload for faults raised by task logic itself.
///
/// Most worker panics are absorbed by the executor and converted into a
/// synthetic task failure so a single misbehaving worker cannot take the
/// whole run down ungracefully. A `DomainFault` is the exception: raising it
/// with `std::panic::panic_any` marks the fault as meaningful to the caller,
/// and the executor re-raises the payload verbatim — after draining
/// outstanding workers and shutting the pool down — instead of wrapping it.
///
/// # Examples
///
/// ```no_run
/// use dagrun::errors::DomainFault;
///
/// std::panic::panic_any(DomainFault::new("build script rejected the toolchain"));
/// ```
#[derive(Debug)]
pub struct DomainFault {
    message: String,
}

impl DomainFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DomainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain fault: {}", self.message)
    }
}
