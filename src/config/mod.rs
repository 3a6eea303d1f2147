// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;

/// Tunables for the graph executor.
///
/// All fields are optional and fall back to built-in defaults, so embedding
/// applications can deserialize a partial options block from their own
/// configuration without restating the defaults. The executor itself takes
/// this struct directly; there is no file loading here.
///
/// # Fields
/// * `worker_count` - Width of the worker pool (defaults to 5, clamped to at least 1)
/// * `completion_wait_ms` - Upper bound on a single completion wait (defaults to 2000)
///
/// The completion wait is a liveness aid, not a per-task timeout: when it
/// elapses the driver loop simply re-evaluates its termination condition and
/// waits again.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutorOptions {
    #[serde(default)]
    pub worker_count: Option<usize>,
    #[serde(default)]
    pub completion_wait_ms: Option<u64>,
}

impl ExecutorOptions {
    /// Pool width used when `worker_count` is not configured.
    pub const DEFAULT_WORKER_COUNT: usize = 5;

    /// Completion wait used when `completion_wait_ms` is not configured.
    pub const DEFAULT_COMPLETION_WAIT_MS: u64 = 2_000;
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            worker_count: None,
            completion_wait_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_leave_everything_unset() {
        let options = ExecutorOptions::default();
        assert_eq!(options.worker_count, None);
        assert_eq!(options.completion_wait_ms, None);
    }
}
