// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod executor;
pub mod worker_pool;

pub use executor::{GraphExecutor, RunOutcome};
pub use worker_pool::WorkerPool;
