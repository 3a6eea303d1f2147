// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod execution;
mod validation;

pub use execution::{DomainFault, ExecutionError};
pub use validation::ValidationError;
