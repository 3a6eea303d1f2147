// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod dependency_graph;
pub mod node;
pub mod validation;

pub use dependency_graph::DependencyGraph;
pub use node::{Node, TaskValue};
pub use validation::validate_acyclic;
