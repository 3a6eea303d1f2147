// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Optional acyclicity check for dependency graphs.
//!
//! The executor itself never detects cycles: a cyclic graph simply never
//! drains, and the run spins on its bounded completion waits. Callers who
//! want that failure mode caught up front run [`validate_acyclic`] after
//! construction and before execution.
//!
//! Detection is a depth-first search over prerequisite edges with an
//! explicit recursion path, so a rejection carries the actual cycle for
//! debugging rather than a bare boolean.

use std::collections::HashSet;

use crate::errors::ValidationError;

use super::dependency_graph::DependencyGraph;
use super::node::TaskValue;

/// Verify that `graph` contains no dependency cycle.
///
/// Returns the first cycle found, rendered as the path of task values that
/// closes back on itself.
///
/// # Examples
///
/// ```
/// use dagrun::graph::{validate_acyclic, DependencyGraph};
///
/// let mut graph = DependencyGraph::new();
/// graph.add_edge("a", "b");
/// graph.add_edge("b", "c");
/// assert!(validate_acyclic(&graph).is_ok());
///
/// graph.add_edge("c", "a");
/// assert!(validate_acyclic(&graph).is_err());
/// ```
pub fn validate_acyclic<T: TaskValue>(graph: &DependencyGraph<T>) -> Result<(), ValidationError> {
    let mut visited: HashSet<T> = HashSet::new();
    let mut path: Vec<T> = Vec::new();

    for value in graph.values() {
        if !visited.contains(&value) {
            visit(graph, &value, &mut visited, &mut path)?;
        }
    }
    Ok(())
}

fn visit<T: TaskValue>(
    graph: &DependencyGraph<T>,
    value: &T,
    visited: &mut HashSet<T>,
    path: &mut Vec<T>,
) -> Result<(), ValidationError> {
    if let Some(start) = path.iter().position(|member| member == value) {
        // Back edge: the slice of the path from the first occurrence of
        // `value` onward is the cycle.
        let mut cycle: Vec<String> = path[start..]
            .iter()
            .map(|member| format!("{:?}", member))
            .collect();
        cycle.push(format!("{:?}", value));
        return Err(ValidationError::CyclicDependency { cycle });
    }
    if visited.contains(value) {
        return Ok(());
    }

    path.push(value.clone());
    for prerequisite in graph.dependencies(value) {
        visit(graph, &prerequisite, visited, path)?;
    }
    path.pop();
    visited.insert(value.clone());
    Ok(())
}
