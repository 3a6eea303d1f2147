use std::collections::{HashMap, HashSet};

use super::node::{Node, TaskValue};

/// A mutable dependency graph driven to empty as tasks complete.
///
/// Unlike a graph that is topologically sorted once up front, this structure
/// is consumed during execution: completed nodes are removed, which erases
/// their edges and exposes their dependents as newly runnable. The frontier
/// of runnable work is therefore recomputed from the live graph after every
/// completion rather than precomputed.
///
/// Edges are held as two reciprocal multimaps:
/// - `depended_upon`: node → the nodes it depends on (its prerequisites)
/// - `depending_on`: node → the nodes that depend on it (its dependents)
///
/// The maps are mutual inverses and every edge endpoint is a member of
/// `nodes`; both invariants are maintained by the operations on this type. A
/// node is *free* when its prerequisite set is empty or absent.
///
/// The graph must stay acyclic. Cycles are not detected here — a cyclic
/// graph never drains and the executor's bounded completion waits spin
/// forever. Callers wanting an upfront check can run
/// [`validate_acyclic`](super::validate_acyclic) before execution.
///
/// The graph is not internally synchronized. During a run the executor is
/// the sole mutator; workers only ever see task values by clone.
///
/// # Examples
///
/// ## Building and draining a chain
/// ```
/// use dagrun::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// // "package" depends on "compile", "compile" depends on "generate"
/// graph.add_edge("package", "compile");
/// graph.add_edge("compile", "generate");
///
/// assert_eq!(graph.free_nodes().len(), 1);
/// assert!(graph.free_nodes().contains("generate"));
///
/// // Completing "generate" frees "compile"
/// graph.remove_node(&"generate");
/// assert!(graph.free_nodes().contains("compile"));
/// ```
///
/// ## Diamond dependencies
/// ```
/// use dagrun::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.add_edge("assemble", "left");
/// graph.add_edge("assemble", "right");
/// graph.add_edge("left", "source");
/// graph.add_edge("right", "source");
///
/// assert_eq!(graph.free_nodes(), ["source"].into_iter().collect());
///
/// graph.remove_node(&"source");
/// assert_eq!(graph.free_nodes(), ["left", "right"].into_iter().collect());
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph<T: TaskValue> {
    nodes: HashSet<Node<T>>,
    depended_upon: HashMap<Node<T>, HashSet<Node<T>>>,
    depending_on: HashMap<Node<T>, HashSet<Node<T>>>,
}

impl<T: TaskValue> DependencyGraph<T> {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            nodes: HashSet::new(),
            depended_upon: HashMap::new(),
            depending_on: HashMap::new(),
        }
    }

    /// Insert `value` as a node if not already present.
    ///
    /// Idempotent; never creates edges.
    pub fn add_node(&mut self, value: T) {
        self.nodes.insert(Node::new(value));
    }

    /// Register that `from` depends on `to`.
    ///
    /// Both endpoints are inserted as nodes if absent. Duplicate edges are
    /// absorbed by the set semantics of the underlying multimaps.
    pub fn add_edge(&mut self, from: T, to: T) {
        let from = Node::new(from);
        let to = Node::new(to);
        self.nodes.insert(from.clone());
        self.nodes.insert(to.clone());
        self.depended_upon
            .entry(from.clone())
            .or_default()
            .insert(to.clone());
        self.depending_on.entry(to).or_default().insert(from);
    }

    /// Remove `value` and every edge mentioning it, in either direction.
    ///
    /// Dependents of the removed node lose it as a prerequisite, which is
    /// what lets them become free once their remaining prerequisites drain.
    /// The reciprocal `depending_on` entry identifies exactly the adjacency
    /// lists that need purging, so the scan touches affected keys only.
    /// Removing a non-member is a no-op.
    pub fn remove_node(&mut self, value: &T) {
        let node = Node::new(value.clone());
        if !self.nodes.remove(&node) {
            return;
        }
        if let Some(dependents) = self.depending_on.remove(&node) {
            for dependent in &dependents {
                Self::detach(&mut self.depended_upon, dependent, &node);
            }
        }
        if let Some(prerequisites) = self.depended_upon.remove(&node) {
            for prerequisite in &prerequisites {
                Self::detach(&mut self.depending_on, prerequisite, &node);
            }
        }
    }

    /// Remove `target` from the adjacency set under `key`, dropping the
    /// entry entirely once the set empties.
    fn detach(
        map: &mut HashMap<Node<T>, HashSet<Node<T>>>,
        key: &Node<T>,
        target: &Node<T>,
    ) {
        let now_empty = match map.get_mut(key) {
            Some(set) => {
                set.remove(target);
                set.is_empty()
            }
            None => false,
        };
        if now_empty {
            map.remove(key);
        }
    }

    /// Snapshot of every node with no outstanding prerequisites.
    ///
    /// Computed from the live maps on each call; the returned set does not
    /// track subsequent mutation.
    pub fn free_nodes(&self) -> HashSet<T> {
        self.nodes
            .iter()
            .filter(|node| self.depended_upon.get(*node).map_or(true, HashSet::is_empty))
            .map(|node| node.value().clone())
            .collect()
    }

    /// Task values `value` depends on (its outstanding prerequisites)
    pub fn dependencies(&self, value: &T) -> HashSet<T> {
        self.adjacent(&self.depended_upon, value)
    }

    /// Task values that depend on `value`
    pub fn dependents(&self, value: &T) -> HashSet<T> {
        self.adjacent(&self.depending_on, value)
    }

    fn adjacent(
        &self,
        map: &HashMap<Node<T>, HashSet<Node<T>>>,
        value: &T,
    ) -> HashSet<T> {
        map.get(&Node::new(value.clone()))
            .map(|set| set.iter().map(|node| node.value().clone()).collect())
            .unwrap_or_default()
    }

    /// All task values currently in the graph
    pub fn values(&self) -> Vec<T> {
        self.nodes.iter().map(|node| node.value().clone()).collect()
    }

    /// Whether `value` is currently a node of the graph
    pub fn contains(&self, value: &T) -> bool {
        self.nodes.contains(&Node::new(value.clone()))
    }

    /// Number of nodes currently in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has drained to empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Human-readable rendering of nodes, free frontier, and remaining
    /// edges. Diagnostic only; the format is not contractual.
    pub fn dump(&self) -> String {
        let mut nodes: Vec<String> = self
            .nodes
            .iter()
            .map(|node| format!("{:?}", node.value()))
            .collect();
        nodes.sort();

        let mut free: Vec<String> = self
            .free_nodes()
            .iter()
            .map(|value| format!("{:?}", value))
            .collect();
        free.sort();

        let mut edges: Vec<String> = Vec::new();
        for (node, prerequisites) in &self.depended_upon {
            for prerequisite in prerequisites {
                edges.push(format!(
                    "  {:?} -> {:?}",
                    node.value(),
                    prerequisite.value()
                ));
            }
        }
        edges.sort();

        let mut out = format!(
            "nodes: [{}]\nfree:  [{}]\n",
            nodes.join(", "),
            free.join(", ")
        );
        if edges.is_empty() {
            out.push_str("edges: none\n");
        } else {
            out.push_str("edges:\n");
            for edge in edges {
                out.push_str(&edge);
                out.push('\n');
            }
        }
        out
    }
}

impl<T: TaskValue> Default for DependencyGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}
