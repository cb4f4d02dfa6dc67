//! Directed acyclic graph over a fixed, named variable set.
//!
//! Nodes are dense indices ([`NodeId`]) into the variable list; edges are
//! plain values compared by their endpoints, so the same [`Edge`] can be
//! used as a key across different [`Dag`] instances over the same variables.

use crate::error::{FusionError, Result};
use std::collections::BTreeSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a variable: its index in the DAG's variable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub usize);

impl NodeId {
    /// Returns the underlying index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed edge `tail -> head`.
///
/// Equality, hashing and ordering derive from the two endpoints only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// Source node.
    pub tail: NodeId,
    /// Target node.
    pub head: NodeId,
}

impl Edge {
    /// Creates the edge `tail -> head`.
    pub fn new(tail: impl Into<NodeId>, head: impl Into<NodeId>) -> Self {
        Self {
            tail: tail.into(),
            head: head.into(),
        }
    }

    /// Returns the edge with its direction flipped.
    pub fn reversed(self) -> Self {
        Self {
            tail: self.head,
            head: self.tail,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.tail, self.head)
    }
}

/// A directed acyclic graph.
///
/// Acyclicity is enforced by [`Dag::add_edge`]. Edge iteration order is
/// deterministic: by tail index, then by head index.
///
/// # Examples
///
/// ```
/// use dag_fusion::graph::{Dag, Edge};
///
/// let mut dag = Dag::new(["A", "B", "C"]);
/// dag.add_edge(Edge::new(0, 1)).unwrap();
/// dag.add_edge(Edge::new(1, 2)).unwrap();
///
/// assert!(dag.contains_edge(Edge::new(0, 1)));
/// assert!(dag.add_edge(Edge::new(2, 0)).is_err()); // would close a cycle
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dag {
    names: Vec<String>,
    parents: Vec<BTreeSet<NodeId>>,
    children: Vec<BTreeSet<NodeId>>,
    edge_count: usize,
}

impl Dag {
    /// Creates an edgeless DAG over the given variable names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let n = names.len();
        Self {
            names,
            parents: vec![BTreeSet::new(); n],
            children: vec![BTreeSet::new(); n],
            edge_count: 0,
        }
    }

    /// Creates an edgeless DAG with `n` variables named `X0..X{n-1}`.
    pub fn with_node_count(n: usize) -> Self {
        Self::new((0..n).map(|i| format!("X{i}")))
    }

    /// Creates a DAG from a variable list and an edge list.
    ///
    /// # Errors
    /// Fails on unknown nodes, self loops, or edges that close a cycle.
    pub fn from_edges<I, S, E>(names: I, edges: E) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        E: IntoIterator<Item = Edge>,
    {
        let mut dag = Self::new(names);
        for edge in edges {
            dag.add_edge(edge)?;
        }
        Ok(dag)
    }

    /// Returns an edgeless DAG over the same variables.
    pub fn empty_like(&self) -> Self {
        Self::new(self.names.iter().cloned())
    }

    /// Number of variables.
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Variable names, indexed by [`NodeId`].
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of a variable.
    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.names.get(node.0).map(String::as_str)
    }

    /// Looks up a variable by name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.names.iter().position(|n| n == name).map(NodeId)
    }

    /// Iterates over all node ids in index order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.names.len()).map(NodeId)
    }

    /// Whether both DAGs are defined over the same variable list.
    pub fn same_nodes(&self, other: &Dag) -> bool {
        self.names == other.names
    }

    /// Parents of `node`.
    ///
    /// # Panics
    /// Panics if `node` is out of range.
    pub fn parents(&self, node: NodeId) -> &BTreeSet<NodeId> {
        &self.parents[node.0]
    }

    /// Children of `node`.
    ///
    /// # Panics
    /// Panics if `node` is out of range.
    pub fn children(&self, node: NodeId) -> &BTreeSet<NodeId> {
        &self.children[node.0]
    }

    /// Whether the graph contains `edge`.
    pub fn contains_edge(&self, edge: Edge) -> bool {
        self.children
            .get(edge.tail.0)
            .is_some_and(|c| c.contains(&edge.head))
    }

    /// Iterates over all edges, ordered by tail then head.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.children.iter().enumerate().flat_map(|(tail, heads)| {
            heads.iter().map(move |&head| Edge {
                tail: NodeId(tail),
                head,
            })
        })
    }

    /// Adds `edge`, keeping the graph acyclic.
    ///
    /// Returns `Ok(false)` if the edge was already present.
    ///
    /// # Errors
    /// Fails on unknown nodes, self loops, or if `head` already reaches `tail`.
    pub fn add_edge(&mut self, edge: Edge) -> Result<bool> {
        self.check_node(edge.tail)?;
        self.check_node(edge.head)?;
        if edge.tail == edge.head {
            return Err(FusionError::SelfLoop(edge.tail.0));
        }
        if self.contains_edge(edge) {
            return Ok(false);
        }
        if self.has_path(edge.head, edge.tail) {
            return Err(FusionError::Cycle {
                tail: edge.tail.0,
                head: edge.head.0,
            });
        }
        self.insert_acyclic(edge);
        Ok(true)
    }

    /// Inserts an edge already known to keep the graph acyclic, e.g. one that
    /// agrees with a total order shared by every other edge.
    pub(crate) fn insert_acyclic(&mut self, edge: Edge) {
        debug_assert!(edge.tail.0 < self.node_count() && edge.head.0 < self.node_count());
        if self.children[edge.tail.0].insert(edge.head) {
            self.parents[edge.head.0].insert(edge.tail);
            self.edge_count += 1;
        }
    }

    /// Removes `edge`. Returns whether it was present.
    pub fn remove_edge(&mut self, edge: Edge) -> bool {
        let removed = self
            .children
            .get_mut(edge.tail.0)
            .is_some_and(|c| c.remove(&edge.head));
        if removed {
            self.parents[edge.head.0].remove(&edge.tail);
            self.edge_count -= 1;
        }
        removed
    }

    /// Whether a directed path leads from `from` to `to`.
    pub fn has_path(&self, from: NodeId, to: NodeId) -> bool {
        if from == to {
            return true;
        }
        let mut visited = vec![false; self.node_count()];
        let mut stack = vec![from];
        visited[from.0] = true;
        while let Some(node) = stack.pop() {
            for &child in &self.children[node.0] {
                if child == to {
                    return true;
                }
                if !visited[child.0] {
                    visited[child.0] = true;
                    stack.push(child);
                }
            }
        }
        false
    }

    /// Topological order, breaking ties by smallest node index.
    pub fn topological_order(&self) -> Vec<NodeId> {
        let n = self.node_count();
        let mut in_degree: Vec<usize> = self.parents.iter().map(BTreeSet::len).collect();
        let mut ready: BTreeSet<NodeId> = (0..n)
            .filter(|&i| in_degree[i] == 0)
            .map(NodeId)
            .collect();
        let mut order = Vec::with_capacity(n);
        while let Some(node) = ready.pop_first() {
            order.push(node);
            for &child in &self.children[node.0] {
                in_degree[child.0] -= 1;
                if in_degree[child.0] == 0 {
                    ready.insert(child);
                }
            }
        }
        order
    }

    /// Whether every edge points forward in `order`.
    ///
    /// Nodes missing from `order` make the check fail.
    pub fn is_consistent_with(&self, order: &[NodeId]) -> bool {
        let mut position = vec![usize::MAX; self.node_count()];
        for (pos, node) in order.iter().enumerate() {
            if let Some(slot) = position.get_mut(node.0) {
                *slot = pos;
            }
        }
        if position.contains(&usize::MAX) {
            return false;
        }
        self.edges()
            .all(|e| position[e.tail.0] < position[e.head.0])
    }

    fn check_node(&self, node: NodeId) -> Result<()> {
        if node.0 < self.node_count() {
            Ok(())
        } else {
            Err(FusionError::UnknownNode {
                node: node.0,
                node_count: self.node_count(),
            })
        }
    }
}
