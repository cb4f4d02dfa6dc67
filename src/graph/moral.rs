//! Moral (undirected) graphs.

use super::dag::Dag;
use std::collections::BTreeSet;

/// Undirected simple graph produced by moralizing a [`Dag`].
///
/// Moralization keeps every edge (ignoring direction) and joins every pair of
/// parents that share a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoralGraph {
    neighbors: Vec<BTreeSet<usize>>,
}

impl MoralGraph {
    /// Moralizes `dag`.
    pub fn from_dag(dag: &Dag) -> Self {
        let mut graph = Self {
            neighbors: vec![BTreeSet::new(); dag.node_count()],
        };
        for edge in dag.edges() {
            graph.connect(edge.tail.0, edge.head.0);
        }
        for child in dag.nodes() {
            let parents: Vec<usize> = dag.parents(child).iter().map(|p| p.0).collect();
            for (i, &a) in parents.iter().enumerate() {
                for &b in &parents[i + 1..] {
                    graph.connect(a, b);
                }
            }
        }
        graph
    }

    /// Wraps an adjacency list that is already symmetric and loop-free.
    pub(crate) fn from_neighbors(neighbors: Vec<BTreeSet<usize>>) -> Self {
        Self { neighbors }
    }

    /// Number of vertices.
    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Neighbors of `v`.
    pub fn neighbors(&self, v: usize) -> &BTreeSet<usize> {
        &self.neighbors[v]
    }

    /// Whether `a` and `b` are adjacent.
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.neighbors.get(a).is_some_and(|n| n.contains(&b))
    }

    /// Connected components, each sorted, ordered by smallest member.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let n = self.node_count();
        let mut seen = vec![false; n];
        let mut components = Vec::new();
        for start in 0..n {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut stack = vec![start];
            let mut members = Vec::new();
            while let Some(v) = stack.pop() {
                members.push(v);
                for &w in &self.neighbors[v] {
                    if !seen[w] {
                        seen[w] = true;
                        stack.push(w);
                    }
                }
            }
            members.sort_unstable();
            components.push(members);
        }
        components
    }

    fn connect(&mut self, a: usize, b: usize) {
        if a != b {
            self.neighbors[a].insert(b);
            self.neighbors[b].insert(a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    #[test]
    fn test_v_structure_is_married() {
        // A -> C <- B
        let dag = Dag::from_edges(["A", "B", "C"], [Edge::new(0, 2), Edge::new(1, 2)]).unwrap();
        let moral = MoralGraph::from_dag(&dag);
        assert!(moral.has_edge(0, 1));
        assert!(moral.has_edge(1, 0));
        assert_eq!(moral.edge_count(), 3);
    }

    #[test]
    fn test_chain_is_not_married() {
        let dag = Dag::from_edges(["A", "B", "C"], [Edge::new(0, 1), Edge::new(1, 2)]).unwrap();
        let moral = MoralGraph::from_dag(&dag);
        assert!(!moral.has_edge(0, 2));
        assert_eq!(moral.edge_count(), 2);
    }

    #[test]
    fn test_components() {
        let dag = Dag::from_edges(
            ["A", "B", "C", "D", "E"],
            [Edge::new(3, 0), Edge::new(1, 4)],
        )
        .unwrap();
        let moral = MoralGraph::from_dag(&dag);
        assert_eq!(moral.components(), vec![vec![0, 3], vec![1, 4], vec![2]]);
    }
}
