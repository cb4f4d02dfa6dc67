//! Tree-width of a DAG's moral graph.
//!
//! # Algorithms
//!
//! - [`ExactTreeWidth`]: safe reduction rules followed by dynamic
//!   programming over vertex subsets (Bodlaender et al., 2006) on what
//!   remains. Exponential in the size of the largest remaining component,
//!   so a size limit applies to the reduced graph.
//! - [`MinFillTreeWidth`]: greedy min-fill elimination ordering. Gives an
//!   upper bound in polynomial time.
//!
//! # References
//!
//! - Bodlaender, Fomin, Koster, Kratsch & Thilikos (2006), "On Exact
//!   Algorithms for Treewidth"
//! - Bodlaender, Koster & van den Eijkhof (2005), "Preprocessing Rules for
//!   Triangulation of Probabilistic Networks"
//! - Kjaerulff (1990), "Triangulation of Graphs: Algorithms Giving Small
//!   Total State Space"

use super::dag::Dag;
use super::moral::MoralGraph;
use crate::error::{FusionError, Result};
use std::collections::BTreeSet;

/// Computes the tree-width of a DAG.
///
/// Implementations must be thread-safe: the fusion runner evaluates
/// genomes in parallel and shares one instance across workers.
pub trait TreeWidth: Send + Sync {
    /// Returns the tree-width of the moralized `dag`.
    ///
    /// # Errors
    /// Implementations may refuse graphs they cannot handle.
    fn tree_width(&self, dag: &Dag) -> Result<usize>;
}

/// Hard ceiling for [`ExactTreeWidth`]: the DP table has `2^k` entries.
pub const MAX_EXACT_COMPONENT: usize = 28;

/// Exact tree-width.
///
/// The moral graph is first shrunk with the simplicial and almost-simplicial
/// rules, which never change the tree-width once the running lower bound is
/// accounted for. Forests, chordal graphs and most sparse networks vanish
/// entirely at this stage. If a kernel remains and the min-fill upper bound
/// does not already meet the degeneracy lower bound, each kernel component
/// goes through the subset recurrence
/// `TW(S) = min over v in S of max(TW(S \ {v}), |Q(S \ {v}, v)|)`, where
/// `Q(S, v)` is the set of vertices outside `S ∪ {v}` reachable from `v`
/// through `S`.
///
/// # Examples
///
/// ```
/// use dag_fusion::graph::{Dag, Edge, ExactTreeWidth, TreeWidth};
///
/// // A -> C <- B: moralizing marries A and B into a triangle.
/// let dag = Dag::from_edges(["A", "B", "C"], [Edge::new(0, 2), Edge::new(1, 2)]).unwrap();
/// assert_eq!(ExactTreeWidth::default().tree_width(&dag).unwrap(), 2);
///
/// // Long chains reduce away before the component limit matters.
/// let chain = Dag::from_edges(
///     (0..60usize).map(|i| format!("X{i}")),
///     (0..59usize).map(|i| Edge::new(i, i + 1)),
/// )
/// .unwrap();
/// assert_eq!(ExactTreeWidth::default().tree_width(&chain).unwrap(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactTreeWidth {
    max_component_size: usize,
}

impl Default for ExactTreeWidth {
    fn default() -> Self {
        Self {
            max_component_size: 20,
        }
    }
}

impl ExactTreeWidth {
    /// Sets the largest reduced component the solver accepts.
    ///
    /// Values above [`MAX_EXACT_COMPONENT`] are clamped.
    pub fn with_max_component_size(mut self, size: usize) -> Self {
        self.max_component_size = size.min(MAX_EXACT_COMPONENT);
        self
    }

    /// Largest accepted reduced component size.
    pub fn max_component_size(&self) -> usize {
        self.max_component_size
    }
}

impl TreeWidth for ExactTreeWidth {
    fn tree_width(&self, dag: &Dag) -> Result<usize> {
        let mut graph = EliminationGraph::new(&MoralGraph::from_dag(dag));
        let low = graph.reduce(graph.degeneracy());
        if graph.is_empty() {
            return Ok(low);
        }

        // tw(G) = max(low, tw(kernel)), and the kernel is bracketed by
        // its degeneracy and its min-fill width.
        let lower = low.max(graph.degeneracy());
        let upper = graph.clone().min_fill_width();
        if upper <= lower {
            return Ok(low.max(upper));
        }

        let kernel = graph.into_moral();
        let mut width = low;
        for component in kernel.components() {
            let k = component.len();
            if k <= 1 {
                continue;
            }
            if k > self.max_component_size {
                return Err(FusionError::TreeWidthLimit {
                    size: k,
                    limit: self.max_component_size,
                });
            }
            let adj = local_adjacency(&kernel, &component);
            width = width.max(component_width(&adj));
        }
        Ok(width)
    }
}

/// Upper bound on tree-width from a greedy min-fill elimination ordering.
///
/// Ties on fill-in are broken by smaller degree, then smaller vertex index,
/// so the result is deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinFillTreeWidth;

impl TreeWidth for MinFillTreeWidth {
    fn tree_width(&self, dag: &Dag) -> Result<usize> {
        Ok(EliminationGraph::new(&MoralGraph::from_dag(dag)).min_fill_width())
    }
}

/// Undirected graph that shrinks by vertex elimination.
///
/// Eliminating a vertex turns its neighborhood into a clique and removes it.
#[derive(Debug, Clone)]
struct EliminationGraph {
    neighbors: Vec<BTreeSet<usize>>,
    alive: BTreeSet<usize>,
}

impl EliminationGraph {
    fn new(moral: &MoralGraph) -> Self {
        let n = moral.node_count();
        Self {
            neighbors: (0..n).map(|v| moral.neighbors(v).clone()).collect(),
            alive: (0..n).collect(),
        }
    }

    fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Eliminates `v`, returning its degree at that point.
    fn eliminate(&mut self, v: usize) -> usize {
        let nbrs: Vec<usize> = self.neighbors[v].iter().copied().collect();
        for (i, &a) in nbrs.iter().enumerate() {
            for &b in &nbrs[i + 1..] {
                self.neighbors[a].insert(b);
                self.neighbors[b].insert(a);
            }
        }
        for &a in &nbrs {
            self.neighbors[a].remove(&v);
        }
        self.neighbors[v].clear();
        self.alive.remove(&v);
        nbrs.len()
    }

    /// Number of missing edges among the neighbors of `v`.
    fn fill_in(&self, v: usize) -> usize {
        let nbrs: Vec<usize> = self.neighbors[v].iter().copied().collect();
        let mut missing = 0;
        for (i, &a) in nbrs.iter().enumerate() {
            for &b in &nbrs[i + 1..] {
                if !self.neighbors[a].contains(&b) {
                    missing += 1;
                }
            }
        }
        missing
    }

    /// Whether all neighbors of `v` but one form a clique.
    fn is_almost_simplicial(&self, v: usize) -> bool {
        let nbrs: Vec<usize> = self.neighbors[v].iter().copied().collect();
        nbrs.iter().any(|&skip| {
            let rest: Vec<usize> = nbrs.iter().copied().filter(|&u| u != skip).collect();
            rest.iter()
                .enumerate()
                .all(|(i, &a)| rest[i + 1..].iter().all(|b| self.neighbors[a].contains(b)))
        })
    }

    /// Largest minimum degree seen while repeatedly deleting a vertex of
    /// minimum degree. A lower bound on tree-width.
    fn degeneracy(&self) -> usize {
        let mut neighbors = self.neighbors.clone();
        let mut alive = self.alive.clone();
        let mut degeneracy = 0;
        while let Some(v) = alive
            .iter()
            .copied()
            .min_by_key(|&v| (neighbors[v].len(), v))
        {
            degeneracy = degeneracy.max(neighbors[v].len());
            for a in std::mem::take(&mut neighbors[v]) {
                neighbors[a].remove(&v);
            }
            alive.remove(&v);
        }
        degeneracy
    }

    /// Applies the simplicial and almost-simplicial rules until neither
    /// fires. `low` must not exceed the tree-width of the graph; the
    /// updated bound is returned.
    fn reduce(&mut self, mut low: usize) -> usize {
        loop {
            let next = self.alive.iter().copied().find_map(|v| {
                if self.fill_in(v) == 0 {
                    Some((v, true))
                } else if self.neighbors[v].len() <= low && self.is_almost_simplicial(v) {
                    Some((v, false))
                } else {
                    None
                }
            });
            let Some((v, simplicial)) = next else {
                return low;
            };
            let degree = self.eliminate(v);
            if simplicial {
                low = low.max(degree);
            }
        }
    }

    /// Width of the min-fill elimination ordering.
    fn min_fill_width(mut self) -> usize {
        let mut width = 0;
        while let Some(v) = self
            .alive
            .iter()
            .copied()
            .min_by_key(|&v| (self.fill_in(v), self.neighbors[v].len(), v))
        {
            width = width.max(self.eliminate(v));
        }
        width
    }

    /// The remaining graph; eliminated vertices stay as isolated vertices.
    fn into_moral(self) -> MoralGraph {
        MoralGraph::from_neighbors(self.neighbors)
    }
}

/// Adjacency bitmasks of `component`, re-indexed to `0..component.len()`.
fn local_adjacency(graph: &MoralGraph, component: &[usize]) -> Vec<u64> {
    component
        .iter()
        .map(|&v| {
            // Neighbors of a component member are members themselves.
            graph
                .neighbors(v)
                .iter()
                .filter_map(|w| component.binary_search(w).ok())
                .fold(0u64, |mask, local| mask | (1u64 << local))
        })
        .collect()
}

/// Exact tree-width of one connected component.
fn component_width(adj: &[u64]) -> usize {
    let k = adj.len();
    let edges: u32 = adj.iter().map(|m| m.count_ones()).sum::<u32>() / 2;
    if edges as usize == k - 1 {
        return 1;
    }
    if edges as usize == k * (k - 1) / 2 {
        return k - 1;
    }

    let full: usize = (1usize << k) - 1;
    let mut table = vec![0u8; full + 1];
    for set in 1..=full {
        let mut best = u8::MAX;
        let mut rest = set;
        while rest != 0 {
            let v = rest.trailing_zeros() as usize;
            rest &= rest - 1;
            let without = set & !(1usize << v);
            let q = q_size(adj, without as u64, v);
            let value = table[without].max(q);
            if value < best {
                best = value;
            }
        }
        table[set] = best;
    }
    table[full] as usize
}

/// `|Q(S, v)|`: vertices outside `S ∪ {v}` reachable from `v` through `S`.
fn q_size(adj: &[u64], set: u64, v: usize) -> u8 {
    let mut visited = 1u64 << v;
    let mut frontier = 1u64 << v;
    let mut outside = 0u64;
    while frontier != 0 {
        let x = frontier.trailing_zeros() as usize;
        frontier &= frontier - 1;
        let fresh = adj[x] & !visited;
        visited |= fresh;
        outside |= fresh & !set;
        frontier |= fresh & set;
    }
    outside.count_ones() as u8
}
