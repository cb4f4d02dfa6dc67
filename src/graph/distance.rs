//! Structural distances between DAGs over the same variables.

use super::dag::Dag;
use super::moral::MoralGraph;

/// A structural distance between two DAGs over the same variable set.
///
/// Lower is closer. Used by the fusion runner as the fitness reference
/// against the full union.
pub trait DagDistance: Send + Sync {
    /// Distance between `a` and `b`.
    ///
    /// Callers guarantee both DAGs share their variable list.
    fn distance(&self, a: &Dag, b: &Dag) -> f64;
}

/// Structural moral Hamming distance (SMHD).
///
/// Counts unordered variable pairs that are adjacent in exactly one of the
/// two moral graphs.
///
/// # Examples
///
/// ```
/// use dag_fusion::graph::{Dag, DagDistance, Edge, MoralHammingDistance};
///
/// let a = Dag::from_edges(["A", "B", "C"], [Edge::new(0, 2), Edge::new(1, 2)]).unwrap();
/// let b = Dag::new(["A", "B", "C"]);
/// // a moralizes to a triangle, b has no edges.
/// assert_eq!(MoralHammingDistance.distance(&a, &b), 3.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoralHammingDistance;

impl DagDistance for MoralHammingDistance {
    fn distance(&self, a: &Dag, b: &Dag) -> f64 {
        let ma = MoralGraph::from_dag(a);
        let mb = MoralGraph::from_dag(b);
        let n = ma.node_count().min(mb.node_count());
        let mut differing = 0usize;
        for u in 0..n {
            let na = ma.neighbors(u);
            let nb = mb.neighbors(u);
            differing += na
                .symmetric_difference(nb)
                .filter(|&&v| v > u)
                .count();
        }
        differing as f64
    }
}

/// Structural Hamming distance (SHD).
///
/// A missing, an extra, or a reversed edge each count one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructuralHammingDistance;

impl DagDistance for StructuralHammingDistance {
    fn distance(&self, a: &Dag, b: &Dag) -> f64 {
        let mut differing = 0usize;
        for edge in a.edges() {
            if !b.contains_edge(edge) {
                // Reversals are counted once, from this side.
                differing += 1;
            }
        }
        for edge in b.edges() {
            if !a.contains_edge(edge) && !a.contains_edge(edge.reversed()) {
                differing += 1;
            }
        }
        differing as f64
    }
}
