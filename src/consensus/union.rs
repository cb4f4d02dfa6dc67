//! Union builders over reconciled DAGs.

use crate::error::{FusionError, Result};
use crate::graph::{Dag, Edge, NodeId, TreeWidth};

/// Input DAGs rewritten onto one common alpha order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// The common variable order.
    pub alpha: Vec<NodeId>,
    /// Each input rewritten to agree with `alpha`, in input order.
    pub dags: Vec<Dag>,
}

impl Reconciled {
    /// Computes the alpha order of `dags` and rewrites each one onto it.
    ///
    /// # Errors
    /// Fails on empty input or inputs over different variable lists.
    pub fn from_dags(dags: &[Dag]) -> Result<Self> {
        let alpha = super::alpha_order(dags)?;
        let dags = dags
            .iter()
            .map(|d| super::transform_to_alpha(d, &alpha))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { alpha, dags })
    }
}

/// Union of the edge sets of order-consistent DAGs.
///
/// # Errors
/// Fails if `dags` is empty, the inputs differ in variables, or an input
/// has an edge pointing backwards in `alpha`.
pub fn full_union(alpha: &[NodeId], dags: &[Dag]) -> Result<Dag> {
    super::alpha::check_inputs(dags)?;
    let mut union = dags[0].empty_like();
    for (index, dag) in dags.iter().enumerate() {
        if !dag.is_consistent_with(alpha) {
            return Err(FusionError::OrderMismatch { index });
        }
        for edge in dag.edges() {
            union.insert_acyclic(edge);
        }
    }
    Ok(union)
}

/// Greedy union bounded by tree-width.
///
/// Starting from the edgeless DAG over `template`'s variables, tries each
/// edge of `ranked` in turn and keeps it only if the tree-width stays within
/// `bound`. A `bound` of 0 yields the edgeless DAG.
///
/// # Errors
/// Propagates tree-width failures and rejects edges that close a cycle.
pub fn greedy_union<T: TreeWidth + ?Sized>(
    template: &Dag,
    ranked: &[Edge],
    bound: usize,
    tree_width: &T,
) -> Result<Dag> {
    let mut dag = template.empty_like();
    for &edge in ranked {
        if !dag.add_edge(edge)? {
            continue;
        }
        if tree_width.tree_width(&dag)? > bound {
            dag.remove_edge(edge);
        }
    }
    Ok(dag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ExactTreeWidth;

    fn dag(n: usize, edges: &[(usize, usize)]) -> Dag {
        let mut d = Dag::with_node_count(n);
        for &(a, b) in edges {
            d.add_edge(Edge::new(a, b)).unwrap();
        }
        d
    }

    fn identity(n: usize) -> Vec<NodeId> {
        (0..n).map(NodeId).collect()
    }

    #[test]
    fn test_full_union_merges_edges() {
        let a = dag(4, &[(0, 1), (1, 2)]);
        let b = dag(4, &[(0, 1), (2, 3)]);
        let union = full_union(&identity(4), &[a, b]).unwrap();
        assert_eq!(union.edge_count(), 3);
        assert!(union.contains_edge(Edge::new(2, 3)));
    }

    #[test]
    fn test_full_union_rejects_inconsistent_input() {
        let a = dag(3, &[(0, 1)]);
        let b = dag(3, &[(2, 1)]);
        assert_eq!(
            full_union(&identity(3), &[a, b]),
            Err(FusionError::OrderMismatch { index: 1 })
        );
    }

    #[test]
    fn test_greedy_respects_bound() {
        // Complete DAG over 4 nodes has tree-width 3.
        let ranked: Vec<Edge> = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
            .iter()
            .map(|&(a, b)| Edge::new(a, b))
            .collect();
        let template = Dag::with_node_count(4);
        let tw = ExactTreeWidth::default();

        for bound in 0..=3 {
            let greedy = greedy_union(&template, &ranked, bound, &tw).unwrap();
            assert!(tw.tree_width(&greedy).unwrap() <= bound);
        }

        let unbounded = greedy_union(&template, &ranked, 3, &tw).unwrap();
        assert_eq!(unbounded.edge_count(), 6);

        let empty = greedy_union(&template, &ranked, 0, &tw).unwrap();
        assert_eq!(empty.edge_count(), 0);
    }

    #[test]
    fn test_greedy_takes_edges_in_rank_order() {
        // With bound 1 the first two edges form a chain; 0 -> 2 would make a
        // triangle and is skipped, while 2 -> 3 extends the tree.
        let ranked = [Edge::new(0, 1), Edge::new(1, 2), Edge::new(0, 2), Edge::new(2, 3)];
        let greedy =
            greedy_union(&Dag::with_node_count(4), &ranked, 1, &ExactTreeWidth::default()).unwrap();
        let edges: Vec<Edge> = greedy.edges().collect();
        assert_eq!(edges, vec![Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 3)]);
    }

    #[test]
    fn test_reconciled_is_order_consistent() {
        let a = dag(4, &[(0, 1), (1, 2), (2, 3)]);
        let b = dag(4, &[(3, 2), (0, 2)]);
        let rec = Reconciled::from_dags(&[a, b]).unwrap();
        assert_eq!(rec.dags.len(), 2);
        for d in &rec.dags {
            assert!(d.is_consistent_with(&rec.alpha));
        }
        assert!(full_union(&rec.alpha, &rec.dags).is_ok());
    }
}
