//! Edge catalog: the gene layout shared by every genome of a run.

use super::population::Genome;
use crate::graph::{Dag, Edge};
use std::collections::HashMap;

/// Distinct edges across the reconciled inputs, with their frequencies.
///
/// Positions are assigned in first-seen order while scanning the inputs in
/// order, each input in its own edge order, so the same inputs always give
/// the same catalog. Positions are never reused.
///
/// # Examples
///
/// ```
/// use dag_fusion::fusion::EdgeCatalog;
/// use dag_fusion::graph::{Dag, Edge};
///
/// let a = Dag::from_edges(["A", "B", "C"], [Edge::new(0, 1), Edge::new(1, 2)]).unwrap();
/// let b = Dag::from_edges(["A", "B", "C"], [Edge::new(0, 1)]).unwrap();
/// let catalog = EdgeCatalog::build(&[a, b]);
///
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.position(Edge::new(1, 2)), Some(1));
/// assert_eq!(catalog.frequency(0), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeCatalog {
    edges: Vec<Edge>,
    frequencies: Vec<usize>,
    positions: HashMap<Edge, usize>,
}

impl EdgeCatalog {
    /// Builds the catalog in one pass over `dags`.
    pub fn build(dags: &[Dag]) -> Self {
        let mut catalog = Self {
            edges: Vec::new(),
            frequencies: Vec::new(),
            positions: HashMap::new(),
        };
        for dag in dags {
            for edge in dag.edges() {
                match catalog.positions.get(&edge) {
                    Some(&pos) => catalog.frequencies[pos] += 1,
                    None => {
                        catalog.positions.insert(edge, catalog.edges.len());
                        catalog.edges.push(edge);
                        catalog.frequencies.push(1);
                    }
                }
            }
        }
        catalog
    }

    /// Number of distinct edges (the genome length).
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the inputs had no edges at all.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges in position order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edge at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is out of range.
    pub fn edge(&self, pos: usize) -> Edge {
        self.edges[pos]
    }

    /// Position of `edge`, if it appears in any input.
    pub fn position(&self, edge: Edge) -> Option<usize> {
        self.positions.get(&edge).copied()
    }

    /// Number of inputs containing the edge at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is out of range.
    pub fn frequency(&self, pos: usize) -> usize {
        self.frequencies[pos]
    }

    /// Number of inputs containing `edge` (0 if none).
    pub fn frequency_of(&self, edge: Edge) -> usize {
        self.position(edge).map_or(0, |pos| self.frequencies[pos])
    }

    /// Largest edge frequency (0 for an empty catalog).
    pub fn max_frequency(&self) -> usize {
        self.frequencies.iter().copied().max().unwrap_or(0)
    }

    /// Smallest edge frequency (0 for an empty catalog).
    pub fn min_frequency(&self) -> usize {
        self.frequencies.iter().copied().min().unwrap_or(0)
    }

    /// Normalization floor: one below the smallest frequency, so that the
    /// rarest edge still normalizes above zero.
    pub fn min_frequency_floor(&self) -> usize {
        self.min_frequency().saturating_sub(1)
    }

    /// Whether all edges share the same frequency.
    pub fn is_uniform(&self) -> bool {
        self.min_frequency() == self.max_frequency()
    }

    /// `(freq - floor) / (max - floor)`, in `(0, 1]`.
    ///
    /// # Panics
    /// Panics if `pos` is out of range.
    pub fn normalized_frequency(&self, pos: usize) -> f64 {
        let floor = self.min_frequency_floor() as f64;
        let max = self.max_frequency() as f64;
        (self.frequencies[pos] as f64 - floor) / (max - floor)
    }

    /// Genome selecting exactly the catalog edges present in `dag`.
    pub fn genome_of(&self, dag: &Dag) -> Genome {
        self.edges.iter().map(|&e| dag.contains_edge(e)).collect()
    }

    /// DAG over `template`'s variables holding the edges set in `genome`.
    ///
    /// Catalog edges all agree with one alpha order, so any subset of them
    /// is acyclic.
    pub fn materialize(&self, template: &Dag, genome: &Genome) -> Dag {
        debug_assert_eq!(genome.len(), self.len());
        let mut dag = template.empty_like();
        for (pos, _) in genome.iter().enumerate().filter(|(_, bit)| *bit) {
            dag.insert_acyclic(self.edges[pos]);
        }
        dag
    }

    /// Edges sorted by decreasing frequency, ties kept in position order.
    pub fn ranked_edges(&self) -> Vec<Edge> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| self.frequencies[b].cmp(&self.frequencies[a]));
        order.into_iter().map(|pos| self.edges[pos]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dag(edges: &[(usize, usize)]) -> Dag {
        Dag::from_edges(
            ["A", "B", "C", "D"],
            edges.iter().map(|&(a, b)| Edge::new(a, b)),
        )
        .unwrap()
    }

    fn inputs() -> Vec<Dag> {
        vec![
            dag(&[(0, 1), (1, 2)]),
            dag(&[(0, 1), (2, 3)]),
            dag(&[(0, 1), (1, 2), (0, 3)]),
        ]
    }

    #[test]
    fn test_first_seen_positions_and_frequencies() {
        let catalog = EdgeCatalog::build(&inputs());
        assert_eq!(
            catalog.edges(),
            &[Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 3), Edge::new(0, 3)]
        );
        assert_eq!(catalog.frequency(0), 3);
        assert_eq!(catalog.frequency(1), 2);
        assert_eq!(catalog.frequency_of(Edge::new(0, 3)), 1);
        assert_eq!(catalog.frequency_of(Edge::new(1, 3)), 0);
        assert_eq!(catalog.max_frequency(), 3);
        assert_eq!(catalog.min_frequency(), 1);
        assert_eq!(catalog.min_frequency_floor(), 0);
        assert!(!catalog.is_uniform());
    }

    #[test]
    fn test_build_is_idempotent() {
        let a = EdgeCatalog::build(&inputs());
        let b = EdgeCatalog::build(&inputs());
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalized_frequency_range() {
        let catalog = EdgeCatalog::build(&inputs());
        // floor 0, max 3
        assert!((catalog.normalized_frequency(0) - 1.0).abs() < 1e-12);
        assert!((catalog.normalized_frequency(3) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_and_empty() {
        let same = vec![dag(&[(0, 1)]), dag(&[(0, 1)])];
        let catalog = EdgeCatalog::build(&same);
        assert!(catalog.is_uniform());
        assert_eq!(catalog.min_frequency_floor(), 1);
        assert!((catalog.normalized_frequency(0) - 1.0).abs() < 1e-12);

        let empty = EdgeCatalog::build(&[dag(&[])]);
        assert!(empty.is_empty());
        assert_eq!(empty.max_frequency(), 0);
    }

    #[test]
    fn test_genome_round_trip_through_dag() {
        let ins = inputs();
        let catalog = EdgeCatalog::build(&ins);
        let genome = catalog.genome_of(&ins[1]);
        assert_eq!(genome.as_slice(), &[true, false, true, false]);
        assert_eq!(catalog.materialize(&ins[0], &genome), ins[1]);
    }

    #[test]
    fn test_ranked_edges_stable() {
        let catalog = EdgeCatalog::build(&inputs());
        assert_eq!(
            catalog.ranked_edges(),
            vec![Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 3), Edge::new(0, 3)]
        );
    }

    proptest! {
        #[test]
        fn prop_every_input_edge_is_catalogued(
            masks in proptest::collection::vec(proptest::collection::vec(any::<bool>(), 10), 1..5)
        ) {
            let pairs: Vec<(usize, usize)> = (0..5)
                .flat_map(|a| ((a + 1)..5).map(move |b| (a, b)))
                .collect();
            let dags: Vec<Dag> = masks
                .iter()
                .map(|mask| {
                    let mut d = Dag::with_node_count(5);
                    for (keep, &(a, b)) in mask.iter().zip(&pairs) {
                        if *keep {
                            d.add_edge(Edge::new(a, b)).unwrap();
                        }
                    }
                    d
                })
                .collect();

            let catalog = EdgeCatalog::build(&dags);
            let distinct: std::collections::HashSet<Edge> =
                dags.iter().flat_map(|d| d.edges()).collect();
            prop_assert_eq!(catalog.len(), distinct.len());
            for d in &dags {
                for e in d.edges() {
                    let pos = catalog.position(e).unwrap();
                    prop_assert_eq!(catalog.edge(pos), e);
                    prop_assert!(catalog.frequency(pos) >= 1);
                    prop_assert!(catalog.frequency(pos) <= dags.len());
                }
            }
        }
    }
}
