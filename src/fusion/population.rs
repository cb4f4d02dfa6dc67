//! Genomes and population initialization.

use super::catalog::EdgeCatalog;
use rand::Rng;
use std::ops::{Index, IndexMut};

/// Candidate edge subset: bit `j` set means catalog edge `j` is present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Genome {
    bits: Vec<bool>,
}

impl Genome {
    /// Genome of `len` clear bits.
    pub fn empty(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the genome has no genes.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bits as a slice.
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Bits as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [bool] {
        &mut self.bits
    }

    /// Iterates over the bits.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Number of set bits (edges selected).
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

impl From<Vec<bool>> for Genome {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl FromIterator<bool> for Genome {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for Genome {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        &self.bits[index]
    }
}

impl IndexMut<usize> for Genome {
    fn index_mut(&mut self, index: usize) -> &mut bool {
        &mut self.bits[index]
    }
}

/// Probability that a random genome includes the edge at `pos`.
///
/// `0.5` when every edge has the same frequency, otherwise
/// `1 / (1 - ln(nf))` with `nf` the normalized frequency: the most frequent
/// edges are always included and rarer ones fall off logarithmically.
pub fn inclusion_probability(catalog: &EdgeCatalog, pos: usize) -> f64 {
    if catalog.is_uniform() {
        0.5
    } else {
        1.0 / (1.0 - catalog.normalized_frequency(pos).ln())
    }
}

/// Random genome biased towards frequent edges.
pub fn random_genome<R: Rng>(catalog: &EdgeCatalog, rng: &mut R) -> Genome {
    (0..catalog.len())
        .map(|pos| rng.random::<f64>() < inclusion_probability(catalog, pos))
        .collect()
}

/// Builds the initial population.
///
/// Slot 0 is `seed`, slot 1 is `conservative_seed`, the remaining
/// `size - 2` slots are [`random_genome`]s.
pub fn initial_population<R: Rng>(
    catalog: &EdgeCatalog,
    seed: Genome,
    conservative_seed: Genome,
    size: usize,
    rng: &mut R,
) -> Vec<Genome> {
    debug_assert!(size >= 2);
    let mut population = Vec::with_capacity(size);
    population.push(seed);
    population.push(conservative_seed);
    while population.len() < size {
        population.push(random_genome(catalog, rng));
    }
    population
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Dag, Edge};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dag(edges: &[(usize, usize)]) -> Dag {
        Dag::from_edges(
            ["A", "B", "C", "D"],
            edges.iter().map(|&(a, b)| Edge::new(a, b)),
        )
        .unwrap()
    }

    #[test]
    fn test_genome_basics() {
        let mut g = Genome::empty(4);
        assert_eq!(g.count_ones(), 0);
        g[2] = true;
        assert!(g[2]);
        assert_eq!(g.count_ones(), 1);
        assert_eq!(g.iter().collect::<Vec<_>>(), vec![false, false, true, false]);
    }

    #[test]
    fn test_inclusion_probability_shape() {
        // Frequencies 3, 2, 1 over three inputs; floor 0.
        let catalog = EdgeCatalog::build(&[
            dag(&[(0, 1), (1, 2), (2, 3)]),
            dag(&[(0, 1), (1, 2)]),
            dag(&[(0, 1)]),
        ]);
        let p_max = inclusion_probability(&catalog, 0);
        let p_mid = inclusion_probability(&catalog, 1);
        let p_min = inclusion_probability(&catalog, 2);
        assert!((p_max - 1.0).abs() < 1e-12);
        assert!(p_max > p_mid && p_mid > p_min);
        assert!(p_min > 0.0);
        assert!((p_min - 1.0 / (1.0 + 3f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_is_fair_coin() {
        let catalog = EdgeCatalog::build(&[dag(&[(0, 1), (2, 3)])]);
        assert!(catalog.is_uniform());
        assert_eq!(inclusion_probability(&catalog, 0), 0.5);

        let mut rng = StdRng::seed_from_u64(42);
        let mut ones = 0;
        let trials = 4000;
        for _ in 0..trials {
            ones += random_genome(&catalog, &mut rng).count_ones();
        }
        let ratio = ones as f64 / (2 * trials) as f64;
        assert!((ratio - 0.5).abs() < 0.05, "ratio {ratio}");
    }

    #[test]
    fn test_initial_population_layout() {
        let catalog = EdgeCatalog::build(&[dag(&[(0, 1), (1, 2)]), dag(&[(0, 1)])]);
        let seed = Genome::from(vec![true, true]);
        let conservative = Genome::from(vec![true, false]);
        let mut rng = StdRng::seed_from_u64(1);

        let pop = initial_population(&catalog, seed.clone(), conservative.clone(), 6, &mut rng);
        assert_eq!(pop.len(), 6);
        assert_eq!(pop[0], seed);
        assert_eq!(pop[1], conservative);
        assert!(pop.iter().all(|g| g.len() == catalog.len()));
        // The most frequent edge has inclusion probability 1.
        assert!(pop[2..].iter().all(|g| g[0]));
    }

    #[test]
    fn test_population_of_two_has_only_seeds() {
        let catalog = EdgeCatalog::build(&[dag(&[(0, 1)])]);
        let mut rng = StdRng::seed_from_u64(1);
        let pop = initial_population(&catalog, Genome::empty(1), Genome::empty(1), 2, &mut rng);
        assert_eq!(pop.len(), 2);
    }
}
