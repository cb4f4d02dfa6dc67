//! Elitism and crossover strategies.
//!
//! Every strategy shares the same elitism: the next population's slot 0 is
//! the best genome ever found and slot 1 is the fittest genome of the
//! current generation among slots `1..`. Strategies differ only in how slots
//! `2..` are bred.
//!
//! Parent comparisons use raw fitness and ignore feasibility: an infeasible
//! genome with a small penalized distance can beat a feasible one.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"

use super::population::Genome;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How offspring for the non-elite slots are produced.
///
/// All strategies assume **minimization** (lower fitness = better).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CrossoverStrategy {
    /// Two binary tournaments and one-point crossover.
    ///
    /// Four parents are drawn uniformly with replacement. The child copies
    /// the prefix `[0, c)` from the fitter of the first pair and the suffix
    /// `[c, n)` from the fitter of the second pair, with `c` uniform in
    /// `[0, n)`.
    #[default]
    Tournament,

    /// Fitness-proportionate selection and uniform crossover.
    ///
    /// Each parent is drawn with probability proportional to `1 / fitness`;
    /// each gene comes from either parent with a fair coin flip.
    ///
    /// **Warning**: zero-fitness genomes (identical to the full union) share
    /// the whole probability mass equally; no other genome is drawn.
    Roulette,
}

impl CrossoverStrategy {
    /// Produces the next generation from `population` and its `fitness`.
    ///
    /// `best` is the best feasible genome found so far. Without one, slot 0
    /// receives the fittest genome of the current generation.
    ///
    /// # Panics
    /// Panics if `population` has fewer than 2 genomes or `fitness` has a
    /// different length.
    pub fn breed<R: Rng>(
        &self,
        population: &[Genome],
        fitness: &[f64],
        best: Option<&Genome>,
        rng: &mut R,
    ) -> Vec<Genome> {
        let n = population.len();
        assert!(n >= 2, "population needs the two elite slots");
        assert_eq!(n, fitness.len(), "one fitness value per genome");

        let mut next = Vec::with_capacity(n);
        next.push(match best {
            Some(genome) => genome.clone(),
            None => population[fittest(fitness, 0)].clone(),
        });
        next.push(population[fittest(fitness, 1)].clone());

        match self {
            CrossoverStrategy::Tournament => {
                for _ in 2..n {
                    next.push(tournament_child(population, fitness, rng));
                }
            }
            CrossoverStrategy::Roulette => {
                let cumulative = cumulative_weights(fitness);
                for _ in 2..n {
                    let a = sample_cumulative(&cumulative, rng);
                    let b = sample_cumulative(&cumulative, rng);
                    next.push(uniform_child(&population[a], &population[b], rng));
                }
            }
        }
        next
    }
}

/// Index of the lowest fitness in `fitness[from..]`; the first one on ties.
fn fittest(fitness: &[f64], from: usize) -> usize {
    let mut best = from;
    for i in (from + 1)..fitness.len() {
        if fitness[i] < fitness[best] {
            best = i;
        }
    }
    best
}

/// The fitter of `a` and `b`; `b` unless `a` is strictly fitter.
fn binary_tournament(fitness: &[f64], a: usize, b: usize) -> usize {
    if fitness[a] < fitness[b] {
        a
    } else {
        b
    }
}

fn tournament_child<R: Rng>(population: &[Genome], fitness: &[f64], rng: &mut R) -> Genome {
    let n = population.len();
    let i1 = rng.random_range(0..n);
    let i2 = rng.random_range(0..n);
    let i3 = rng.random_range(0..n);
    let i4 = rng.random_range(0..n);
    let len = population[0].len();
    let point = if len == 0 { 0 } else { rng.random_range(0..len) };

    let head = &population[binary_tournament(fitness, i1, i2)];
    let tail = &population[binary_tournament(fitness, i3, i4)];
    one_point(head, tail, point)
}

/// Child with `head[..point]` followed by `tail[point..]`.
pub fn one_point(head: &Genome, tail: &Genome, point: usize) -> Genome {
    head.as_slice()[..point]
        .iter()
        .chain(&tail.as_slice()[point..])
        .copied()
        .collect()
}

/// Child taking each gene from `a` or `b` by a fair coin flip.
pub fn uniform_child<R: Rng>(a: &Genome, b: &Genome, rng: &mut R) -> Genome {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| if rng.random_bool(0.5) { x } else { y })
        .collect()
}

/// Normalized cumulative distribution of `1 / fitness`.
///
/// Zero-fitness genomes have infinite weight; when any exist they share the
/// whole mass equally.
pub fn cumulative_weights(fitness: &[f64]) -> Vec<f64> {
    let zeros = fitness.iter().filter(|&&f| f <= 0.0).count();
    let weights: Vec<f64> = if zeros > 0 {
        fitness
            .iter()
            .map(|&f| if f <= 0.0 { 1.0 } else { 0.0 })
            .collect()
    } else {
        fitness.iter().map(|&f| 1.0 / f).collect()
    };

    let total: f64 = weights.iter().sum();
    let mut running = 0.0;
    weights
        .iter()
        .map(|w| {
            running += w;
            running / total
        })
        .collect()
}

/// Inverse-CDF sampling; falls back to the last index when rounding leaves
/// the draw above every cumulative value.
pub fn sample_cumulative<R: Rng>(cumulative: &[f64], rng: &mut R) -> usize {
    let draw: f64 = rng.random();
    cumulative
        .iter()
        .position(|&c| draw < c)
        .unwrap_or(cumulative.len() - 1)
}
