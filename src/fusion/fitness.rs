//! Fitness evaluation and best-solution tracking.
//!
//! A genome is scored by materializing its DAG, measuring its tree-width and
//! its distance to the full union. Genomes over the bound keep their
//! distance but are scaled by `tree_width / bound`, so infeasibility is a
//! continuous penalty rather than a hard wall.

use super::catalog::EdgeCatalog;
use super::population::Genome;
use crate::error::Result;
use crate::graph::{Dag, DagDistance, TreeWidth};
use std::sync::Mutex;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Penalized fitness of a DAG at `distance` from the full union.
///
/// Lower is better. Feasible DAGs (`tree_width <= bound`) score their raw
/// distance.
///
/// ```
/// use dag_fusion::fusion::penalized_fitness;
///
/// assert_eq!(penalized_fitness(4.0, 2, 2), 4.0);
/// assert_eq!(penalized_fitness(4.0, 3, 2), 6.0);
/// ```
pub fn penalized_fitness(distance: f64, tree_width: usize, bound: usize) -> f64 {
    if tree_width > bound {
        distance * (tree_width as f64 / bound as f64)
    } else {
        distance
    }
}

/// Score of one population slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Penalized fitness (lower is better).
    pub fitness: f64,
    /// Exact tree-width of the slot's DAG.
    pub tree_width: usize,
}

/// The best feasible genome seen during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSolution {
    /// The genome.
    pub genome: Genome,
    /// The DAG it encodes.
    pub dag: Dag,
    /// Its fitness, equal to its distance to the full union.
    pub fitness: f64,
    /// Its tree-width, within the bound.
    pub tree_width: usize,
}

#[derive(Debug)]
struct Tracked {
    best: BestSolution,
    pass: u64,
    slot: usize,
}

/// Mutex-guarded best solution shared by evaluation workers.
///
/// A candidate replaces the current best only if it is strictly fitter.
/// Within a single evaluation pass, equal fitness is resolved in favour of
/// the lower slot, which makes the outcome independent of worker scheduling.
#[derive(Debug, Default)]
pub struct BestTracker {
    inner: Mutex<Option<Tracked>>,
}

impl BestTracker {
    /// Empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a feasible candidate evaluated in `pass` at `slot`.
    ///
    /// Returns whether it became the new best.
    pub fn offer(
        &self,
        pass: u64,
        slot: usize,
        genome: &Genome,
        dag: Dag,
        fitness: f64,
        tree_width: usize,
    ) -> bool {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let replace = match guard.as_ref() {
            None => true,
            Some(current) => {
                fitness < current.best.fitness
                    || (pass == current.pass
                        && fitness == current.best.fitness
                        && slot < current.slot)
            }
        };
        if replace {
            log::trace!(
                "new best at pass {pass} slot {slot}: fitness {fitness}, tree-width {tree_width}"
            );
            *guard = Some(Tracked {
                best: BestSolution {
                    genome: genome.clone(),
                    dag,
                    fitness,
                    tree_width,
                },
                pass,
                slot,
            });
        }
        replace
    }

    /// Copy of the best genome, if any.
    pub fn best_genome(&self) -> Option<Genome> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|t| t.best.genome.clone())
    }

    /// Best fitness, if any.
    pub fn best_fitness(&self) -> Option<f64> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|t| t.best.fitness)
    }

    /// Consumes the tracker, returning the best solution.
    pub fn into_best(self) -> Option<BestSolution> {
        self.inner
            .into_inner()
            .unwrap_or_else(|e| e.into_inner())
            .map(|t| t.best)
    }
}

/// Scores genomes against the full union.
pub struct FitnessEvaluator<'a, T: ?Sized, D: ?Sized> {
    catalog: &'a EdgeCatalog,
    full_union: &'a Dag,
    bound: usize,
    tree_width: &'a T,
    distance: &'a D,
}

impl<'a, T, D> FitnessEvaluator<'a, T, D>
where
    T: TreeWidth + ?Sized,
    D: DagDistance + ?Sized,
{
    /// Creates an evaluator. `full_union` also provides the variable set.
    pub fn new(
        catalog: &'a EdgeCatalog,
        full_union: &'a Dag,
        bound: usize,
        tree_width: &'a T,
        distance: &'a D,
    ) -> Self {
        Self {
            catalog,
            full_union,
            bound,
            tree_width,
            distance,
        }
    }

    /// Tree-width bound used for feasibility.
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Materializes and scores one genome.
    ///
    /// # Errors
    /// Propagates tree-width failures.
    pub fn evaluate_genome(&self, genome: &Genome) -> Result<(Dag, Evaluation)> {
        let dag = self.catalog.materialize(self.full_union, genome);
        let tree_width = self.tree_width.tree_width(&dag)?;
        let distance = self.distance.distance(&dag, self.full_union);
        let fitness = penalized_fitness(distance, tree_width, self.bound);
        Ok((dag, Evaluation { fitness, tree_width }))
    }

    /// Scores slot `slot` and offers it to `tracker` if feasible.
    fn evaluate_slot(
        &self,
        pass: u64,
        slot: usize,
        genome: &Genome,
        tracker: &BestTracker,
    ) -> Result<Evaluation> {
        let (dag, eval) = self.evaluate_genome(genome)?;
        if eval.tree_width <= self.bound {
            tracker.offer(pass, slot, genome, dag, eval.fitness, eval.tree_width);
        }
        Ok(eval)
    }

    /// Scores every slot of `population`, in parallel when requested.
    ///
    /// All slots finish before this returns. The first failure aborts the
    /// pass.
    ///
    /// # Errors
    /// Propagates tree-width failures.
    pub fn evaluate_population(
        &self,
        pass: u64,
        population: &[Genome],
        tracker: &BestTracker,
        parallel: bool,
    ) -> Result<Vec<Evaluation>> {
        #[cfg(feature = "parallel")]
        if parallel {
            return population
                .par_iter()
                .enumerate()
                .map(|(slot, genome)| self.evaluate_slot(pass, slot, genome, tracker))
                .collect();
        }
        #[cfg(not(feature = "parallel"))]
        let _ = parallel;

        population
            .iter()
            .enumerate()
            .map(|(slot, genome)| self.evaluate_slot(pass, slot, genome, tracker))
            .collect()
    }
}
