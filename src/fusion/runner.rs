//! Fusion evolutionary loop.
//!
//! [`FusionRunner`] orchestrates one complete fusion:
//! reconcile → full union → catalog → greedy seeds → initial population →
//! {evaluate → crossover → evaluate → mutate} × iterations.

use super::catalog::EdgeCatalog;
use super::config::FusionConfig;
use super::fitness::{BestSolution, BestTracker, Evaluation, FitnessEvaluator};
use super::mutation::mutate_population;
use super::population::{initial_population, Genome};
use crate::consensus::{full_union, greedy_union, Reconciled};
use crate::error::{FusionError, Result};
use crate::graph::{Dag, DagDistance, ExactTreeWidth, MoralHammingDistance, NodeId, TreeWidth};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// Wall-clock breakdown of a fusion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FusionTimings {
    /// Whole run, from validation to the last generation.
    pub total: Duration,
    /// Building the full union.
    pub union: Duration,
    /// Building both greedy seeds.
    pub greedy: Duration,
}

/// Result of a fusion run.
#[derive(Debug, Clone)]
pub struct FusionResult {
    /// The best feasible solution, or `None` if no evaluated genome was
    /// within the bound.
    pub best: Option<BestSolution>,

    /// Tree-width bound of the run.
    pub max_tree_width: usize,

    /// Common variable order the inputs were reconciled onto.
    pub alpha: Vec<NodeId>,

    /// Unbounded union of the reconciled inputs.
    pub full_union: Dag,

    /// Greedy bounded union used to seed slot 0.
    pub greedy_dag: Dag,

    /// Number of distinct edges (genome length).
    pub catalog_size: usize,

    /// Number of generations executed.
    pub generations: usize,

    /// Best feasible fitness after each generation (`f64::INFINITY` while
    /// none was found).
    pub fitness_history: Vec<f64>,

    /// Timing breakdown.
    pub timings: FusionTimings,
}

impl FusionResult {
    /// The fused DAG, if a feasible one was found.
    pub fn best_dag(&self) -> Option<&Dag> {
        self.best.as_ref().map(|b| &b.dag)
    }

    /// Fitness of the fused DAG, if a feasible one was found.
    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|b| b.fitness)
    }

    /// Returns the best solution or [`FusionError::NoFeasibleSolution`].
    ///
    /// # Errors
    /// Fails if no genome within the bound was ever evaluated.
    pub fn require_feasible(self) -> Result<BestSolution> {
        let bound = self.max_tree_width;
        self.best.ok_or(FusionError::NoFeasibleSolution { bound })
    }
}

/// Executes the fusion.
///
/// # Usage
///
/// ```
/// use dag_fusion::fusion::{FusionConfig, FusionRunner};
/// use dag_fusion::graph::{Dag, Edge};
///
/// let names = ["A", "B", "C", "D"];
/// let a = Dag::from_edges(names, [Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 3)]).unwrap();
/// let b = Dag::from_edges(names, [Edge::new(0, 2), Edge::new(1, 3)]).unwrap();
///
/// let config = FusionConfig::default()
///     .with_max_tree_width(2)
///     .with_iterations(20)
///     .with_population_size(8)
///     .with_seed(42);
/// let result = FusionRunner::run(&[a, b], &config).unwrap();
/// let best = result.require_feasible().unwrap();
/// assert!(best.tree_width <= 2);
/// ```
pub struct FusionRunner;

impl FusionRunner {
    /// Runs the fusion with exact tree-width and the structural moral
    /// Hamming distance.
    ///
    /// # Errors
    /// Fails on invalid configuration or inputs, and propagates tree-width
    /// failures.
    pub fn run(dags: &[Dag], config: &FusionConfig) -> Result<FusionResult> {
        Self::run_with(
            dags,
            config,
            &ExactTreeWidth::default(),
            &MoralHammingDistance,
        )
    }

    /// Runs the fusion with caller-supplied tree-width and distance.
    ///
    /// # Errors
    /// Fails on invalid configuration or inputs, and propagates tree-width
    /// failures.
    pub fn run_with<T, D>(
        dags: &[Dag],
        config: &FusionConfig,
        tree_width: &T,
        distance: &D,
    ) -> Result<FusionResult>
    where
        T: TreeWidth + ?Sized,
        D: DagDistance + ?Sized,
    {
        let started = Instant::now();
        config.validate()?;
        if dags.is_empty() {
            return Err(FusionError::InvalidConfig(
                "at least one input DAG is required".into(),
            ));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let reconciled = Reconciled::from_dags(dags)?;

        let union_started = Instant::now();
        let union = full_union(&reconciled.alpha, &reconciled.dags)?;
        let union_time = union_started.elapsed();

        let catalog = EdgeCatalog::build(&reconciled.dags);
        let bound = config.max_tree_width;
        log::info!(
            "fusing {} DAGs over {} variables: {} distinct edges, tree-width bound {}",
            dags.len(),
            union.node_count(),
            catalog.len(),
            bound
        );

        let greedy_started = Instant::now();
        let ranked = catalog.ranked_edges();
        let greedy = greedy_union(&union, &ranked, bound, tree_width)?;
        let conservative = greedy_union(&union, &ranked, bound - 1, tree_width)?;
        let greedy_time = greedy_started.elapsed();

        let population = initial_population(
            &catalog,
            catalog.genome_of(&greedy),
            catalog.genome_of(&conservative),
            config.population_size,
            &mut rng,
        );

        let evaluator = FitnessEvaluator::new(&catalog, &union, bound, tree_width, distance);
        let mut evolution = Evolution::new(evaluator, population, config, rng);
        let mut fitness_history = Vec::with_capacity(config.iterations);

        for generation in 0..config.iterations {
            evolution.generation()?;
            let best = evolution.tracker.best_fitness();
            fitness_history.push(best.unwrap_or(f64::INFINITY));
            log::debug!(
                "generation {}: best fitness {:?}, {} of {} within bound",
                generation + 1,
                best,
                evolution.feasible_count(),
                config.population_size
            );
        }

        let best = evolution.tracker.into_best();
        let total = started.elapsed();
        match &best {
            Some(b) => log::info!(
                "fusion finished in {:?}: fitness {}, tree-width {}, {} edges",
                total,
                b.fitness,
                b.tree_width,
                b.dag.edge_count()
            ),
            None => log::warn!(
                "fusion finished in {:?} without a DAG of tree-width <= {}",
                total,
                bound
            ),
        }

        Ok(FusionResult {
            best,
            max_tree_width: bound,
            alpha: reconciled.alpha,
            full_union: union,
            greedy_dag: greedy,
            catalog_size: catalog.len(),
            generations: config.iterations,
            fitness_history,
            timings: FusionTimings {
                total,
                union: union_time,
                greedy: greedy_time,
            },
        })
    }
}

/// Mutable state of one run between generations.
struct Evolution<'a, T: ?Sized, D: ?Sized> {
    evaluator: FitnessEvaluator<'a, T, D>,
    config: &'a FusionConfig,
    population: Vec<Genome>,
    evaluations: Vec<Evaluation>,
    tracker: BestTracker,
    pass: u64,
    rng: StdRng,
}

impl<'a, T, D> Evolution<'a, T, D>
where
    T: TreeWidth + ?Sized,
    D: DagDistance + ?Sized,
{
    fn new(
        evaluator: FitnessEvaluator<'a, T, D>,
        population: Vec<Genome>,
        config: &'a FusionConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            evaluator,
            config,
            population,
            evaluations: Vec::new(),
            tracker: BestTracker::new(),
            pass: 0,
            rng,
        }
    }

    /// One generation: evaluate, crossover, evaluate, mutate.
    fn generation(&mut self) -> Result<()> {
        self.evaluate()?;
        self.crossover();
        self.evaluate()?;
        self.mutate();
        Ok(())
    }

    fn evaluate(&mut self) -> Result<()> {
        self.evaluations = self.evaluator.evaluate_population(
            self.pass,
            &self.population,
            &self.tracker,
            self.config.parallel,
        )?;
        self.pass += 1;
        Ok(())
    }

    fn crossover(&mut self) {
        let fitness: Vec<f64> = self.evaluations.iter().map(|e| e.fitness).collect();
        let best = self.tracker.best_genome();
        self.population = self.config.crossover.breed(
            &self.population,
            &fitness,
            best.as_ref(),
            &mut self.rng,
        );
    }

    fn mutate(&mut self) {
        let widths: Vec<usize> = self.evaluations.iter().map(|e| e.tree_width).collect();
        mutate_population(
            &mut self.population,
            &widths,
            self.evaluator.bound(),
            &mut self.rng,
        );
    }

    fn feasible_count(&self) -> usize {
        let bound = self.evaluator.bound();
        self.evaluations
            .iter()
            .filter(|e| e.tree_width <= bound)
            .count()
    }
}

// ============================================================================
// Tests
// ============================================================================
