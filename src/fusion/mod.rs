//! Tree-width bounded DAG fusion by genetic search.
//!
//! Each candidate is a bit-vector over the distinct edges of the reconciled
//! inputs. A genome is scored by its distance to the full union, penalized
//! when its tree-width exceeds the bound. Two greedy bounded unions seed the
//! population; the best feasible genome is kept in slot 0 of every
//! generation.
//!
//! # Key Types
//!
//! - [`FusionConfig`]: Run parameters (population, iterations, bound, strategy)
//! - [`FusionRunner`]: Executes reconciliation, seeding and the evolutionary loop
//! - [`FusionResult`]: Best solution, intermediate DAGs, history and timings
//! - [`EdgeCatalog`]: Gene positions and edge frequencies
//! - [`CrossoverStrategy`]: Tournament or roulette breeding
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Matzkevich & Abramson (1992), "The topological fusion of Bayes nets"
//! - Puerta, Gámez & Peña (2021), "Fusion of Bayesian networks with bounded
//!   treewidth"

mod catalog;
mod config;
mod crossover;
mod fitness;
mod mutation;
mod population;
mod runner;

pub use catalog::EdgeCatalog;
pub use config::FusionConfig;
pub use crossover::{
    cumulative_weights, one_point, sample_cumulative, uniform_child, CrossoverStrategy,
};
pub use fitness::{penalized_fitness, BestSolution, BestTracker, Evaluation, FitnessEvaluator};
pub use mutation::{
    addition_probability, mutate_genome, mutate_population, removal_probability,
};
pub use population::{inclusion_probability, initial_population, random_genome, Genome};
pub use runner::{FusionResult, FusionRunner, FusionTimings};
