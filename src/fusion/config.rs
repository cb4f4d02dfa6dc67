//! Fusion configuration.
//!
//! [`FusionConfig`] holds all parameters that control one fusion run.

use super::crossover::CrossoverStrategy;
use crate::error::{FusionError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the genetic tree-width bounded fusion.
///
/// # Defaults
///
/// ```
/// use dag_fusion::fusion::FusionConfig;
///
/// let config = FusionConfig::default();
/// assert_eq!(config.population_size, 20);
/// assert_eq!(config.iterations, 1000);
/// assert_eq!(config.max_tree_width, 5);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use dag_fusion::fusion::{CrossoverStrategy, FusionConfig};
///
/// let config = FusionConfig::default()
///     .with_population_size(40)
///     .with_iterations(200)
///     .with_max_tree_width(3)
///     .with_crossover(CrossoverStrategy::Roulette)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FusionConfig {
    /// Number of genomes in the population.
    ///
    /// Slots 0 and 1 are elite slots, so at least 2 are required.
    pub population_size: usize,

    /// Number of generations. There is no early stop.
    pub iterations: usize,

    /// Tree-width bound the fused DAG must respect (at least 1).
    pub max_tree_width: usize,

    /// How offspring for slots `2..` are produced.
    pub crossover: CrossoverStrategy,

    /// Whether to evaluate genomes in parallel.
    ///
    /// Only has an effect with the `parallel` feature. Results do not depend
    /// on this flag.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            iterations: 1000,
            max_tree_width: 5,
            crossover: CrossoverStrategy::default(),
            parallel: true,
            seed: None,
        }
    }
}

impl FusionConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Sets the tree-width bound.
    pub fn with_max_tree_width(mut self, bound: usize) -> Self {
        self.max_tree_width = bound;
        self
    }

    /// Sets the crossover strategy.
    pub fn with_crossover(mut self, strategy: CrossoverStrategy) -> Self {
        self.crossover = strategy;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`FusionError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(FusionError::InvalidConfig(
                "population_size must be at least 2".into(),
            ));
        }
        if self.max_tree_width < 1 {
            return Err(FusionError::InvalidConfig(
                "max_tree_width must be at least 1".into(),
            ));
        }
        if self.iterations == 0 {
            return Err(FusionError::InvalidConfig(
                "iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
