//! Tree-width bounded fusion of directed acyclic graphs.
//!
//! Given several DAGs over the same variables (typically Bayesian network
//! structures learned from different sources), this crate builds one
//! consensus DAG that stays as close as possible to the union of the inputs
//! while keeping its tree-width at or below a user bound, so that exact
//! inference on the result remains tractable.
//!
//! - **Graph**: DAG model, moralization, exact and heuristic tree-width,
//!   structural distances.
//! - **Consensus**: common variable order, covered-arc reversal onto that
//!   order, full union and greedy bounded union.
//! - **Fusion**: genetic search over edge subsets, seeded with the greedy
//!   unions and evaluated in parallel.
//!
//! # Example
//!
//! ```
//! use dag_fusion::fusion::{FusionConfig, FusionRunner};
//! use dag_fusion::graph::{Dag, Edge};
//!
//! let names = ["A", "B", "C", "D"];
//! let inputs = [
//!     Dag::from_edges(names, [Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 3)])?,
//!     Dag::from_edges(names, [Edge::new(0, 2), Edge::new(1, 3), Edge::new(0, 3)])?,
//! ];
//!
//! let config = FusionConfig::default()
//!     .with_max_tree_width(2)
//!     .with_iterations(30)
//!     .with_seed(7);
//! let fused = FusionRunner::run(&inputs, &config)?.require_feasible()?;
//! assert!(fused.tree_width <= 2);
//! # Ok::<(), dag_fusion::FusionError>(())
//! ```

pub mod consensus;
pub mod error;
pub mod fusion;
pub mod graph;

pub use error::{FusionError, Result};
