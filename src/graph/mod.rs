//! Graph primitives and metrics.
//!
//! - [`Dag`], [`Edge`], [`NodeId`]: directed acyclic graphs over a named
//!   variable set
//! - [`MoralGraph`]: undirected moralization of a DAG
//! - [`TreeWidth`]: tree-width oracles ([`ExactTreeWidth`], [`MinFillTreeWidth`])
//! - [`DagDistance`]: structural distances ([`MoralHammingDistance`],
//!   [`StructuralHammingDistance`])

mod dag;
mod distance;
mod moral;
mod treewidth;

pub use dag::{Dag, Edge, NodeId};
pub use distance::{DagDistance, MoralHammingDistance, StructuralHammingDistance};
pub use moral::MoralGraph;
pub use treewidth::{ExactTreeWidth, MinFillTreeWidth, TreeWidth, MAX_EXACT_COMPONENT};
