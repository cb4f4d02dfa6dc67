//! Error type shared by the graph, consensus and fusion layers.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FusionError>;

/// Errors produced while building graphs or running a fusion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FusionError {
    /// The fusion configuration or its inputs are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A node id does not belong to the graph.
    #[error("node {node} is out of range for a graph with {node_count} nodes")]
    UnknownNode { node: usize, node_count: usize },

    /// An edge from a node to itself was requested.
    #[error("self loop on node {0}")]
    SelfLoop(usize),

    /// Adding the edge would close a directed cycle.
    #[error("edge {tail} -> {head} would create a cycle")]
    Cycle { tail: usize, head: usize },

    /// Input DAGs are not defined over the same variables.
    #[error("input DAG {index} does not share the variable set of the first input")]
    NodeSetMismatch { index: usize },

    /// A DAG has an edge pointing backwards in the alpha order.
    #[error("input DAG {index} is not consistent with the alpha order")]
    OrderMismatch { index: usize },

    /// Exact tree-width was requested on a component too large to solve.
    #[error("exact tree-width limited to components of {limit} nodes, found {size}")]
    TreeWidthLimit { size: usize, limit: usize },

    /// The run finished without evaluating any genome within the bound.
    #[error("no DAG with tree-width <= {bound} was found")]
    NoFeasibleSolution { bound: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = FusionError::Cycle { tail: 2, head: 0 };
        assert_eq!(err.to_string(), "edge 2 -> 0 would create a cycle");

        let err = FusionError::TreeWidthLimit { size: 40, limit: 24 };
        assert!(err.to_string().contains("40"));

        let err = FusionError::NoFeasibleSolution { bound: 3 };
        assert_eq!(err.to_string(), "no DAG with tree-width <= 3 was found");
    }
}
