//! Error types for path queries.

use walk_graph::GraphError;

/// Result type for path queries.
pub type PathResult<T> = Result<T, PathError>;

/// Errors that can occur while computing shortest paths.
///
/// An unreachable destination is not an error; queries report it as `None`.
///
/// # Example
///
/// ```
/// use walk_path::PathError;
///
/// let err = PathError::NegativeCost { parent: 3, child: 4, score: -1.0 };
/// assert!(err.is_negative_cost());
/// assert!(err.to_string().contains("3 -> 4"));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PathError {
    /// An edge under the requested cost has a negative score.
    #[error("edge {parent} -> {child} has negative score {score}")]
    NegativeCost {
        /// Edge source.
        parent: usize,
        /// Edge target.
        child: usize,
        /// The offending score.
        score: f64,
    },

    /// A source or destination is not a node of the graph.
    #[error("node id {id} is out of range (graph has {len} nodes)")]
    OutOfRange {
        /// The requested id.
        id: usize,
        /// Number of nodes in the graph.
        len: usize,
    },

    /// The graph rejected the query (unknown cost, uncompressed graph).
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl PathError {
    /// Returns `true` if a negative edge score stopped the query.
    #[must_use]
    pub const fn is_negative_cost(&self) -> bool {
        matches!(self, Self::NegativeCost { .. })
    }

    /// Returns `true` if a node id was out of range.
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::OutOfRange { .. } | Self::Graph(GraphError::OutOfRange { .. })
        )
    }

    /// Returns `true` if the cost name is not registered on the graph.
    #[must_use]
    pub const fn is_unknown_cost(&self) -> bool {
        matches!(self, Self::Graph(GraphError::UnknownCost(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_errors_keep_their_kind() {
        let err: PathError = GraphError::unknown_cost("Stairs").into();
        assert!(err.is_unknown_cost());
        assert!(!err.is_out_of_range());
        assert!(err.to_string().contains("Stairs"));
    }

    #[test]
    fn out_of_range_display() {
        let err = PathError::OutOfRange { id: 9, len: 4 };
        assert!(err.is_out_of_range());
        assert!(err.to_string().contains("9"));
    }
}
