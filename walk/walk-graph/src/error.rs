//! Error types for graph storage and cost derivation.

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while writing to or reading from a [`Graph`](crate::Graph).
///
/// A failed write leaves the graph exactly as it was before the call.
///
/// # Example
///
/// ```
/// use walk_graph::{Graph, GraphError, Point3};
///
/// let mut graph = Graph::new();
/// let a = graph.intern(Point3::new(0.0, 0.0, 0.0)).unwrap();
/// let b = graph.intern(Point3::new(1.0, 0.0, 0.0)).unwrap();
///
/// // No default edge a -> b yet
/// let err = graph.add_edge(a, b, 2.0, "Stairs").unwrap_err();
/// assert!(matches!(err, GraphError::EdgeNotInDefault { .. }));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GraphError {
    /// A malformed input such as a non-finite score or position.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A node id outside the graph.
    #[error("node id {id} is out of range (graph has {len} nodes)")]
    OutOfRange {
        /// The offending id.
        id: usize,
        /// Number of nodes in the graph.
        len: usize,
    },

    /// A cost name that was never written.
    #[error("unknown cost type {0:?}")]
    UnknownCost(String),

    /// An alternate-cost write for a pair with no default edge.
    #[error("edge {parent} -> {child} has no default cost, cannot set {cost:?}")]
    EdgeNotInDefault {
        /// Parent id.
        parent: usize,
        /// Child id.
        child: usize,
        /// The alternate cost name.
        cost: String,
    },

    /// An operation that needs the CSR ran on an uncompressed graph.
    #[error("graph must be compressed before this operation")]
    NotCompressed,
}

impl GraphError {
    /// Creates an invalid argument error with the given message.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates an unknown cost error for the given name.
    #[must_use]
    pub fn unknown_cost(name: impl Into<String>) -> Self {
        Self::UnknownCost(name.into())
    }

    /// Returns `true` if this is an out-of-range error.
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /// Returns `true` if this is an unknown cost error.
    #[must_use]
    pub const fn is_unknown_cost(&self) -> bool {
        matches!(self, Self::UnknownCost(_))
    }
}
