//! Error types for graph generation.

use walk_graph::GraphError;
use walk_scene::SceneError;

/// Result type for generation.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Errors that abort graph generation.
///
/// Rejected candidates are not errors. A ray query that fails for a single
/// candidate only drops that candidate.
///
/// # Example
///
/// ```
/// use walk_generate::GenerateError;
///
/// let err = GenerateError::invalid_config("spacing must be positive");
/// assert!(err.is_invalid_config());
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenerateError {
    /// The generator configuration violates a precondition.
    #[error("invalid generator configuration: {0}")]
    InvalidConfig(String),

    /// A scene query failed outside of candidate evaluation.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Writing to the graph store failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The dedicated worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl GenerateError {
    /// Creates an invalid configuration error with the given message.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_errors_convert() {
        let err: GenerateError = GraphError::invalid_argument("bad position").into();
        assert!(matches!(err, GenerateError::Graph(_)));
        assert!(!err.is_invalid_config());
        assert!(err.to_string().contains("bad position"));
    }
}
