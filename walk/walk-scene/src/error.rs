//! Error types for scene construction and ray queries.

use walk_mesh::MeshError;

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors that can occur while building or querying a [`Scene`](crate::Scene).
///
/// Per-ray numerical problems (NaN or infinite inputs) are not errors; those
/// queries report a miss. Only caller mistakes that make a query meaningless
/// are surfaced here.
///
/// # Example
///
/// ```
/// use walk_scene::SceneError;
///
/// let err = SceneError::invalid_argument("direction has zero length");
/// assert!(err.is_invalid_argument());
/// assert!(err.to_string().contains("zero length"));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SceneError {
    /// A query argument was malformed (zero direction, mismatched batch lengths).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The acceleration structure could not be built.
    ///
    /// Happens when no mesh contributes a single usable triangle.
    #[error("BVH build failed: {0}")]
    BuildFailure(String),

    /// The scene configuration is out of range.
    #[error("invalid scene configuration: {0}")]
    InvalidConfig(String),

    /// An input mesh failed validation.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

impl SceneError {
    /// Creates an invalid argument error with the given message.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates a build failure error with the given message.
    #[must_use]
    pub fn build_failure(message: impl Into<String>) -> Self {
        Self::BuildFailure(message.into())
    }

    /// Creates an invalid configuration error with the given message.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns `true` if this is an invalid argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns `true` if this is a build failure.
    #[must_use]
    pub const fn is_build_failure(&self) -> bool {
        matches!(self, Self::BuildFailure(_))
    }
}
