//! Error types for mesh ingest.

use thiserror::Error;

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur while ingesting mesh data.
///
/// # Example
///
/// ```
/// use walk_mesh::IndexedMesh;
///
/// // Index 3 references a vertex that does not exist
/// let err = IndexedMesh::from_raw(&[0.0; 9], &[0, 1, 3]).unwrap_err();
/// assert!(err.is_invalid_mesh());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MeshError {
    /// The coordinate or index arrays were malformed.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// A face referenced a vertex outside the vertex array.
    #[error("face {face} references vertex {index} (mesh has {vertex_count} vertices)")]
    IndexOutOfRange {
        /// Face index.
        face: usize,
        /// The offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}

impl MeshError {
    /// Creates an invalid mesh error with the given message.
    #[must_use]
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh(message.into())
    }

    /// Returns `true` for any malformed-input error.
    #[must_use]
    pub const fn is_invalid_mesh(&self) -> bool {
        matches!(self, Self::InvalidMesh(_) | Self::IndexOutOfRange { .. })
    }
}
