//! Mesh input types for walkability analysis.
//!
//! This crate provides the geometry seam consumed by the ray-traced scene:
//!
//! - [`IndexedMesh`] - A tagged triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`primitives`] - Small fixture meshes (planes, boxes, heightfields)
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Servers
//! - Language bindings
//!
//! # Coordinate System
//!
//! The analysis world is **Z-up**: the walkable surface is the upper
//! envelope of the geometry as seen by rays cast along `-Z`. Geometry
//! authored Y-up can be converted with [`IndexedMesh::rotate_x_90`].
//!
//! # Example
//!
//! ```
//! use walk_mesh::IndexedMesh;
//!
//! let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! let indices = [0, 1, 2];
//!
//! let mut mesh = IndexedMesh::from_raw(&positions, &indices)
//!     .unwrap()
//!     .with_name("floor")
//!     .with_id(7);
//! mesh.rotate_euler_degrees(0.0, 0.0, 90.0);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert_eq!(mesh.id, 7);
//! ```
//!
//! # Quality Standards
//!
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod error;
mod mesh;
pub mod primitives;
mod triangle;

pub use bounds::Aabb;
pub use error::{MeshError, MeshResult};
pub use mesh::IndexedMesh;
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
