//! Human-factors analysis of architectural spaces.
//!
//! This umbrella crate re-exports the walk-* crates. All of them are Layer 0
//! (zero Bevy dependencies) and can be used in CLI tools, servers or
//! language bindings.
//!
//! # Quick Start
//!
//! ```
//! use walk::prelude::*;
//!
//! // A 5 x 5 floor with a 0.15 high step along its +x half
//! let floor = walk::mesh::primitives::plane(-2.5, -2.5, 2.5, 2.5, 0.0);
//! let step = walk::mesh::primitives::box_mesh(
//!     Point3::new(0.5, -2.5, 0.0),
//!     Point3::new(2.5, 2.5, 0.15),
//! );
//! let scene = Scene::new(&[floor, step], SceneConfig::default()).unwrap();
//!
//! let config = GeneratorConfig::new().with_start(Point3::new(-2.0, 0.0, 1.0));
//! let mut graph = generate_graph(&scene, config).unwrap();
//! graph.compress();
//! store_energy_expenditure(&mut graph).unwrap();
//!
//! let last = graph.len() - 1;
//! let path = shortest_path(&graph, ENERGY_EXPENDITURE, 0, last).unwrap();
//! assert!(path.is_some());
//! ```
//!
//! # Module Organization
//!
//! - [`mesh`] - Mesh input: `IndexedMesh`, rotation, bounds, fixture primitives
//! - [`scene`] - BVH-backed ray queries over one or more meshes
//! - [`graph`] - Graph store, named costs, aggregates and cost algorithms
//! - [`generate`] - Accessibility graph generation over a scene
//! - [`path`] - Shortest paths and distance/predecessor matrices

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Mesh input: `IndexedMesh`, rotation, bounds, fixture primitives.
pub use walk_mesh as mesh;

/// BVH-backed ray queries over one or more meshes.
pub use walk_scene as scene;

/// Graph store, named costs, aggregates and cost algorithms.
pub use walk_graph as graph;

/// Accessibility graph generation over a scene.
pub use walk_generate as generate;

/// Shortest paths and distance/predecessor matrices.
pub use walk_path as path;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for scene analysis.
///
/// # Usage
///
/// ```
/// use walk::prelude::*;
/// ```
pub mod prelude {
    // Geometry
    pub use walk_mesh::{IndexedMesh, Point3, Vector3};

    // Scene
    pub use walk_scene::{Precision, RayHit, Scene, SceneConfig};

    // Graph
    pub use walk_graph::{
        AggregationType, CROSS_SLOPE, CostAlgorithm, ENERGY_EXPENDITURE, Graph,
        store_cross_slope, store_energy_expenditure,
    };

    // Generation
    pub use walk_generate::{GeneratorConfig, GraphGenerator, Parallelism, generate_graph};

    // Paths
    pub use walk_path::{DistPredMatrix, Path, PathEngine, dist_pred_matrix, shortest_path};
}

// =============================================================================
// Tests
// =============================================================================
