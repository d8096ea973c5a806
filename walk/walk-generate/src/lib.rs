//! Accessibility graph generation.
//!
//! [`GraphGenerator`] grows a [`Graph`] over a [`Scene`] by breadth-first
//! expansion on a horizontal lattice:
//!
//! 1. The start point is dropped onto the scene with a downward ray.
//! 2. Every expanded node probes the lattice offsets around it and drops
//!    each probe onto the scene the same way.
//! 3. A probe becomes a child when the height change stays within the step
//!    limit, the edge angle within the slope limit, and the two points can
//!    see each other (possibly over a ledge no taller than a step).
//!
//! Edges are written under the default cost with their 3D length as score.
//! The generated graph is left uncompressed.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use walk_generate::{GeneratorConfig, Point3, generate_graph};
//! use walk_mesh::primitives::plane;
//! use walk_scene::{Scene, SceneConfig};
//!
//! let floor = plane(-1.5, -1.5, 1.5, 1.5, 0.0);
//! let scene = Scene::from_mesh(&floor, SceneConfig::default()).unwrap();
//!
//! let config = GeneratorConfig::new()
//!     .with_start(Point3::new(0.0, 0.0, 0.5))
//!     .with_max_nodes(1000);
//! let mut graph = generate_graph(&scene, config).unwrap();
//! graph.compress();
//!
//! assert_eq!(graph.len(), 9);
//! assert_eq!(graph.outgoing_edges(0, "").unwrap().len(), 8);
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

mod config;
mod error;
mod generator;

pub use config::{GeneratorConfig, Parallelism};
pub use error::{GenerateError, GenerateResult};
pub use generator::{GenerationStats, GraphGenerator, generate_graph};

pub use nalgebra::{Point3, Vector3};
pub use walk_graph::Graph;
pub use walk_scene::Scene;
