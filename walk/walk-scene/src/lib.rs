//! Ray-traced scene for walkability analysis.
//!
//! A [`Scene`] owns a triangle soup gathered from one or more
//! [`IndexedMesh`](walk_mesh::IndexedMesh) inputs and a bounding volume
//! hierarchy over it. It answers three query families:
//!
//! - **Occlusion** - is anything hit within `max_t`?
//! - **Nearest-hit distance** - how far, and which surface?
//! - **Nearest-hit point** - where, in world space?
//!
//! Each query has a batch form that fans out over the rayon pool and
//! returns results in input order.
//!
//! # Precision
//!
//! The BVH is built once in either single ([`Precision::Fast`]) or double
//! ([`Precision::Precise`]) precision. Double precision avoids walker-visible
//! drift for geometry far from the origin.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use walk_mesh::primitives::{box_mesh, plane};
//! use walk_scene::{Point3, Scene, SceneConfig, Vector3};
//!
//! let floor = plane(-10.0, -10.0, 10.0, 10.0, 0.0);
//! let wall = box_mesh(Point3::new(2.0, -10.0, 0.0), Point3::new(2.2, 10.0, 3.0));
//! let scene = Scene::new(&[floor, wall], SceneConfig::default()).unwrap();
//!
//! // Blocked by the wall
//! let eye = Point3::new(0.0, 0.0, 1.0);
//! assert!(scene.ray_occluded(eye, Vector3::x(), -1.0).unwrap());
//!
//! // Ground below the eye
//! let ground = scene.ray_point(eye, -Vector3::z(), -1.0).unwrap().unwrap();
//! assert!(ground.z.abs() < 1e-9);
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

mod bvh;
mod config;
mod error;
mod intersect;
mod scalar;
mod scene;

pub use bvh::BvhStats;
pub use config::{Precision, SceneConfig};
pub use error::{SceneError, SceneResult};
pub use scene::{RayHit, Scene};

pub use nalgebra::{Point3, Vector3};
