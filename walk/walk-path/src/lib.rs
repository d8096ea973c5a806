//! Shortest paths over a compressed accessibility graph.
//!
//! Every query runs against one named cost of a [`Graph`]:
//!
//! - [`shortest_path`]: one pair, `None` when the target is unreachable
//! - [`shortest_paths`]: many pairs, one search per distinct source
//! - [`all_pairs_paths`]: every ordered pair
//! - [`dist_pred_matrix`]: distance and predecessor matrices
//!
//! [`PathEngine`] holds the checked view for repeated queries. Scores must
//! be non-negative; a negative score fails the query with
//! [`PathError::NegativeCost`].
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use walk_graph::{Graph, Point3};
//! use walk_path::{dist_pred_matrix, shortest_path};
//!
//! let mut graph = Graph::new();
//! let a = graph.intern(Point3::new(0.0, 0.0, 0.0)).unwrap();
//! let b = graph.intern(Point3::new(1.0, 0.0, 0.0)).unwrap();
//! graph.add_edge(a, b, 1.0, "").unwrap();
//! graph.compress();
//!
//! let path = shortest_path(&graph, "", a, b).unwrap().unwrap();
//! assert_eq!(path.nodes(), vec![a, b]);
//!
//! let matrix = dist_pred_matrix(&graph, "").unwrap();
//! assert_eq!(matrix.predecessor(a, b), Some(a));
//! assert!(matrix.distance(b, a).is_infinite());
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

mod dijkstra;
mod engine;
mod error;
mod path;

pub use dijkstra::ShortestPathTree;
pub use engine::{
    DistPredMatrix, PathEngine, all_pairs_paths, dist_pred_matrix, shortest_path, shortest_paths,
};
pub use error::{PathError, PathResult};
pub use path::{Path, PathMember};

pub use walk_graph::Graph;
