//! Sparse graph store for accessibility graphs.
//!
//! A [`Graph`] holds 3D nodes (interned by rounded position) and directed
//! edges scored under one or more named cost types:
//!
//! - The **default** cost (`""`) defines topology. The generator writes
//!   edge lengths here.
//! - **Alternate** costs such as [`CROSS_SLOPE`] or [`ENERGY_EXPENDITURE`]
//!   override scores of existing default edges.
//!
//! Writes are buffered and merged into a compressed sparse row layout by
//! [`Graph::compress`]; every read goes through a [`CsrView`].
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use walk_graph::{AggregationType, Graph, Point3, store_energy_expenditure};
//!
//! let mut graph = Graph::new();
//! let a = graph.intern(Point3::new(0.0, 0.0, 0.0)).unwrap();
//! let b = graph.intern(Point3::new(1.0, 0.0, 0.2)).unwrap();
//! graph.add_edge(a, b, 1.02, "").unwrap();
//! graph.add_edge(b, a, 1.02, "").unwrap();
//! graph.compress();
//!
//! store_energy_expenditure(&mut graph).unwrap();
//! let energy = graph.csr_view("EnergyExpenditure").unwrap();
//! // Uphill costs more than downhill
//! assert!(energy.get(a, b).unwrap() > energy.get(b, a).unwrap());
//!
//! let degree = graph.aggregate("", AggregationType::Count, true).unwrap();
//! assert_eq!(degree, vec![1.0, 1.0]);
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

mod aggregate;
mod attributes;
mod cost_algorithms;
mod csr;
mod edge;
mod error;
mod graph;
mod node;

pub use aggregate::AggregationType;
pub use cost_algorithms::{
    CROSS_SLOPE, CostAlgorithm, ENERGY_EXPENDITURE, calculate_cross_slope,
    calculate_energy_expenditure, energy_expenditure, store_cross_slope, store_energy_expenditure,
};
pub use csr::CsrView;
pub use edge::{EdgeSet, IntEdge};
pub use error::{GraphError, GraphResult};
pub use graph::{DEFAULT_COST, Graph, GraphState};
pub use node::{Node, NodeKey, ROUNDING_PRECISION, snap_point, snap_to_precision};

pub use nalgebra::Point3;
