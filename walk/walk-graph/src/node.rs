//! Graph nodes and positional rounding.
//!
//! Ray casts that land on the same spot from different directions differ
//! by float noise. Nodes are therefore identified by their position
//! quantized to [`ROUNDING_PRECISION`]: two positions in the same bucket on
//! every axis are the same node.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// World-space tolerance within which two positions are the same node.
pub const ROUNDING_PRECISION: f64 = 1e-4;

/// Snap a coordinate to the rounding grid.
///
/// # Example
///
/// ```
/// use walk_graph::snap_to_precision;
///
/// assert!((snap_to_precision(1.000_04) - 1.0).abs() < 1e-12);
/// assert!((snap_to_precision(1.000_06) - 1.0001).abs() < 1e-12);
/// ```
#[must_use]
pub fn snap_to_precision(value: f64) -> f64 {
    (value / ROUNDING_PRECISION).round() * ROUNDING_PRECISION
}

/// Snap every coordinate of a point to the rounding grid.
#[must_use]
pub fn snap_point(point: &Point3<f64>) -> Point3<f64> {
    point.map(snap_to_precision)
}

/// Quantized fingerprint of a position, used for node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey([i64; 3]);

impl NodeKey {
    /// Quantize a position. Returns `None` for non-finite coordinates.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Coordinates beyond ±9e14 world units are not meaningful scenes
    pub fn from_position(position: &Point3<f64>) -> Option<Self> {
        if !position.iter().all(|v| v.is_finite()) {
            return None;
        }
        let bucket = |v: f64| (v / ROUNDING_PRECISION).round() as i64;
        Some(Self([bucket(position.x), bucket(position.y), bucket(position.z)]))
    }
}

/// A node of the graph: a world position and its dense id.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// Position in world coordinates (Z-up).
    pub position: Point3<f64>,
    /// Id assigned by the graph at insertion, dense from zero.
    pub id: usize,
}

impl Node {
    /// Create a node.
    #[must_use]
    pub const fn new(position: Point3<f64>, id: usize) -> Self {
        Self { position, id }
    }

    /// Straight-line distance to another node.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }

    /// Returns `true` if both nodes round to the same position.
    #[must_use]
    pub fn same_position(&self, other: &Self) -> bool {
        NodeKey::from_position(&self.position) == NodeKey::from_position(&other.position)
    }
}
