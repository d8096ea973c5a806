//! Axis-aligned bounds of mesh and scene geometry.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned box in world coordinates.
///
/// Starts out inverted ([`Aabb::empty`]) and grows as points are folded in.
///
/// # Example
///
/// ```
/// use walk_mesh::{Aabb, Point3};
///
/// let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 2.0, 1.0)];
/// let aabb = Aabb::from_points(points.iter());
///
/// assert!(aabb.contains(&Point3::new(2.0, 1.0, 0.5)));
/// assert!(!aabb.contains(&Point3::new(2.0, 3.0, 0.5)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Lowest x, y and z seen.
    pub min: Point3<f64>,
    /// Highest x, y and z seen.
    pub max: Point3<f64>,
}

impl Aabb {
    /// A box containing nothing; `min` is `+inf` and `max` is `-inf`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::from([f64::INFINITY; 3]),
            max: Point3::from([f64::NEG_INFINITY; 3]),
        }
    }

    /// Smallest box holding every point, or [`Aabb::empty`] for none.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        points.fold(Self::empty(), |mut aabb, p| {
            aabb.include(p);
            aabb
        })
    }

    /// Returns `true` while no point has been included.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min[axis] > self.max[axis])
    }

    /// Inclusive containment test.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        (0..3).all(|axis| (self.min[axis]..=self.max[axis]).contains(&point[axis]))
    }

    /// Grow the box to cover `point`.
    pub fn include(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
