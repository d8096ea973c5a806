//! Floating-point precision used inside the BVH.
//!
//! The scene is built once in either single or double precision. All
//! intersection math is written against [`SceneScalar`], so both backends
//! share one implementation.

use nalgebra::{Point3, RealField, Vector3};

/// A floating-point type the BVH can be built over.
///
/// Implemented for `f32` (fast mode) and `f64` (precise mode).
pub trait SceneScalar: RealField + Copy + Send + Sync + 'static {
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;
    /// Positive infinity.
    const INFINITY: Self;
    /// Determinant magnitude below which a ray is parallel to a triangle.
    const PARALLEL_EPSILON: Self;
    /// Barycentric slack so rays through shared triangle edges still hit.
    const EDGE_TOLERANCE: Self;
    /// Smallest accepted hit distance along a ray.
    const MIN_T: Self;

    /// Convert from `f64`, rounding if needed.
    fn from_f64_lossy(value: f64) -> Self;

    /// Widen to `f64`.
    fn to_f64(self) -> f64;

    /// Absolute value.
    #[inline]
    fn magnitude(self) -> Self {
        if self < Self::ZERO { -self } else { self }
    }

    /// Smaller of two values (NaN-propagating toward `other`).
    #[inline]
    fn lesser(self, other: Self) -> Self {
        if self < other { self } else { other }
    }

    /// Larger of two values (NaN-propagating toward `other`).
    #[inline]
    fn greater(self, other: Self) -> Self {
        if self > other { self } else { other }
    }
}

impl SceneScalar for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const INFINITY: Self = f32::INFINITY;
    const PARALLEL_EPSILON: Self = 1e-8;
    const EDGE_TOLERANCE: Self = 1e-5;
    const MIN_T: Self = 1e-6;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation is the point of fast mode
    fn from_f64_lossy(value: f64) -> Self {
        value as Self
    }

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl SceneScalar for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const INFINITY: Self = f64::INFINITY;
    const PARALLEL_EPSILON: Self = 1e-12;
    const EDGE_TOLERANCE: Self = 1e-9;
    const MIN_T: Self = 1e-10;

    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

/// Convert a double-precision point into the scene precision.
#[inline]
pub(crate) fn point_from_f64<T: SceneScalar>(p: &Point3<f64>) -> Point3<T> {
    Point3::new(
        T::from_f64_lossy(p.x),
        T::from_f64_lossy(p.y),
        T::from_f64_lossy(p.z),
    )
}

/// Convert a double-precision vector into the scene precision.
#[inline]
pub(crate) fn vector_from_f64<T: SceneScalar>(v: &Vector3<f64>) -> Vector3<T> {
    Vector3::new(
        T::from_f64_lossy(v.x),
        T::from_f64_lossy(v.y),
        T::from_f64_lossy(v.z),
    )
}
