//! Ray primitives: ray-triangle and ray-box intersection.

use nalgebra::{Point3, Vector3};

use crate::bvh::Aabb;
use crate::scalar::SceneScalar;

/// A ray in scene precision with a precomputed inverse direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray<T: SceneScalar> {
    /// Ray origin.
    pub origin: Point3<T>,
    /// Unit direction.
    pub direction: Vector3<T>,
    /// Component-wise reciprocal of `direction` (`±∞` for zero components).
    pub inv_direction: Vector3<T>,
}

impl<T: SceneScalar> Ray<T> {
    /// Create a ray. `direction` is expected to be unit length.
    #[must_use]
    pub fn new(origin: Point3<T>, direction: Vector3<T>) -> Self {
        let inv_direction = Vector3::new(
            T::ONE / direction.x,
            T::ONE / direction.y,
            T::ONE / direction.z,
        );
        Self {
            origin,
            direction,
            inv_direction,
        }
    }
}

/// Möller–Trumbore ray-triangle intersection.
///
/// Returns the distance along the ray to the hit, or `None` if the ray
/// misses, is parallel to the triangle, or the hit lies outside
/// `[MIN_T, max_t]`. Barycentric coordinates get a small tolerance so a
/// ray through an edge shared by two triangles is never lost between them.
#[must_use]
pub fn ray_triangle_intersection<T: SceneScalar>(
    ray: &Ray<T>,
    tri: &[Point3<T>; 3],
    max_t: T,
) -> Option<T> {
    let [v0, v1, v2] = tri;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);

    if a.magnitude() < T::PARALLEL_EPSILON {
        return None; // Ray parallel to triangle
    }

    let f = T::ONE / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);

    let lo = -T::EDGE_TOLERANCE;
    let hi = T::ONE + T::EDGE_TOLERANCE;
    if u < lo || u > hi {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);

    if v < lo || u + v > hi {
        return None;
    }

    let t = f * edge2.dot(&q);

    if t < T::MIN_T || t > max_t {
        return None;
    }

    Some(t)
}

/// Ray-AABB intersection test (slab method) returning the entry distance.
///
/// Returns `Some(tmin)` (clamped to zero when the origin is inside) if the
/// ray enters the box before `max_t`, else `None`.
///
/// Axes where the ray direction is zero are tested by containment of the
/// origin instead of by slab distances, so a ray that runs exactly along a
/// box face (`0 * ∞`) is still accepted.
#[must_use]
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn ray_aabb_intersect_dist<T: SceneScalar>(ray: &Ray<T>, aabb: &Aabb<T>, max_t: T) -> Option<T> {
    let mut tmin = T::ZERO;
    let mut tmax = max_t;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if ray.direction[axis] == T::ZERO {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = ray.inv_direction[axis];
        let t1 = (lo - origin) * inv;
        let t2 = (hi - origin) * inv;
        tmin = tmin.greater(t1.lesser(t2));
        tmax = tmax.lesser(t1.greater(t2));

        // Any NaN leaves the comparison false, so reject explicitly
        if !(tmin <= tmax) {
            return None;
        }
    }

    Some(tmin)
}
