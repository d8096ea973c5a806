//! The ray-traced scene and its query surface.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walk_mesh::{Aabb, IndexedMesh};

use crate::bvh::{Bvh, BvhStats};
use crate::config::{Precision, SceneConfig};
use crate::error::{SceneError, SceneResult};
use crate::intersect::Ray;
use crate::scalar::{SceneScalar, point_from_f64, vector_from_f64};

/// Result of a nearest-hit query.
///
/// A miss is reported with the sentinel [`RayHit::MISS`]: negative distance
/// and negative surface id.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RayHit {
    /// World distance from the ray origin to the hit.
    pub distance: f64,
    /// Id of the mesh the hit triangle belongs to.
    pub surface_id: i64,
}

impl RayHit {
    /// The miss sentinel.
    pub const MISS: Self = Self {
        distance: -1.0,
        surface_id: -1,
    };

    /// Returns `true` if this result is a hit.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.distance >= 0.0 && self.surface_id >= 0
    }
}

#[derive(Debug)]
enum Backend {
    Fast(Bvh<f32>),
    Precise(Bvh<f64>),
}

/// A normalized ray ready for traversal.
#[derive(Debug, Clone, Copy)]
struct Query {
    origin: Point3<f64>,
    direction: Vector3<f64>,
    max_t: f64,
}

/// An immutable triangle scene answering occlusion and nearest-hit queries.
///
/// Directions need not be unit length; they are normalized internally, so
/// `max_t` and returned distances are always world distances. A negative
/// `max_t` means "unbounded".
///
/// The scene is `Sync`: any number of threads may query it concurrently.
///
/// # Example
///
/// ```
/// use walk_mesh::primitives::plane;
/// use walk_scene::{Point3, Scene, SceneConfig, Vector3};
///
/// let floor = plane(-5.0, -5.0, 5.0, 5.0, 0.0).with_id(3);
/// let scene = Scene::new(&[floor], SceneConfig::default()).unwrap();
///
/// let hit = scene
///     .ray_distance(Point3::new(0.0, 0.0, 2.0), -Vector3::z(), -1.0)
///     .unwrap();
/// assert!((hit.distance - 2.0).abs() < 1e-9);
/// assert_eq!(hit.surface_id, 3);
/// ```
#[derive(Debug)]
pub struct Scene {
    backend: Backend,
    surface_ids: Vec<i64>,
    bounds: Aabb,
    config: SceneConfig,
}

impl Scene {
    /// Build a scene over one or more meshes.
    ///
    /// Meshes without faces are skipped. Degenerate triangles are dropped
    /// since no ray can hit them.
    ///
    /// # Errors
    ///
    /// - [`SceneError::InvalidConfig`] if `config` fails validation
    /// - [`SceneError::Mesh`] if a mesh has bad indices or coordinates
    /// - [`SceneError::BuildFailure`] if no usable triangle remains
    pub fn new(meshes: &[IndexedMesh], config: SceneConfig) -> SceneResult<Self> {
        config.validate()?;

        info!(
            meshes = meshes.len(),
            precision = ?config.precision(),
            "Building scene"
        );

        let mut triangles: Vec<[Point3<f64>; 3]> = Vec::new();
        let mut surface_ids = Vec::new();
        let mut bounds = Aabb::empty();
        let mut degenerate = 0usize;

        for mesh in meshes {
            if mesh.faces.is_empty() {
                warn!(name = %mesh.name, id = mesh.id, "Skipping mesh with no faces");
                continue;
            }
            mesh.validate()?;

            for tri in mesh.triangles() {
                if tri.is_degenerate() {
                    degenerate += 1;
                    continue;
                }
                for p in [&tri.v0, &tri.v1, &tri.v2] {
                    bounds.include(p);
                }
                triangles.push([tri.v0, tri.v1, tri.v2]);
                surface_ids.push(i64::from(mesh.id));
            }
        }

        if degenerate > 0 {
            warn!(count = degenerate, "Skipped degenerate triangles");
        }
        if triangles.is_empty() {
            return Err(SceneError::build_failure(
                "no non-degenerate triangles in input meshes",
            ));
        }

        let leaf = config.max_leaf_size();
        let threshold = config.parallel_threshold();
        let backend = match config.precision() {
            Precision::Fast => Bvh::build(convert::<f32>(&triangles), leaf, threshold).map(Backend::Fast),
            Precision::Precise => Bvh::build(triangles, leaf, threshold).map(Backend::Precise),
        }
        .ok_or_else(|| SceneError::build_failure("BVH construction produced no root"))?;

        let scene = Self {
            backend,
            surface_ids,
            bounds,
            config,
        };
        let stats = scene.stats();
        info!(
            triangles = scene.triangle_count(),
            leaves = stats.leaf_count,
            depth = stats.max_depth,
            "Scene ready"
        );
        Ok(scene)
    }

    /// Build a scene over a single mesh.
    ///
    /// # Errors
    ///
    /// Same as [`Scene::new`].
    pub fn from_mesh(mesh: &IndexedMesh, config: SceneConfig) -> SceneResult<Self> {
        Self::new(std::slice::from_ref(mesh), config)
    }

    /// Bounding box of every triangle in the scene.
    #[must_use]
    pub const fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Number of triangles in the acceleration structure.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.surface_ids.len()
    }

    /// Precision the scene was built with.
    #[must_use]
    pub const fn precision(&self) -> Precision {
        self.config.precision()
    }

    /// Height above ground used for line-of-sight rays between graph nodes.
    #[must_use]
    pub const fn surface_offset(&self) -> f64 {
        self.config.surface_offset()
    }

    /// Structural statistics of the BVH.
    #[must_use]
    pub fn stats(&self) -> BvhStats {
        match &self.backend {
            Backend::Fast(bvh) => bvh.stats(),
            Backend::Precise(bvh) => bvh.stats(),
        }
    }

    /// Returns `true` if any triangle is hit within `max_t` of `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidArgument`] if `direction` has zero length.
    pub fn ray_occluded(
        &self,
        origin: Point3<f64>,
        direction: Vector3<f64>,
        max_t: f64,
    ) -> SceneResult<bool> {
        Ok(prepare(origin, direction, max_t)?.is_some_and(|q| self.occluded(&q)))
    }

    /// Distance to the nearest hit and the id of the surface hit.
    ///
    /// Returns [`RayHit::MISS`] when nothing is hit or the inputs are not finite.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidArgument`] if `direction` has zero length.
    pub fn ray_distance(
        &self,
        origin: Point3<f64>,
        direction: Vector3<f64>,
        max_t: f64,
    ) -> SceneResult<RayHit> {
        Ok(prepare(origin, direction, max_t)?.map_or(RayHit::MISS, |q| self.distance(&q)))
    }

    /// World-space position of the nearest hit, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidArgument`] if `direction` has zero length.
    pub fn ray_point(
        &self,
        origin: Point3<f64>,
        direction: Vector3<f64>,
        max_t: f64,
    ) -> SceneResult<Option<Point3<f64>>> {
        Ok(prepare(origin, direction, max_t)?.and_then(|q| self.point(&q)))
    }

    /// Batch form of [`Scene::ray_occluded`].
    ///
    /// `origins` and `directions` are parallel arrays; either may hold a
    /// single element, which is then used for every query. Queries run on
    /// the rayon pool and results keep the input order.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidArgument`] if the array lengths are
    /// incompatible or any direction has zero length. No query runs in that
    /// case.
    pub fn ray_occluded_batch(
        &self,
        origins: &[Point3<f64>],
        directions: &[Vector3<f64>],
        max_t: f64,
    ) -> SceneResult<Vec<bool>> {
        let queries = prepare_batch(origins, directions, max_t)?;
        Ok(queries
            .par_iter()
            .map(|q| q.as_ref().is_some_and(|q| self.occluded(q)))
            .collect())
    }

    /// Batch form of [`Scene::ray_distance`].
    ///
    /// # Errors
    ///
    /// See [`Scene::ray_occluded_batch`].
    pub fn ray_distance_batch(
        &self,
        origins: &[Point3<f64>],
        directions: &[Vector3<f64>],
        max_t: f64,
    ) -> SceneResult<Vec<RayHit>> {
        let queries = prepare_batch(origins, directions, max_t)?;
        Ok(queries
            .par_iter()
            .map(|q| q.as_ref().map_or(RayHit::MISS, |q| self.distance(q)))
            .collect())
    }

    /// Batch form of [`Scene::ray_point`].
    ///
    /// # Errors
    ///
    /// See [`Scene::ray_occluded_batch`].
    pub fn ray_point_batch(
        &self,
        origins: &[Point3<f64>],
        directions: &[Vector3<f64>],
        max_t: f64,
    ) -> SceneResult<Vec<Option<Point3<f64>>>> {
        let queries = prepare_batch(origins, directions, max_t)?;
        Ok(queries
            .par_iter()
            .map(|q| q.as_ref().and_then(|q| self.point(q)))
            .collect())
    }

    fn occluded(&self, q: &Query) -> bool {
        match &self.backend {
            Backend::Fast(bvh) => any_hit(bvh, q),
            Backend::Precise(bvh) => any_hit(bvh, q),
        }
    }

    fn nearest(&self, q: &Query) -> Option<(u32, f64)> {
        match &self.backend {
            Backend::Fast(bvh) => closest_hit(bvh, q),
            Backend::Precise(bvh) => closest_hit(bvh, q),
        }
    }

    fn distance(&self, q: &Query) -> RayHit {
        self.nearest(q).map_or(RayHit::MISS, |(tri, t)| RayHit {
            distance: t,
            surface_id: self.surface_ids[tri as usize],
        })
    }

    fn point(&self, q: &Query) -> Option<Point3<f64>> {
        self.nearest(q).map(|(_, t)| q.origin + q.direction * t)
    }
}

fn convert<T: SceneScalar>(triangles: &[[Point3<f64>; 3]]) -> Vec<[Point3<T>; 3]> {
    triangles
        .iter()
        .map(|tri| tri.each_ref().map(point_from_f64))
        .collect()
}

fn to_ray<T: SceneScalar>(q: &Query) -> (Ray<T>, T) {
    let ray = Ray::new(point_from_f64(&q.origin), vector_from_f64(&q.direction));
    (ray, T::from_f64_lossy(q.max_t))
}

fn any_hit<T: SceneScalar>(bvh: &Bvh<T>, q: &Query) -> bool {
    let (ray, max_t) = to_ray(q);
    bvh.any_hit(&ray, max_t)
}

fn closest_hit<T: SceneScalar>(bvh: &Bvh<T>, q: &Query) -> Option<(u32, f64)> {
    let (ray, max_t) = to_ray(q);
    bvh.closest_hit(&ray, max_t)
        .map(|hit| (hit.triangle, hit.t.to_f64()))
}

/// Normalize a query. `Ok(None)` means the ray cannot hit anything.
fn prepare(origin: Point3<f64>, direction: Vector3<f64>, max_t: f64) -> SceneResult<Option<Query>> {
    let length = direction.norm();
    if length == 0.0 {
        return Err(SceneError::invalid_argument("ray direction has zero length"));
    }

    let finite = origin.iter().all(|v| v.is_finite()) && direction.iter().all(|v| v.is_finite());
    if !finite || !length.is_finite() || max_t.is_nan() {
        debug!(?origin, ?direction, max_t, "Non-finite ray input treated as a miss");
        return Ok(None);
    }

    let max_t = if max_t < 0.0 { f64::INFINITY } else { max_t };
    Ok(Some(Query {
        origin,
        direction: direction / length,
        max_t,
    }))
}

fn prepare_batch(
    origins: &[Point3<f64>],
    directions: &[Vector3<f64>],
    max_t: f64,
) -> SceneResult<Vec<Option<Query>>> {
    let count = match (origins.len(), directions.len()) {
        (a, b) if a == b => a,
        (a, 1) => a,
        (1, b) => b,
        (a, b) => {
            return Err(SceneError::invalid_argument(format!(
                "batch has {a} origins but {b} directions"
            )));
        }
    };

    (0..count)
        .map(|i| {
            let origin = origins[if origins.len() == 1 { 0 } else { i }];
            let direction = directions[if directions.len() == 1 { 0 } else { i }];
            prepare(origin, direction, max_t).map_err(|_| {
                SceneError::invalid_argument(format!("direction {i} has zero length"))
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use walk_mesh::primitives::{box_mesh, plane};

    fn floor_scene(precision: Precision) -> Scene {
        let floor = plane(-10.0, -10.0, 10.0, 10.0, 0.0).with_id(1);
        Scene::new(&[floor], SceneConfig::default().with_precision(precision)).unwrap()
    }

    fn down() -> Vector3<f64> {
        -Vector3::z()
    }

    #[test]
    fn nearest_hit_on_plane() {
        for precision in [Precision::Fast, Precision::Precise] {
            let scene = floor_scene(precision);
            let hit = scene
                .ray_distance(Point3::new(1.5, -2.5, 3.0), down(), -1.0)
                .unwrap();
            assert!(hit.is_hit());
            assert_relative_eq!(hit.distance, 3.0, epsilon = 1e-5);
            assert_eq!(hit.surface_id, 1);
        }
    }

    #[test]
    fn distance_is_measured_in_world_units() {
        let scene = floor_scene(Precision::Precise);
        let hit = scene
            .ray_distance(Point3::new(0.0, 0.0, 4.0), Vector3::new(0.0, 0.0, -10.0), -1.0)
            .unwrap();
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-9);
        assert!(!scene
            .ray_occluded(Point3::new(0.0, 0.0, 4.0), Vector3::new(0.0, 0.0, -10.0), 3.0)
            .unwrap());
    }

    #[test]
    fn ray_point_returns_world_position() {
        let scene = floor_scene(Precision::Precise);
        let p = scene
            .ray_point(Point3::new(3.0, 4.0, 2.0), Vector3::new(1.0, 0.0, -1.0), -1.0)
            .unwrap()
            .unwrap();
        assert_relative_eq!(p, Point3::new(5.0, 4.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn miss_returns_sentinel() {
        let scene = floor_scene(Precision::Precise);
        let hit = scene
            .ray_distance(Point3::new(50.0, 0.0, 1.0), down(), -1.0)
            .unwrap();
        assert_eq!(hit, RayHit::MISS);
        assert!(!hit.is_hit());
        assert!(scene
            .ray_point(Point3::new(0.0, 0.0, 1.0), Vector3::z(), -1.0)
            .unwrap()
            .is_none());
    }

    #[test]
    fn zero_direction_is_invalid() {
        let scene = floor_scene(Precision::Precise);
        let err = scene
            .ray_occluded(Point3::origin(), Vector3::zeros(), -1.0)
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn nan_inputs_miss() {
        let scene = floor_scene(Precision::Precise);
        let hit = scene
            .ray_distance(Point3::new(f64::NAN, 0.0, 1.0), down(), -1.0)
            .unwrap();
        assert_eq!(hit, RayHit::MISS);
        assert!(!scene
            .ray_occluded(Point3::new(0.0, 0.0, 1.0), down(), f64::NAN)
            .unwrap());
    }

    #[test]
    fn surface_ids_follow_meshes() {
        let floor = plane(-10.0, -10.0, 10.0, 10.0, 0.0).with_id(4);
        let block = box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 2.0)).with_id(9);
        let scene = Scene::new(&[floor, block], SceneConfig::default()).unwrap();
        assert_eq!(scene.triangle_count(), 14);

        let on_block = scene
            .ray_distance(Point3::new(0.5, 0.5, 5.0), down(), -1.0)
            .unwrap();
        assert_eq!(on_block.surface_id, 9);
        assert_relative_eq!(on_block.distance, 3.0, epsilon = 1e-9);

        let on_floor = scene
            .ray_distance(Point3::new(5.0, 5.0, 5.0), down(), -1.0)
            .unwrap();
        assert_eq!(on_floor.surface_id, 4);
    }

    #[test]
    fn occlusion_through_wall() {
        let wall = box_mesh(Point3::new(2.0, -5.0, 0.0), Point3::new(2.5, 5.0, 3.0));
        let scene = Scene::from_mesh(&wall, SceneConfig::default()).unwrap();
        let origin = Point3::new(0.0, 0.0, 1.0);
        assert!(scene.ray_occluded(origin, Vector3::x(), -1.0).unwrap());
        assert!(!scene.ray_occluded(origin, Vector3::x(), 1.5).unwrap());
        assert!(!scene.ray_occluded(origin, -Vector3::x(), -1.0).unwrap());
    }

    #[test]
    fn batch_preserves_order_and_broadcasts() {
        let scene = floor_scene(Precision::Precise);
        let origins: Vec<_> = (0..200)
            .map(|i| Point3::new(f64::from(i) * 0.2 - 20.0, 0.0, 1.0))
            .collect();
        let hits = scene.ray_distance_batch(&origins, &[down()], -1.0).unwrap();
        assert_eq!(hits.len(), origins.len());
        for (origin, hit) in origins.iter().zip(&hits) {
            let single = scene.ray_distance(*origin, down(), -1.0).unwrap();
            assert_eq!(*hit, single);
        }

        let directions = [down(), Vector3::z(), Vector3::new(0.0, 1.0, -1.0)];
        let points = scene
            .ray_point_batch(&[Point3::new(0.0, 0.0, 1.0)], &directions, -1.0)
            .unwrap();
        assert!(points[0].is_some());
        assert!(points[1].is_none());
        assert_relative_eq!(points[2].unwrap().y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn batch_rejects_bad_shapes() {
        let scene = floor_scene(Precision::Precise);
        let origins = [Point3::origin(); 3];
        let err = scene
            .ray_occluded_batch(&origins, &[down(), down()], -1.0)
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = scene
            .ray_occluded_batch(&origins, &[down(), Vector3::zeros(), down()], -1.0)
            .unwrap_err();
        assert!(err.to_string().contains("direction 1"));

        assert!(scene.ray_occluded_batch(&[], &[], -1.0).unwrap().is_empty());
    }

    #[test]
    fn empty_and_degenerate_input_fail_to_build() {
        let err = Scene::new(&[], SceneConfig::default()).unwrap_err();
        assert!(err.is_build_failure());

        let empty = IndexedMesh::new();
        assert!(Scene::from_mesh(&empty, SceneConfig::default())
            .unwrap_err()
            .is_build_failure());

        let sliver = IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0], &[0, 1, 2])
            .unwrap();
        assert!(Scene::from_mesh(&sliver, SceneConfig::default())
            .unwrap_err()
            .is_build_failure());
    }

    #[test]
    fn malformed_mesh_is_reported() {
        let bad = IndexedMesh::from_parts(vec![Point3::origin()], vec![[0, 1, 2]]);
        let err = Scene::from_mesh(&bad, SceneConfig::default()).unwrap_err();
        assert!(matches!(err, SceneError::Mesh(_)));
    }

    #[test]
    fn fast_mode_drifts_but_hits_at_large_coordinates() {
        let offset = 100_000.0;
        let floor = plane(offset - 5.0, offset - 5.0, offset + 5.0, offset + 5.0, 10.0);
        for precision in [Precision::Fast, Precision::Precise] {
            let scene =
                Scene::from_mesh(&floor, SceneConfig::default().with_precision(precision)).unwrap();
            let hit = scene
                .ray_distance(Point3::new(offset + 0.3, offset - 0.7, 12.0), down(), -1.0)
                .unwrap();
            assert_relative_eq!(hit.distance, 2.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn bounds_cover_geometry() {
        let scene = floor_scene(Precision::Fast);
        assert_eq!(scene.bounds().min, Point3::new(-10.0, -10.0, 0.0));
        assert_eq!(scene.bounds().max, Point3::new(10.0, 10.0, 0.0));
        assert!(scene.bounds().contains(&Point3::new(3.0, -9.0, 0.0)));
        assert!(!scene.bounds().contains(&Point3::new(3.0, -9.0, 0.1)));
        assert_eq!(scene.precision(), Precision::Fast);
        assert_eq!(scene.stats().total_triangles_in_leaves, 2);
    }
}
