//! Property-based tests for scene queries.
//!
//! Run with: cargo test -p walk-scene -- proptest

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use walk_mesh::IndexedMesh;
use walk_mesh::primitives::{box_mesh, heightfield};
use walk_scene::{Point3, Precision, RayHit, Scene, SceneConfig, Vector3};

// =============================================================================
// Strategies
// =============================================================================

fn arb_origin() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-20.0..20.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Non-zero direction (at least one component away from zero).
fn arb_direction() -> impl Strategy<Value = Vector3<f64>> {
    prop::array::uniform3(-1.0..1.0f64)
        .prop_filter("direction must not vanish", |v| {
            v.iter().map(|c| c * c).sum::<f64>() > 1e-6
        })
        .prop_map(|[x, y, z]| Vector3::new(x, y, z))
}

fn test_meshes() -> Vec<IndexedMesh> {
    vec![
        heightfield(-15.0, -15.0, 15.0, 15.0, 1.5, |x, y| (x * 0.2).sin() + (y * 0.1).cos())
            .with_id(1),
        box_mesh(Point3::new(-3.0, -3.0, 0.0), Point3::new(3.0, 3.0, 4.0)).with_id(2),
    ]
}

fn scene(precision: Precision) -> Scene {
    Scene::new(&test_meshes(), SceneConfig::default().with_precision(precision)).unwrap()
}

// =============================================================================
// Query consistency
// =============================================================================

proptest! {
    /// A nearest hit is also an occlusion, and nothing closer is occluded.
    #[test]
    fn nearest_hit_agrees_with_occlusion(origin in arb_origin(), direction in arb_direction()) {
        let scene = scene(Precision::Precise);
        let hit = scene.ray_distance(origin, direction, -1.0).unwrap();
        let occluded = scene.ray_occluded(origin, direction, -1.0).unwrap();
        prop_assert_eq!(hit.is_hit(), occluded);

        if hit.is_hit() && hit.distance > 1e-3 {
            let before = scene.ray_occluded(origin, direction, hit.distance * 0.999).unwrap();
            prop_assert!(!before);
        }
    }

    /// Hit points lie at the reported distance along the normalized direction.
    #[test]
    fn hit_point_matches_distance(origin in arb_origin(), direction in arb_direction()) {
        let scene = scene(Precision::Precise);
        let hit = scene.ray_distance(origin, direction, -1.0).unwrap();
        let point = scene.ray_point(origin, direction, -1.0).unwrap();
        match point {
            Some(p) => {
                prop_assert!(hit.is_hit());
                prop_assert!(((p - origin).norm() - hit.distance).abs() < 1e-6);
            }
            None => prop_assert_eq!(hit, RayHit::MISS),
        }
    }

    /// Batch results equal the single-ray results, in order.
    #[test]
    fn batch_matches_single(
        rays in prop::collection::vec((arb_origin(), arb_direction()), 1..40),
    ) {
        let scene = scene(Precision::Fast);
        let (origins, directions): (Vec<_>, Vec<_>) = rays.into_iter().unzip();
        let batch = scene.ray_distance_batch(&origins, &directions, -1.0).unwrap();
        for ((origin, direction), hit) in origins.iter().zip(&directions).zip(&batch) {
            prop_assert_eq!(*hit, scene.ray_distance(*origin, *direction, -1.0).unwrap());
        }
    }

    /// Queries are deterministic.
    #[test]
    fn repeated_queries_agree(origin in arb_origin(), direction in arb_direction()) {
        let scene = scene(Precision::Precise);
        let a = scene.ray_distance(origin, direction, 30.0).unwrap();
        let b = scene.ray_distance(origin, direction, 30.0).unwrap();
        prop_assert_eq!(a, b);
    }
}
