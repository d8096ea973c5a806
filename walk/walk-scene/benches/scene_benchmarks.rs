//! Benchmarks for BVH construction and ray queries.
//!
//! Run with: cargo bench -p walk-scene
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p walk-scene -- --save-baseline main
//! 2. After changes: cargo bench -p walk-scene -- --baseline main

#![allow(missing_docs, clippy::unwrap_used, clippy::cast_precision_loss)]

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use walk_mesh::IndexedMesh;
use walk_mesh::primitives::heightfield;
use walk_scene::{Point3, Precision, Scene, SceneConfig, Vector3};

// =============================================================================
// Test Scene Generation
// =============================================================================

/// Rolling terrain of roughly `2 * (extent / resolution)^2` triangles.
fn terrain(extent: f64, resolution: f64) -> IndexedMesh {
    heightfield(-extent, -extent, extent, extent, resolution, |x, y| {
        (x * 0.3).sin() * (y * 0.2).cos() * 2.0
    })
}

fn grid_origins(extent: f64, n: usize) -> Vec<Point3<f64>> {
    let step = 2.0 * extent / n as f64;
    (0..n * n)
        .map(|i| {
            let x = (i % n) as f64 * step - extent;
            let y = (i / n) as f64 * step - extent;
            Point3::new(x, y, 10.0)
        })
        .collect()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("SceneBuild");
    group.sample_size(10);

    let mesh = terrain(50.0, 0.5);
    group.throughput(Throughput::Elements(mesh.face_count() as u64));

    for (name, precision) in [("fast_80k", Precision::Fast), ("precise_80k", Precision::Precise)] {
        let config = SceneConfig::default().with_precision(precision);
        group.bench_function(name, |b| {
            b.iter(|| Scene::from_mesh(black_box(&mesh), config.clone()).unwrap());
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("SceneQueries");

    let scene = Scene::from_mesh(&terrain(50.0, 0.5), SceneConfig::default()).unwrap();
    let origins = grid_origins(49.0, 100);
    let down = [-Vector3::z()];
    group.throughput(Throughput::Elements(origins.len() as u64));

    group.bench_function("ray_point_single_10k", |b| {
        b.iter(|| {
            for origin in &origins {
                black_box(scene.ray_point(*origin, down[0], -1.0).unwrap());
            }
        });
    });

    group.bench_function("ray_point_batch_10k", |b| {
        b.iter(|| black_box(scene.ray_point_batch(&origins, &down, -1.0).unwrap()));
    });

    group.bench_function("ray_occluded_batch_10k", |b| {
        b.iter(|| black_box(scene.ray_occluded_batch(&origins, &[Vector3::x()], 20.0).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_queries);
criterion_main!(benches);
