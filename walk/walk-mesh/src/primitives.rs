//! Fixture meshes for building small test environments.
//!
//! All primitives are Z-up with counter-clockwise winding seen from above
//! (or from outside, for closed boxes).

use crate::IndexedMesh;
use nalgebra::Point3;

/// Create a unit cube from (0,0,0) to (1,1,1) with outward-facing normals.
///
/// # Example
///
/// ```
/// use walk_mesh::primitives::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
}

/// Create an axis-aligned closed box between two corners.
#[must_use]
pub fn box_mesh(min: Point3<f64>, max: Point3<f64>) -> IndexedMesh {
    let (lo, hi) = (min, max);
    let vertices = vec![
        Point3::new(lo.x, lo.y, lo.z), // 0
        Point3::new(hi.x, lo.y, lo.z), // 1
        Point3::new(hi.x, hi.y, lo.z), // 2
        Point3::new(lo.x, hi.y, lo.z), // 3
        Point3::new(lo.x, lo.y, hi.z), // 4
        Point3::new(hi.x, lo.y, hi.z), // 5
        Point3::new(hi.x, hi.y, hi.z), // 6
        Point3::new(lo.x, hi.y, hi.z), // 7
    ];

    let faces = vec![
        // Bottom (-Z)
        [0, 2, 1],
        [0, 3, 2],
        // Top (+Z)
        [4, 5, 6],
        [4, 6, 7],
        // Front (-Y)
        [0, 1, 5],
        [0, 5, 4],
        // Back (+Y)
        [3, 7, 6],
        [3, 6, 2],
        // Left (-X)
        [0, 4, 7],
        [0, 7, 3],
        // Right (+X)
        [1, 2, 6],
        [1, 6, 5],
    ];

    IndexedMesh::from_parts(vertices, faces)
}

/// Create a horizontal rectangle at height `z` spanning `[min_x, max_x] x [min_y, max_y]`.
///
/// # Example
///
/// ```
/// use walk_mesh::primitives::plane;
///
/// let floor = plane(-10.0, -10.0, 10.0, 10.0, 0.0);
/// assert_eq!(floor.face_count(), 2);
/// ```
#[must_use]
pub fn plane(min_x: f64, min_y: f64, max_x: f64, max_y: f64, z: f64) -> IndexedMesh {
    let vertices = vec![
        Point3::new(min_x, min_y, z),
        Point3::new(max_x, min_y, z),
        Point3::new(max_x, max_y, z),
        Point3::new(min_x, max_y, z),
    ];
    IndexedMesh::from_parts(vertices, vec![[0, 1, 2], [0, 2, 3]])
}

/// Create a triangulated height field `z = height(x, y)` over a rectangle.
///
/// The rectangle is divided into square-ish cells no larger than
/// `resolution` on each side; each cell becomes two triangles.
///
/// # Example
///
/// ```
/// use walk_mesh::primitives::heightfield;
///
/// let hill = heightfield(0.0, 0.0, 4.0, 4.0, 1.0, |x, y| 0.1 * (x + y));
/// assert_eq!(hill.vertex_count(), 25);
/// assert_eq!(hill.face_count(), 32);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
// Cell counts are small positive integers derived from finite extents
pub fn heightfield(
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    resolution: f64,
    height: impl Fn(f64, f64) -> f64,
) -> IndexedMesh {
    let resolution = if resolution > 0.0 { resolution } else { 1.0 };
    let nx = (((max_x - min_x) / resolution).ceil() as usize).max(1);
    let ny = (((max_y - min_y) / resolution).ceil() as usize).max(1);
    let step_x = (max_x - min_x) / nx as f64;
    let step_y = (max_y - min_y) / ny as f64;

    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        let y = (j as f64).mul_add(step_y, min_y);
        for i in 0..=nx {
            let x = (i as f64).mul_add(step_x, min_x);
            vertices.push(Point3::new(x, y, height(x, y)));
        }
    }

    let row = nx as u32 + 1;
    let mut faces = Vec::with_capacity(nx * ny * 2);
    for j in 0..ny as u32 {
        for i in 0..nx as u32 {
            let a = j * row + i;
            let b = a + 1;
            let c = a + row + 1;
            let d = a + row;
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }

    IndexedMesh::from_parts(vertices, faces)
}
