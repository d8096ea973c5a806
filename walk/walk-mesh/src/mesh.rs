//! Indexed triangle mesh.

use crate::{Aabb, MeshError, MeshResult, Triangle};
use nalgebra::{Point3, Rotation3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh tagged with a name and an integer id.
///
/// Vertices and faces are stored separately, with faces referencing
/// vertices by index. The id is reported back as the surface id of ray
/// hits against this mesh.
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Point3<f64>>` - Vertex positions
/// - `faces`: `Vec<[u32; 3]>` - Triangle faces as vertex indices
///
/// # Example
///
/// ```
/// use walk_mesh::{IndexedMesh, Point3};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Human-readable mesh name.
    pub name: String,

    /// Integer id reported as the surface id of hits on this mesh.
    pub id: u32,

    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: String::new(),
            id: 0,
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces without validation.
    ///
    /// Use [`IndexedMesh::validate`] before handing the mesh to a scene if
    /// the data comes from an untrusted source.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            name: String::new(),
            id: 0,
            vertices,
            faces,
        }
    }

    /// Create a mesh from raw coordinate and index data.
    ///
    /// # Arguments
    ///
    /// * `positions` - Flat array of vertex positions `[x0, y0, z0, x1, y1, z1, ...]`
    /// * `indices` - Flat array of face indices `[v0a, v1a, v2a, v0b, v1b, v2b, ...]`
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMesh`] if either array length is not a
    /// multiple of 3, if a coordinate is not finite, or if there are no
    /// faces. Returns [`MeshError::IndexOutOfRange`] if a face references a
    /// missing vertex.
    ///
    /// # Example
    ///
    /// ```
    /// use walk_mesh::IndexedMesh;
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let mesh = IndexedMesh::from_raw(&positions, &[0, 1, 2]).unwrap();
    /// assert_eq!(mesh.vertex_count(), 3);
    ///
    /// assert!(IndexedMesh::from_raw(&positions[..8], &[0, 1, 2]).is_err());
    /// ```
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> MeshResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::invalid_mesh(format!(
                "coordinate count {} is not a multiple of 3",
                positions.len()
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::invalid_mesh(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        let mesh = Self::from_parts(vertices, faces);
        mesh.validate()?;
        Ok(mesh)
    }

    /// Create a mesh from single-precision coordinate data.
    ///
    /// # Errors
    ///
    /// Same conditions as [`IndexedMesh::from_raw`].
    pub fn from_raw_f32(positions: &[f32], indices: &[u32]) -> MeshResult<Self> {
        let widened: Vec<f64> = positions.iter().copied().map(f64::from).collect();
        Self::from_raw(&widened, indices)
    }

    /// Set the mesh name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the mesh id.
    #[must_use]
    pub const fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    /// Check that the mesh is usable as scene input.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh has no faces, a non-finite coordinate,
    /// or a face index outside the vertex array.
    pub fn validate(&self) -> MeshResult<()> {
        if self.faces.is_empty() {
            return Err(MeshError::invalid_mesh("mesh has no faces"));
        }
        if let Some(i) = self
            .vertices
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(MeshError::invalid_mesh(format!(
                "vertex {i} has a non-finite coordinate"
            )));
        }
        let vertex_count = self.vertices.len();
        for (face, tri) in self.faces.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has no geometry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Get a triangle by face index with resolved vertex positions.
    ///
    /// Returns `None` if the face or any of its vertices is out of bounds.
    #[must_use]
    pub fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let [a, b, c] = *self.faces.get(face_index)?;
        Some(Triangle::new(
            *self.vertices.get(a as usize)?,
            *self.vertices.get(b as usize)?,
            *self.vertices.get(c as usize)?,
        ))
    }

    /// Iterate over all triangles with resolved vertex positions.
    ///
    /// Faces with out-of-range indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).filter_map(|i| self.triangle(i))
    }

    /// Compute the axis-aligned bounding box of the vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter())
    }

    /// Rotate the mesh by Euler angles in degrees.
    ///
    /// The rotation is applied about X, then Y, then Z (the combined
    /// matrix is `Rz * Ry * Rx`).
    pub fn rotate_euler_degrees(&mut self, x_deg: f64, y_deg: f64, z_deg: f64) {
        let rotation =
            Rotation3::from_euler_angles(x_deg.to_radians(), y_deg.to_radians(), z_deg.to_radians());
        for p in &mut self.vertices {
            *p = rotation * *p;
        }
    }

    /// Rotate mesh 90 degrees around X axis (Y becomes Z, Z becomes -Y).
    ///
    /// Converts Y-up geometry into the Z-up analysis convention.
    pub fn rotate_x_90(&mut self) {
        for p in &mut self.vertices {
            let old_y = p.y;
            p.y = -p.z;
            p.z = old_y;
        }
    }

    /// Translate mesh by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for p in &mut self.vertices {
            *p += offset;
        }
    }

    /// Append another mesh's geometry, keeping this mesh's name and id.
    #[allow(clippy::cast_possible_truncation)]
    pub fn merge(&mut self, other: &Self) {
        // Truncation: meshes with >4B vertices are unsupported
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.faces
            .extend(other.faces.iter().map(|f| [f[0] + base, f[1] + base, f[2] + base]));
    }
}
