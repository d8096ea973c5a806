//! Bounding Volume Hierarchy over a triangle soup.
//!
//! Built top-down: bound all triangles, split along the longest axis at
//! the median centroid, recurse. Large subtrees are built in parallel with
//! `rayon::join`. Queries walk the tree with an explicit stack, visiting the
//! nearer child first so closest-hit queries can shrink their cutoff early.

use nalgebra::Point3;
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::intersect::{Ray, ray_aabb_intersect_dist, ray_triangle_intersection};
use crate::scalar::SceneScalar;

/// Axis-aligned bounding box for BVH nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<T: SceneScalar> {
    /// Minimum corner of the bounding box.
    pub min: Point3<T>,
    /// Maximum corner of the bounding box.
    pub max: Point3<T>,
}

impl<T: SceneScalar> Aabb<T> {
    /// Create an empty (inverted) bounding box.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(T::INFINITY, T::INFINITY, T::INFINITY),
            max: Point3::new(-T::INFINITY, -T::INFINITY, -T::INFINITY),
        }
    }

    /// Create a bounding box from a triangle.
    #[must_use]
    pub fn from_triangle(tri: &[Point3<T>; 3]) -> Self {
        let mut bbox = Self::empty();
        for p in tri {
            bbox.expand_point(p);
        }
        bbox
    }

    /// Expand this bounding box to include another.
    pub fn expand(&mut self, other: &Self) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].lesser(other.min[axis]);
            self.max[axis] = self.max[axis].greater(other.max[axis]);
        }
    }

    /// Expand this bounding box to include a point.
    pub fn expand_point(&mut self, point: &Point3<T>) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].lesser(point[axis]);
            self.max[axis] = self.max[axis].greater(point[axis]);
        }
    }

    /// Center of the box along one axis.
    #[must_use]
    pub fn center_on(&self, axis: usize) -> T {
        (self.min[axis] + self.max[axis]) / (T::ONE + T::ONE)
    }

    /// Get the index of the longest axis (0=X, 1=Y, 2=Z).
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let dx = self.max.x - self.min.x;
        let dy = self.max.y - self.min.y;
        let dz = self.max.z - self.min.z;

        if dx >= dy && dx >= dz {
            0
        } else if dy >= dz {
            1
        } else {
            2
        }
    }
}

/// BVH node containing either leaf triangles or child nodes.
#[derive(Debug)]
pub enum BvhNode<T: SceneScalar> {
    /// Leaf node containing triangle indices.
    Leaf {
        /// Bounding box of all triangles in this leaf.
        bbox: Aabb<T>,
        /// Triangle indices stored in this leaf.
        triangles: SmallVec<[u32; 8]>,
    },
    /// Internal node with two children.
    Internal {
        /// Bounding box of all triangles in this subtree.
        bbox: Aabb<T>,
        /// Left child node.
        left: Box<Self>,
        /// Right child node.
        right: Box<Self>,
    },
}

impl<T: SceneScalar> BvhNode<T> {
    /// Get the bounding box of this node.
    #[must_use]
    pub fn bbox(&self) -> &Aabb<T> {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// Closest intersection found by [`Bvh::closest_hit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit<T: SceneScalar> {
    /// Index of the triangle that was hit.
    pub triangle: u32,
    /// Distance along the (unit) ray direction.
    pub t: T,
}

/// Bounding Volume Hierarchy over triangles stored in scene precision.
#[derive(Debug)]
pub struct Bvh<T: SceneScalar> {
    root: BvhNode<T>,
    triangles: Vec<[Point3<T>; 3]>,
}

impl<T: SceneScalar> Bvh<T> {
    /// Build a BVH, constructing subtrees in parallel once they hold at
    /// least `parallel_threshold` triangles.
    ///
    /// Returns `None` if `triangles` is empty.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: scenes with >4B triangles are unsupported
    pub fn build(
        triangles: Vec<[Point3<T>; 3]>,
        max_leaf_size: usize,
        parallel_threshold: usize,
    ) -> Option<Self> {
        if triangles.is_empty() {
            return None;
        }

        let boxes: Vec<(u32, Aabb<T>)> = triangles
            .par_iter()
            .enumerate()
            .map(|(i, tri)| (i as u32, Aabb::from_triangle(tri)))
            .collect();

        let indices: Vec<usize> = (0..boxes.len()).collect();
        let max_leaf = max_leaf_size.max(1);
        let threshold = parallel_threshold.max(max_leaf + 1);
        let root = Self::build_recursive(&boxes, indices, max_leaf, threshold);

        Some(Self { root, triangles })
    }

    fn build_recursive(
        boxes: &[(u32, Aabb<T>)],
        indices: Vec<usize>,
        max_leaf_size: usize,
        parallel_threshold: usize,
    ) -> BvhNode<T> {
        let mut bbox = Aabb::empty();
        for &i in &indices {
            bbox.expand(&boxes[i].1);
        }

        if indices.len() <= max_leaf_size {
            let triangles: SmallVec<[u32; 8]> = indices.iter().map(|&i| boxes[i].0).collect();
            return BvhNode::Leaf { bbox, triangles };
        }

        // Split along longest axis at the median centroid
        let axis = bbox.longest_axis();
        let mut sorted = indices;
        sorted.sort_by(|&a, &b| {
            let va = boxes[a].1.center_on(axis);
            let vb = boxes[b].1.center_on(axis);
            va.partial_cmp(&vb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let right_indices = sorted.split_off(sorted.len() / 2);
        let left_indices = sorted;

        let (left, right) = if left_indices.len() >= parallel_threshold
            || right_indices.len() >= parallel_threshold
        {
            rayon::join(
                || Self::build_recursive(boxes, left_indices, max_leaf_size, parallel_threshold),
                || Self::build_recursive(boxes, right_indices, max_leaf_size, parallel_threshold),
            )
        } else {
            (
                Self::build_recursive(boxes, left_indices, max_leaf_size, parallel_threshold),
                Self::build_recursive(boxes, right_indices, max_leaf_size, parallel_threshold),
            )
        };

        BvhNode::Internal {
            bbox,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of triangles in the hierarchy.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Bounding box of every triangle.
    #[must_use]
    pub fn root_bbox(&self) -> &Aabb<T> {
        self.root.bbox()
    }

    /// Find the closest triangle hit within `max_t`.
    ///
    /// Ties between triangles at the same distance go to the lower
    /// triangle index, so results do not depend on traversal order.
    #[must_use]
    pub fn closest_hit(&self, ray: &Ray<T>, max_t: T) -> Option<TriangleHit<T>> {
        let mut closest: Option<TriangleHit<T>> = None;
        let mut cutoff = max_t;

        let mut stack: Vec<&BvhNode<T>> = Vec::with_capacity(64);
        stack.push(&self.root);

        while let Some(node) = stack.pop() {
            let Some(tmin) = ray_aabb_intersect_dist(ray, node.bbox(), cutoff) else {
                continue;
            };
            if tmin > cutoff {
                continue;
            }

            match node {
                BvhNode::Internal { left, right, .. } => {
                    let left_t = ray_aabb_intersect_dist(ray, left.bbox(), cutoff);
                    let right_t = ray_aabb_intersect_dist(ray, right.bbox(), cutoff);

                    // Push farther child first so the closer one is processed first
                    match (left_t, right_t) {
                        (Some(lt), Some(rt)) => {
                            if lt < rt {
                                stack.push(right);
                                stack.push(left);
                            } else {
                                stack.push(left);
                                stack.push(right);
                            }
                        }
                        (Some(_), None) => stack.push(left),
                        (None, Some(_)) => stack.push(right),
                        (None, None) => {}
                    }
                }
                BvhNode::Leaf { triangles, .. } => {
                    for &tri_idx in triangles {
                        let Some(t) = ray_triangle_intersection(
                            ray,
                            &self.triangles[tri_idx as usize],
                            cutoff,
                        ) else {
                            continue;
                        };
                        let better = match closest {
                            None => true,
                            Some(best) => t < best.t || (t == best.t && tri_idx < best.triangle),
                        };
                        if better {
                            cutoff = t;
                            closest = Some(TriangleHit {
                                triangle: tri_idx,
                                t,
                            });
                        }
                    }
                }
            }
        }

        closest
    }

    /// Check whether any triangle is hit within `max_t`.
    ///
    /// Stops at the first intersection found.
    #[must_use]
    pub fn any_hit(&self, ray: &Ray<T>, max_t: T) -> bool {
        let mut stack: Vec<&BvhNode<T>> = Vec::with_capacity(64);
        stack.push(&self.root);

        while let Some(node) = stack.pop() {
            if ray_aabb_intersect_dist(ray, node.bbox(), max_t).is_none() {
                continue;
            }
            match node {
                BvhNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
                BvhNode::Leaf { triangles, .. } => {
                    if triangles.iter().any(|&i| {
                        ray_triangle_intersection(ray, &self.triangles[i as usize], max_t).is_some()
                    }) {
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Get statistics about the BVH structure.
    #[must_use]
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats::default();
        Self::collect_stats(&self.root, 0, &mut stats);
        stats
    }

    fn collect_stats(node: &BvhNode<T>, depth: usize, stats: &mut BvhStats) {
        stats.max_depth = stats.max_depth.max(depth);

        match node {
            BvhNode::Leaf { triangles, .. } => {
                stats.leaf_count += 1;
                stats.total_triangles_in_leaves += triangles.len();
                stats.max_leaf_size = stats.max_leaf_size.max(triangles.len());
            }
            BvhNode::Internal { left, right, .. } => {
                stats.internal_count += 1;
                Self::collect_stats(left, depth + 1, stats);
                Self::collect_stats(right, depth + 1, stats);
            }
        }
    }
}

/// Statistics about BVH structure.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BvhStats {
    /// Number of internal (branch) nodes.
    pub internal_count: usize,
    /// Number of leaf nodes.
    pub leaf_count: usize,
    /// Maximum depth of the tree.
    pub max_depth: usize,
    /// Maximum number of triangles in any leaf.
    pub max_leaf_size: usize,
    /// Total triangles stored across all leaves.
    pub total_triangles_in_leaves: usize,
}
