//! Alternate edge costs derived from the default (distance) cost.
//!
//! Each algorithm walks the default CSR row by row and produces one score
//! per existing edge. The `store_*` functions write the result back under
//! the algorithm's cost name; topology is never changed.

use nalgebra::{Point3, Vector2};
use tracing::info;

use crate::edge::{EdgeSet, IntEdge};
use crate::error::GraphResult;
use crate::graph::{DEFAULT_COST, Graph};
use crate::node::ROUNDING_PRECISION;

/// Cost name of the cross-slope algorithm.
pub const CROSS_SLOPE: &str = "CrossSlope";

/// Cost name of the energy expenditure algorithm.
pub const ENERGY_EXPENDITURE: &str = "EnergyExpenditure";

/// Largest grade used by the energy model, in either direction.
const MAX_GRADE: f64 = 0.4;

/// The built-in cost derivations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostAlgorithm {
    /// Penalize edges by the height difference across the walking direction.
    CrossSlope,
    /// Metabolic cost of walking the edge's grade.
    EnergyExpenditure,
}

impl CostAlgorithm {
    /// Cost name the algorithm's scores are stored under.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CrossSlope => CROSS_SLOPE,
            Self::EnergyExpenditure => ENERGY_EXPENDITURE,
        }
    }

    /// Compute the algorithm's scores.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotCompressed`](crate::GraphError::NotCompressed)
    /// if the graph has pending writes.
    pub fn calculate(self, graph: &Graph) -> GraphResult<Vec<EdgeSet>> {
        match self {
            Self::CrossSlope => calculate_cross_slope(graph),
            Self::EnergyExpenditure => calculate_energy_expenditure(graph),
        }
    }

    /// Compute the algorithm's scores and store them under [`name`](Self::name).
    ///
    /// # Errors
    ///
    /// As [`calculate`](Self::calculate).
    pub fn store(self, graph: &mut Graph) -> GraphResult<()> {
        let sets = self.calculate(graph)?;
        graph.add_edges(&sets, self.name())?;
        info!(
            cost = self.name(),
            edges = sets.iter().map(EdgeSet::len).sum::<usize>(),
            "Stored derived cost"
        );
        Ok(())
    }
}

// =============================================================================
// Cross slope
// =============================================================================

/// Cross-slope scores for every edge of a compressed graph.
///
/// For edge `p -> c`, the *peers* are the other children `q` of `p` whose
/// horizontal direction is perpendicular to `c - p` (absolute cosine below
/// [`ROUNDING_PRECISION`]). The score is:
///
/// - no peers: the default score of `p -> c`
/// - one peer `q`: `|p.z - q.z| + score(p, q)`
/// - two or more: `|q1.z - q2.z| + score(p, q1)`, using the first two
///   peers in child-id order
///
/// Vertical edges have no horizontal direction and keep the default score.
///
/// # Errors
///
/// Returns [`GraphError::NotCompressed`](crate::GraphError::NotCompressed)
/// if the graph has pending writes.
///
/// # Example
///
/// ```
/// use walk_graph::{Graph, Point3, calculate_cross_slope};
///
/// let mut graph = Graph::new();
/// let p = graph.intern(Point3::new(0.0, 0.0, 0.0)).unwrap();
/// let ahead = graph.intern(Point3::new(1.0, 0.0, 0.0)).unwrap();
/// let left = graph.intern(Point3::new(0.0, 1.0, 0.5)).unwrap();
/// graph.add_edge(p, ahead, 1.0, "").unwrap();
/// graph.add_edge(p, left, 1.1, "").unwrap();
/// graph.compress();
///
/// let sets = calculate_cross_slope(&graph).unwrap();
/// // p -> ahead has one perpendicular peer: |0 - 0.5| + 1.1
/// assert!((sets[0].children[0].score - 1.6).abs() < 1e-12);
/// ```
pub fn calculate_cross_slope(graph: &Graph) -> GraphResult<Vec<EdgeSet>> {
    let view = graph.csr_view(DEFAULT_COST)?;
    let positions = graph.positions();

    let mut result = Vec::new();
    for parent in 0..view.rows() {
        let children: Vec<(usize, f64)> = view.row(parent).collect();
        if children.is_empty() {
            continue;
        }
        let p = &positions[parent];
        let directions: Vec<Option<Vector2<f64>>> = children
            .iter()
            .map(|&(c, _)| horizontal_direction(p, &positions[c]))
            .collect();

        let mut set = EdgeSet::new(parent, Vec::with_capacity(children.len()));
        for (i, &(child, default_score)) in children.iter().enumerate() {
            let score = directions[i].map_or(default_score, |dir| {
                let mut peers = children
                    .iter()
                    .zip(&directions)
                    .enumerate()
                    .filter(|&(j, (_, peer_dir))| {
                        j != i && peer_dir.is_some_and(|d| d.dot(&dir).abs() < ROUNDING_PRECISION)
                    })
                    .map(|(_, (&peer, _))| peer);

                match (peers.next(), peers.next()) {
                    (None, _) => default_score,
                    (Some((q, q_score)), None) => (p.z - positions[q].z).abs() + q_score,
                    (Some((q1, q1_score)), Some((q2, _))) => {
                        (positions[q1].z - positions[q2].z).abs() + q1_score
                    }
                }
            });
            set.children.push(IntEdge::new(child, score));
        }
        result.push(set);
    }

    Ok(result)
}

/// Compute cross-slope scores and store them under [`CROSS_SLOPE`].
///
/// # Errors
///
/// As [`calculate_cross_slope`].
pub fn store_cross_slope(graph: &mut Graph) -> GraphResult<()> {
    CostAlgorithm::CrossSlope.store(graph)
}

fn horizontal_direction(from: &Point3<f64>, to: &Point3<f64>) -> Option<Vector2<f64>> {
    let d = Vector2::new(to.x - from.x, to.y - from.y);
    let len = d.norm();
    (len > f64::EPSILON).then(|| d / len)
}

// =============================================================================
// Energy expenditure
// =============================================================================

/// Energy cost of walking a straight segment.
///
/// The grade `s = dz / d_horizontal` is clamped to `±0.4` (a purely
/// vertical segment takes the bound matching its direction) and fed to
/// `280.5 s^5 - 58.7 s^4 - 76.8 s^3 + 51.9 s^2 + 19.6 s + 2.5`, which is
/// then scaled by the segment's 3D length. Positive for any non-zero segment.
///
/// # Example
///
/// ```
/// use walk_graph::{Point3, energy_expenditure};
///
/// let flat = energy_expenditure(&Point3::origin(), &Point3::new(2.0, 0.0, 0.0));
/// assert!((flat - 5.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn energy_expenditure(from: &Point3<f64>, to: &Point3<f64>) -> f64 {
    let delta = to - from;
    let horizontal = delta.xy().norm();
    let vertical = delta.z;

    let grade = if horizontal > 0.0 {
        (vertical / horizontal).clamp(-MAX_GRADE, MAX_GRADE)
    } else if vertical > 0.0 {
        MAX_GRADE
    } else if vertical < 0.0 {
        -MAX_GRADE
    } else {
        0.0
    };

    let s = grade;
    let factor = s.mul_add(
        s.mul_add(s.mul_add(s.mul_add(280.5_f64.mul_add(s, -58.7), -76.8), 51.9), 19.6),
        2.5,
    );
    factor * delta.norm()
}

/// Energy expenditure scores for every edge of a compressed graph.
///
/// # Errors
///
/// Returns [`GraphError::NotCompressed`](crate::GraphError::NotCompressed)
/// if the graph has pending writes.
pub fn calculate_energy_expenditure(graph: &Graph) -> GraphResult<Vec<EdgeSet>> {
    let view = graph.csr_view(DEFAULT_COST)?;
    let positions = graph.positions();

    Ok((0..view.rows())
        .filter(|&r| !view.row_range(r).is_empty())
        .map(|parent| {
            let p = &positions[parent];
            let children = view
                .row(parent)
                .map(|(c, _)| IntEdge::new(c, energy_expenditure(p, &positions[c])))
                .collect();
            EdgeSet::new(parent, children)
        })
        .collect())
}

/// Compute energy expenditure scores and store them under [`ENERGY_EXPENDITURE`].
///
/// # Errors
///
/// As [`calculate_energy_expenditure`].
pub fn store_energy_expenditure(graph: &mut Graph) -> GraphResult<()> {
    CostAlgorithm::EnergyExpenditure.store(graph)
}
