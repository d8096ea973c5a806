//! Shortest-path queries against one cost of a compressed graph.

use hashbrown::HashMap;
use rayon::prelude::*;
use tracing::{debug, info};
use walk_graph::{CsrView, Graph};

use crate::dijkstra::{ShortestPathTree, check_non_negative};
use crate::error::{PathError, PathResult};
use crate::path::Path;

/// Row-major distance and predecessor matrices for every pair of nodes.
///
/// The diagonal holds the self-loop score, or infinity when a node has no
/// self-loop. A node is its own predecessor; unreachable pairs have none.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistPredMatrix {
    size: usize,
    distances: Vec<f64>,
    predecessors: Vec<Option<usize>>,
}

impl DistPredMatrix {
    /// Number of rows (and columns).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Optimal cost from `from` to `to`; infinite if unreachable or out of range.
    #[must_use]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.index(from, to)
            .map_or(f64::INFINITY, |i| self.distances[i])
    }

    /// Node preceding `to` on the optimal path from `from`.
    #[must_use]
    pub fn predecessor(&self, from: usize, to: usize) -> Option<usize> {
        self.index(from, to).and_then(|i| self.predecessors[i])
    }

    /// The distance matrix, row-major.
    #[must_use]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// The predecessor matrix, row-major.
    #[must_use]
    pub fn predecessors(&self) -> &[Option<usize>] {
        &self.predecessors
    }

    fn index(&self, from: usize, to: usize) -> Option<usize> {
        (from < self.size && to < self.size).then(|| from * self.size + to)
    }
}

/// Shortest paths over one named cost of a compressed [`Graph`].
///
/// Creating the engine checks once that the cost exists, the graph is
/// compressed and no score is negative; queries after that only validate
/// node ids.
///
/// # Example
///
/// ```
/// use walk_graph::{Graph, Point3};
/// use walk_path::PathEngine;
///
/// let mut graph = Graph::new();
/// for x in 0..3 {
///     graph.intern(Point3::new(f64::from(x), 0.0, 0.0)).unwrap();
/// }
/// graph.add_edge(0, 1, 1.0, "").unwrap();
/// graph.add_edge(1, 2, 1.0, "").unwrap();
/// graph.add_edge(0, 2, 3.0, "").unwrap();
/// graph.compress();
///
/// let engine = PathEngine::new(&graph, "").unwrap();
/// let path = engine.shortest_path(0, 2).unwrap().unwrap();
/// assert_eq!(path.nodes(), vec![0, 1, 2]);
/// assert!(engine.shortest_path(2, 0).unwrap().is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathEngine<'a> {
    view: CsrView<'a>,
}

impl<'a> PathEngine<'a> {
    /// Prepare queries over `cost`.
    ///
    /// # Errors
    ///
    /// - [`PathError::Graph`] if the graph is not compressed or the cost is unknown
    /// - [`PathError::NegativeCost`] if any score under `cost` is negative
    pub fn new(graph: &'a Graph, cost: &str) -> PathResult<Self> {
        let view = graph.csr_view(cost)?;
        check_non_negative(view)?;
        Ok(Self { view })
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.view.rows()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.rows() == 0
    }

    fn check(&self, id: usize) -> PathResult<()> {
        if id < self.len() {
            Ok(())
        } else {
            Err(PathError::OutOfRange {
                id,
                len: self.len(),
            })
        }
    }

    /// The full shortest-path tree from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::OutOfRange`] for an unknown source.
    pub fn tree(&self, source: usize) -> PathResult<ShortestPathTree> {
        self.check(source)?;
        Ok(ShortestPathTree::build(self.view, source, None))
    }

    /// Cheapest path from `source` to `target`, `None` if unreachable.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::OutOfRange`] for an unknown node.
    pub fn shortest_path(&self, source: usize, target: usize) -> PathResult<Option<Path>> {
        self.check(source)?;
        self.check(target)?;
        Ok(ShortestPathTree::build(self.view, source, Some(target)).path_to(target))
    }

    /// Cheapest paths for many `(source, target)` pairs.
    ///
    /// Pairs sharing a source share one search; searches run in parallel.
    /// Results keep the order of `pairs`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::OutOfRange`] for the first unknown node. No search
    /// runs in that case.
    pub fn shortest_paths(&self, pairs: &[(usize, usize)]) -> PathResult<Vec<Option<Path>>> {
        for &(source, target) in pairs {
            self.check(source)?;
            self.check(target)?;
        }

        let mut sources: Vec<usize> = pairs.iter().map(|&(s, _)| s).collect();
        sources.sort_unstable();
        sources.dedup();
        debug!(pairs = pairs.len(), sources = sources.len(), "Searching shortest paths");

        let trees: Vec<(usize, ShortestPathTree)> = sources
            .par_iter()
            .map(|&s| (s, ShortestPathTree::build(self.view, s, None)))
            .collect();
        let trees: HashMap<usize, ShortestPathTree> = trees.into_iter().collect();

        Ok(pairs
            .iter()
            .map(|(source, target)| trees.get(source).and_then(|tree| tree.path_to(*target)))
            .collect())
    }

    /// Cheapest paths from one source to each of `targets`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::OutOfRange`] for an unknown node.
    pub fn shortest_paths_from(
        &self,
        source: usize,
        targets: &[usize],
    ) -> PathResult<Vec<Option<Path>>> {
        self.check(source)?;
        for &target in targets {
            self.check(target)?;
        }
        let tree = ShortestPathTree::build(self.view, source, None);
        Ok(targets.iter().map(|&t| tree.path_to(t)).collect())
    }

    /// Cheapest path between every ordered pair, indexed `[source][target]`.
    ///
    /// The diagonal holds a node's self-loop as a path, or `None`.
    #[must_use]
    pub fn all_pairs_paths(&self) -> Vec<Vec<Option<Path>>> {
        let n = self.len();
        info!(nodes = n, "Computing all-pairs paths");
        (0..n)
            .into_par_iter()
            .map(|source| {
                let tree = ShortestPathTree::build(self.view, source, None);
                (0..n).map(|target| tree.path_to(target)).collect()
            })
            .collect()
    }

    /// Distance and predecessor matrices for every pair.
    #[must_use]
    pub fn dist_pred_matrix(&self) -> DistPredMatrix {
        let n = self.len();
        info!(nodes = n, "Computing distance and predecessor matrices");

        let rows: Vec<(Vec<f64>, Vec<Option<usize>>)> = (0..n)
            .into_par_iter()
            .map(|source| {
                let tree = ShortestPathTree::build(self.view, source, None);
                let mut distances = tree.distances().to_vec();
                let mut predecessors = tree.predecessors().to_vec();
                distances[source] = self.view.get(source, source).unwrap_or(f64::INFINITY);
                predecessors[source] = Some(source);
                (distances, predecessors)
            })
            .collect();

        let mut distances = Vec::with_capacity(n * n);
        let mut predecessors = Vec::with_capacity(n * n);
        for (d, p) in rows {
            distances.extend(d);
            predecessors.extend(p);
        }

        DistPredMatrix {
            size: n,
            distances,
            predecessors,
        }
    }
}

/// Cheapest path from `source` to `target` under `cost`.
///
/// # Errors
///
/// As [`PathEngine::new`] and [`PathEngine::shortest_path`].
pub fn shortest_path(
    graph: &Graph,
    cost: &str,
    source: usize,
    target: usize,
) -> PathResult<Option<Path>> {
    PathEngine::new(graph, cost)?.shortest_path(source, target)
}

/// Cheapest paths for many pairs under `cost`, in input order.
///
/// # Errors
///
/// As [`PathEngine::new`] and [`PathEngine::shortest_paths`].
pub fn shortest_paths(
    graph: &Graph,
    cost: &str,
    pairs: &[(usize, usize)],
) -> PathResult<Vec<Option<Path>>> {
    PathEngine::new(graph, cost)?.shortest_paths(pairs)
}

/// Cheapest paths between every ordered pair under `cost`.
///
/// # Errors
///
/// As [`PathEngine::new`].
pub fn all_pairs_paths(graph: &Graph, cost: &str) -> PathResult<Vec<Vec<Option<Path>>>> {
    Ok(PathEngine::new(graph, cost)?.all_pairs_paths())
}

/// Distance and predecessor matrices under `cost`.
///
/// # Errors
///
/// As [`PathEngine::new`].
pub fn dist_pred_matrix(graph: &Graph, cost: &str) -> PathResult<DistPredMatrix> {
    Ok(PathEngine::new(graph, cost)?.dist_pred_matrix())
}
