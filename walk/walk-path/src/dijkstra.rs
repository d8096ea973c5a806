//! Dijkstra's algorithm over a CSR view.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use walk_graph::CsrView;

use crate::error::{PathError, PathResult};
use crate::path::{Path, PathMember};

/// State for the priority queue.
#[derive(Debug, Clone, Copy)]
struct State {
    node: usize,
    cost: f64,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; ties pop the lower id first
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Fail on the first negative score in `view`, in row order.
pub(crate) fn check_non_negative(view: CsrView<'_>) -> PathResult<()> {
    match view.triplets().find(|&(_, _, score)| score < 0.0) {
        Some((parent, child, score)) => Err(PathError::NegativeCost {
            parent,
            child,
            score,
        }),
        None => Ok(()),
    }
}

/// Shortest-path distances and predecessors from one source.
///
/// Produced by [`PathEngine::tree`](crate::PathEngine::tree). Unreachable
/// nodes have infinite distance and no predecessor.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathTree {
    source: usize,
    distances: Vec<f64>,
    predecessors: Vec<Option<usize>>,
    /// Score of the tree edge entering each node.
    incoming: Vec<f64>,
    /// Score of the edge from the source back to itself, if any.
    self_loop: Option<f64>,
}

impl ShortestPathTree {
    /// Run Dijkstra from `source`, stopping early once `target` is settled.
    ///
    /// Scores must already be known to be non-negative.
    pub(crate) fn build(view: CsrView<'_>, source: usize, target: Option<usize>) -> Self {
        let n = view.rows();
        let mut distances = vec![f64::INFINITY; n];
        let mut predecessors = vec![None; n];
        let mut incoming = vec![0.0; n];
        let mut heap = BinaryHeap::new();

        distances[source] = 0.0;
        heap.push(State {
            node: source,
            cost: 0.0,
        });

        while let Some(State { node, cost }) = heap.pop() {
            if cost > distances[node] {
                continue;
            }
            if target == Some(node) {
                break;
            }

            for (child, score) in view.row(node) {
                let next = cost + score;
                if next < distances[child] {
                    distances[child] = next;
                    predecessors[child] = Some(node);
                    incoming[child] = score;
                    heap.push(State {
                        node: child,
                        cost: next,
                    });
                }
            }
        }

        Self {
            source,
            distances,
            predecessors,
            incoming,
            self_loop: view.get(source, source),
        }
    }

    /// The source node.
    #[must_use]
    pub const fn source(&self) -> usize {
        self.source
    }

    /// Number of nodes covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Returns `true` if the tree covers no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Total cost from the source to `node`; infinite if unreachable or unknown.
    #[must_use]
    pub fn distance(&self, node: usize) -> f64 {
        self.distances.get(node).copied().unwrap_or(f64::INFINITY)
    }

    /// Node before `node` on its shortest path. `None` for the source and
    /// for unreachable nodes.
    #[must_use]
    pub fn predecessor(&self, node: usize) -> Option<usize> {
        self.predecessors.get(node).copied().flatten()
    }

    /// Returns `true` if `node` can be reached from the source.
    #[must_use]
    pub fn is_reachable(&self, node: usize) -> bool {
        self.distance(node).is_finite()
    }

    /// Distances to every node, indexed by id.
    #[must_use]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Predecessors of every node, indexed by id.
    #[must_use]
    pub fn predecessors(&self) -> &[Option<usize>] {
        &self.predecessors
    }

    /// The shortest path from the source to `target`.
    ///
    /// A path back to the source exists only through a self-loop of score
    /// `s`, and is `[(source, s), (source, 0)]`.
    #[must_use]
    pub fn path_to(&self, target: usize) -> Option<Path> {
        if target == self.source {
            return self.self_loop.map(|score| {
                Path::new(vec![
                    PathMember::new(target, score),
                    PathMember::new(target, 0.0),
                ])
            });
        }
        if !self.is_reachable(target) {
            return None;
        }

        let mut nodes = vec![target];
        let mut current = target;
        while let Some(previous) = self.predecessor(current) {
            nodes.push(previous);
            current = previous;
        }
        nodes.reverse();

        let members = nodes
            .iter()
            .enumerate()
            .map(|(i, &node)| {
                let cost = nodes.get(i + 1).map_or(0.0, |&next| self.incoming[next]);
                PathMember::new(node, cost)
            })
            .collect();
        Some(Path::new(members))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use walk_graph::{Graph, Point3};

    #[allow(clippy::cast_precision_loss)]
    fn graph(n: usize, edges: &[(usize, usize, f64)]) -> Graph {
        let mut graph = Graph::new();
        for i in 0..n {
            graph.intern(Point3::new(i as f64, 0.0, 0.0)).unwrap();
        }
        for &(p, c, s) in edges {
            graph.add_edge(p, c, s, "").unwrap();
        }
        graph.compress();
        graph
    }

    #[test]
    fn heap_pops_cheapest_then_lowest_id() {
        let mut heap = BinaryHeap::new();
        for (node, cost) in [(3, 2.0), (1, 1.0), (2, 1.0), (0, 5.0)] {
            heap.push(State { node, cost });
        }
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop()).map(|s| s.node).collect();
        assert_eq!(order, vec![1, 2, 3, 0]);
    }

    #[test]
    fn tree_distances_and_path() {
        let g = graph(4, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0), (2, 3, 0.5)]);
        let tree = ShortestPathTree::build(g.csr_view("").unwrap(), 0, None);

        assert_eq!(tree.distances(), &[0.0, 1.0, 2.0, 2.5]);
        assert_eq!(tree.predecessor(2), Some(1));
        assert_eq!(tree.predecessor(0), None);

        let path = tree.path_to(3).unwrap();
        assert_eq!(path.nodes(), vec![0, 1, 2, 3]);
        assert_eq!(path.total_cost(), 2.5);
        assert_eq!(path.members().last().unwrap().cost, 0.0);
    }

    #[test]
    fn unreachable_nodes() {
        let g = graph(3, &[(0, 1, 1.0)]);
        let tree = ShortestPathTree::build(g.csr_view("").unwrap(), 1, None);
        assert!(!tree.is_reachable(0));
        assert!(tree.path_to(0).is_none());
        assert_eq!(tree.distance(2), f64::INFINITY);
        assert_eq!(tree.distance(99), f64::INFINITY);
    }

    #[test]
    fn path_to_source_needs_a_self_loop() {
        let g = graph(2, &[(0, 1, 1.0)]);
        let tree = ShortestPathTree::build(g.csr_view("").unwrap(), 0, None);
        assert!(tree.path_to(0).is_none());
        assert_eq!(tree.distance(0), 0.0);

        let looped = graph(2, &[(0, 1, 1.0), (1, 1, 0.25)]);
        let tree = ShortestPathTree::build(looped.csr_view("").unwrap(), 1, Some(1));
        let path = tree.path_to(1).unwrap();
        assert_eq!(
            path.members(),
            &[PathMember::new(1, 0.25), PathMember::new(1, 0.0)]
        );
        assert_eq!(path.total_cost(), 0.25);
    }

    #[test]
    fn early_exit_settles_target() {
        let g = graph(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
        let tree = ShortestPathTree::build(g.csr_view("").unwrap(), 0, Some(1));
        assert_eq!(tree.distance(1), 1.0);
        assert_eq!(tree.path_to(1).unwrap().nodes(), vec![0, 1]);
    }

    #[test]
    fn negative_scores_are_found() {
        let g = graph(3, &[(0, 1, 1.0), (2, 1, -0.5)]);
        let err = check_non_negative(g.csr_view("").unwrap()).unwrap_err();
        assert!(matches!(
            err,
            PathError::NegativeCost {
                parent: 2,
                child: 1,
                ..
            }
        ));

        let ok = graph(2, &[(0, 1, 0.0)]);
        assert!(check_non_negative(ok.csr_view("").unwrap()).is_ok());
    }
}
