//! Property-based tests for the path engine.
//!
//! Run with: cargo test -p walk-path -- proptest

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::cast_precision_loss)]

use proptest::prelude::*;
use walk_path::{Graph, PathEngine};
use walk_graph::Point3;

// =============================================================================
// Strategies
// =============================================================================

/// Node count and non-negative `(parent, child, score)` edges over it.
fn arb_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize, f64)>)> {
    (2usize..12).prop_flat_map(|n| {
        let edge = (0..n, 0..n, 0.0..10.0f64);
        (Just(n), prop::collection::vec(edge, 0..40))
    })
}

fn build(n: usize, edges: &[(usize, usize, f64)]) -> Graph {
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

// =============================================================================
// Paths
// =============================================================================

proptest! {
    /// Paths run from source to target and their costs sum to the distance,
    /// including a node's path back to itself.
    #[test]
    fn path_cost_matches_distance((n, edges) in arb_graph()) {
        let graph = build(n, &edges);
        let engine = PathEngine::new(&graph, "").unwrap();
        let matrix = engine.dist_pred_matrix();

        for a in 0..n {
            for b in 0..n {
                match engine.shortest_path(a, b).unwrap() {
                    Some(path) => {
                        prop_assert_eq!(path.head(), Some(a));
                        prop_assert_eq!(path.tail(), Some(b));
                        prop_assert_eq!(path.members().last().unwrap().cost, 0.0);
                        prop_assert_eq!(path.total_cost(), matrix.distance(a, b));
                    }
                    None => prop_assert!(matrix.distance(a, b).is_infinite()),
                }
            }
        }
    }

    /// Batched queries agree with single queries.
    #[test]
    fn batch_matches_single((n, edges) in arb_graph(), picks in prop::collection::vec((0usize..100, 0usize..100), 1..20)) {
        let graph = build(n, &edges);
        let engine = PathEngine::new(&graph, "").unwrap();
        let pairs: Vec<(usize, usize)> = picks.iter().map(|&(a, b)| (a % n, b % n)).collect();

        let batch = engine.shortest_paths(&pairs).unwrap();
        for (&(a, b), path) in pairs.iter().zip(&batch) {
            let single = engine.shortest_path(a, b).unwrap();
            prop_assert_eq!(path.as_ref().map(walk_path::Path::total_cost), single.as_ref().map(walk_path::Path::total_cost));
            prop_assert_eq!(path.is_some(), single.is_some());
        }
    }
}

// =============================================================================
// Matrices
// =============================================================================

proptest! {
    /// Every predecessor closes an edge that realizes the optimal distance.
    #[test]
    fn predecessors_are_consistent((n, edges) in arb_graph()) {
        let graph = build(n, &edges);
        let view = graph.csr_view("").unwrap();
        let matrix = walk_path::dist_pred_matrix(&graph, "").unwrap();

        for a in 0..n {
            prop_assert_eq!(matrix.predecessor(a, a), Some(a));
            for b in (0..n).filter(|&b| b != a) {
                match matrix.predecessor(a, b) {
                    Some(x) => {
                        let score = view.get(x, b);
                        prop_assert!(score.is_some());
                        // The diagonal holds self-loops, not the zero distance to the source
                        let base = if x == a { 0.0 } else { matrix.distance(a, x) };
                        prop_assert_eq!(matrix.distance(a, b), base + score.unwrap());
                    }
                    None => prop_assert!(matrix.distance(a, b).is_infinite()),
                }
            }
        }
    }
}
