//! End-to-end scenarios across the walk crates.
//!
//! Each scenario builds a scene, generates a graph and queries it the way an
//! analysis session would. They double as regression tests for the public
//! API of the umbrella crate.
//!
//! Run with: cargo test -p walk --test scenarios

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]

use std::f64::consts::SQRT_2;

use approx::assert_relative_eq;
use walk::mesh::primitives::{box_mesh, heightfield, plane};
use walk::prelude::*;

// =============================================================================
// Fixtures
// =============================================================================

/// A 20 x 20 floor at z = 0 with its edges on integer lattice lines.
fn plane_scene() -> Scene {
    Scene::from_mesh(&plane(-10.0, -10.0, 10.0, 10.0, 0.0), SceneConfig::default()).unwrap()
}

/// The same floor trimmed by half a cell, so its lattice points span -9..=9.
fn floor_scene() -> Scene {
    Scene::from_mesh(&plane(-9.5, -9.5, 9.5, 9.5, 0.0), SceneConfig::default()).unwrap()
}

/// A smooth mound rising 8 units above a flat field.
fn blob_scene() -> Scene {
    let blob = heightfield(-40.0, -40.0, 40.0, 40.0, 1.0, |x, y| {
        8.0 * (-(x * x + y * y) / (2.0 * 12.0 * 12.0)).exp()
    });
    Scene::from_mesh(&blob, SceneConfig::default()).unwrap()
}

fn blob_config() -> GeneratorConfig {
    GeneratorConfig::new()
        .with_start(Point3::new(-30.0, 0.0, 20.0))
        .with_spacing(Vector3::new(1.0, 1.0, 10.0))
        .with_steps(5.0, 5.0)
        .with_slopes(60.0, 60.0)
        .with_max_nodes(5000)
}

/// Compressed graph over unit-spaced nodes with the given default edges.
fn graph_with(n: usize, edges: &[(usize, usize, f64)]) -> Graph {
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

fn s4_graph() -> Graph {
    graph_with(
        5,
        &[(0, 1, 1.0), (0, 2, 2.0), (1, 3, 3.0), (2, 4, 1.0), (3, 4, 5.0)],
    )
}

/// Checks shared by every generated graph: no self-loops, and every node
/// but the seed is entered by at least one edge.
fn assert_generated_invariants(graph: &Graph) {
    let view = graph.csr_view("").unwrap();
    let mut incoming = vec![0usize; graph.len()];
    for (parent, child, score) in view.triplets() {
        assert_ne!(parent, child, "self-loop on {parent}");
        assert!(score > 0.0);
        incoming[child] += 1;
    }
    for (id, count) in incoming.iter().enumerate().skip(1) {
        assert!(*count > 0, "node {id} has no incoming edge");
    }
}

// =============================================================================
// S1: flat floor, unit spacing
// =============================================================================

fn s1_config() -> GeneratorConfig {
    GeneratorConfig::new()
        .with_start(Point3::new(0.0, 0.0, 1.0))
        .with_steps(1.0, 1.0)
        .with_slopes(60.0, 60.0)
        .with_max_nodes(100_000)
}

/// Lattice points on the closed 20 x 20 plane, boundary included.
#[test]
fn s1_plane_lattice_includes_edges() {
    let mut graph = generate_graph(&plane_scene(), s1_config()).unwrap();
    graph.compress();

    assert_eq!(graph.len(), 21 * 21);
    assert_generated_invariants(&graph);
    assert!(graph.id_from_position(&Point3::new(10.0, -10.0, 0.0)).is_some());

    for node in graph.nodes() {
        let p = node.position;
        let edges = graph.outgoing_edges(node.id, "").unwrap().len();
        let on_edge = |v: f64| (v.abs() - 10.0).abs() < 1e-9;
        match (on_edge(p.x), on_edge(p.y)) {
            (false, false) => assert_eq!(edges, 8, "interior node {p:?}"),
            (true, true) => assert_eq!(edges, 3, "corner node {p:?}"),
            _ => assert_eq!(edges, 5, "edge node {p:?}"),
        }
    }
}

/// Lattice points strictly inside the plane, with the boundary ring trimmed.
#[test]
fn s1_floor_lattice() {
    let mut graph = generate_graph(&floor_scene(), s1_config()).unwrap();
    graph.compress();

    assert_eq!(graph.len(), 19 * 19);
    assert_generated_invariants(&graph);

    for node in graph.nodes() {
        let p = node.position;
        assert_eq!(p.z, 0.0);
        let edges = graph.outgoing_edges(node.id, "").unwrap();
        if p.x.abs() < 9.0 && p.y.abs() < 9.0 {
            assert_eq!(edges.len(), 8, "interior node {p:?}");
        }
        for edge in edges {
            let axis = (edge.score - 1.0).abs() < 1e-9;
            let diagonal = (edge.score - SQRT_2).abs() < 1e-9;
            assert!(axis || diagonal, "unexpected score {}", edge.score);
        }
    }
}

// =============================================================================
// S2: fine spacing stopped by the node cap
// =============================================================================

#[test]
fn s2_node_cap() {
    let scene = floor_scene();
    let config = GeneratorConfig::new()
        .with_start(Point3::new(0.0, 0.0, 1.0))
        .with_spacing(Vector3::new(0.05, 0.05, 0.05))
        .with_max_nodes(5000)
        .with_max_step_connections(1);

    let mut graph = generate_graph(&scene, config).unwrap();
    assert!(graph.len() >= 5000);
    assert!(graph.len() <= 5000 + 7);

    graph.compress();
    assert_generated_invariants(&graph);

    let last = graph.len() - 1;
    let path = shortest_path(&graph, "", 0, last).unwrap().unwrap();
    assert_eq!(path.head(), Some(0));
    assert_eq!(path.tail(), Some(last));
}

// =============================================================================
// S3: sloped blob, energy expenditure
// =============================================================================

#[test]
fn s3_blob_is_reproducible_and_costed() {
    let scene = blob_scene();

    let mut first = generate_graph(&scene, blob_config()).unwrap();
    let mut second = generate_graph(&scene, blob_config()).unwrap();
    assert!(first.len() > 1);
    assert_eq!(first.positions(), second.positions());

    first.compress();
    second.compress();
    assert_eq!(first.edges("").unwrap(), second.edges("").unwrap());
    assert_generated_invariants(&first);

    // Nodes climb the mound
    assert!(first.positions().iter().any(|p| p.z > 1.0));

    store_energy_expenditure(&mut first).unwrap();
    let energy = first.csr_view(ENERGY_EXPENDITURE).unwrap();
    assert_eq!(energy.nnz(), first.edge_count("").unwrap());
    assert!(energy.values().iter().all(|&e| e > 0.0));

    let last = first.len() - 1;
    let by_length = shortest_path(&first, "", 0, last).unwrap().unwrap();
    let by_energy = shortest_path(&first, ENERGY_EXPENDITURE, 0, last).unwrap().unwrap();
    assert_eq!(by_length.head(), by_energy.head());
    assert_eq!(by_length.tail(), by_energy.tail());
}

#[test]
fn s3_single_thread_matches_pool() {
    let scene = blob_scene();
    let config = blob_config().with_max_nodes(800);

    let single = generate_graph(&scene, config.clone().with_parallelism(Parallelism::Single)).unwrap();
    let pooled = generate_graph(&scene, config.with_parallelism(Parallelism::Threads(4))).unwrap();
    assert_eq!(single.positions(), pooled.positions());
}

// =============================================================================
// S4, S5: hand-built graphs
// =============================================================================

#[test]
fn s4_shortest_paths() {
    let graph = s4_graph();

    let path = shortest_path(&graph, "", 0, 3).unwrap().unwrap();
    let members: Vec<(usize, f64)> = path.members().iter().map(|m| (m.node, m.cost)).collect();
    assert_eq!(members, vec![(0, 1.0), (1, 3.0), (3, 0.0)]);
    assert_eq!(path.total_cost(), 4.0);

    let path = shortest_path(&graph, "", 0, 4).unwrap().unwrap();
    let members: Vec<(usize, f64)> = path.members().iter().map(|m| (m.node, m.cost)).collect();
    assert_eq!(members, vec![(0, 2.0), (2, 1.0), (4, 0.0)]);
    assert_eq!(path.total_cost(), 3.0);
}

#[test]
fn s5_negative_cost() {
    let mut graph = s4_graph();
    graph.add_edge(3, 4, -1.0, "").unwrap();
    graph.compress();

    let err = shortest_path(&graph, "", 0, 4).unwrap_err();
    assert!(err.is_negative_cost());
}

// =============================================================================
// S6: aggregation
// =============================================================================

#[test]
fn s6_aggregate_sum() {
    let graph = graph_with(3, &[(0, 1, 30.0), (1, 0, 15.0), (0, 2, 45.0)]);

    let directed = graph.aggregate("", AggregationType::Sum, true).unwrap();
    assert_eq!(directed, vec![75.0, 15.0, 0.0]);

    let undirected = graph.aggregate("", AggregationType::Sum, false).unwrap();
    assert_eq!(undirected, vec![90.0, 45.0, 45.0]);
}

// =============================================================================
// Boundary cases
// =============================================================================

#[test]
fn seed_below_geometry_gives_empty_graph() {
    let scene = floor_scene();
    let config = GeneratorConfig::new().with_start(Point3::new(0.0, 0.0, -2.0));
    let graph = generate_graph(&scene, config).unwrap();
    assert!(graph.is_empty());
}

#[test]
fn zero_cap_keeps_the_seed() {
    let scene = floor_scene();
    let config = GeneratorConfig::new()
        .with_start(Point3::new(0.0, 0.0, 1.0))
        .with_max_nodes_hint(0);
    let graph = generate_graph(&scene, config).unwrap();
    assert_eq!(graph.len(), 1);
}

#[test]
fn disconnected_destination_has_no_path() {
    let graph = graph_with(3, &[(0, 1, 1.0)]);
    assert!(shortest_path(&graph, "", 0, 2).unwrap().is_none());
}

#[test]
fn walls_split_the_floor() {
    // Full-height wall across the floor at x = 0.5
    let floor = plane(-9.5, -9.5, 9.5, 9.5, 0.0);
    let wall = box_mesh(Point3::new(0.4, -9.5, 0.0), Point3::new(0.6, 9.5, 3.0));
    let scene = Scene::new(&[floor, wall], SceneConfig::default()).unwrap();

    let config = GeneratorConfig::new().with_start(Point3::new(-5.0, 0.0, 1.0));
    let graph = generate_graph(&scene, config).unwrap();

    assert_eq!(graph.len(), 10 * 19);
    assert!(graph.positions().iter().all(|p| p.x < 0.5));
}

#[test]
fn stairs_follow_step_limits() {
    // Three 0.15 risers, each one unit deep
    let mut meshes = vec![plane(-5.5, -2.5, 5.5, 2.5, 0.0)];
    for i in 0..3 {
        let x0 = f64::from(i) + 0.5;
        let top = 0.15 * f64::from(i + 1);
        meshes.push(box_mesh(Point3::new(x0, -2.5, 0.0), Point3::new(5.5, 2.5, top)));
    }
    let scene = Scene::new(&meshes, SceneConfig::default()).unwrap();
    let start = Point3::new(-4.0, 0.0, 1.0);

    let climb = generate_graph(&scene, GeneratorConfig::new().with_start(start)).unwrap();
    let top = climb.positions().iter().map(|p| p.z).fold(f64::MIN, f64::max);
    assert_relative_eq!(top, 0.45, epsilon = 1e-9);

    let blocked = generate_graph(
        &scene,
        GeneratorConfig::new().with_start(start).with_steps(0.1, 0.1),
    )
    .unwrap();
    assert!(blocked.positions().iter().all(|p| p.z == 0.0));
}

#[test]
fn cross_slope_and_attributes_on_generated_graph() {
    let scene = floor_scene();
    let config = GeneratorConfig::new()
        .with_start(Point3::new(0.0, 0.0, 1.0))
        .with_max_nodes(50);
    let mut graph = generate_graph(&scene, config).unwrap();
    graph.compress();

    CostAlgorithm::CrossSlope.store(&mut graph).unwrap();
    assert_eq!(graph.cost_names(), vec!["", CROSS_SLOPE]);
    assert_eq!(
        graph.edge_count(CROSS_SLOPE).unwrap(),
        graph.edge_count("").unwrap()
    );

    // Flat lattice: perpendicular peers are as long as the edge and level
    let base = graph.csr_view("").unwrap();
    let cross = graph.csr_view(CROSS_SLOPE).unwrap();
    for (p, c, score) in cross.triplets() {
        assert_relative_eq!(score, base.get(p, c).unwrap(), epsilon = 1e-9);
    }

    let ids: Vec<usize> = (0..graph.len()).collect();
    let labels: Vec<String> = ids.iter().map(|i| format!("n{i}")).collect();
    graph.add_node_attributes(&ids, "label", &labels).unwrap();
    assert_eq!(graph.node_attributes("label")[3], "n3");
}
