//! Breadth-first graph generation over a scene.
//!
//! Starting from a seed projected onto the ground, every expanded node
//! probes a square lattice of offsets around itself. Each probe is dropped
//! onto the scene with a downward ray. The resulting candidate becomes a
//! child if it stays within the step and slope limits and nothing but a
//! ledge of at most one step lies between it and the parent.
//!
//! Candidates for a batch of frontier nodes are evaluated in parallel, then
//! merged into the graph on one thread in frontier order. Node ids therefore
//! depend only on the scene and the configuration, never on scheduling.

use std::collections::VecDeque;

use nalgebra::{Point3, Vector3};
use rayon::ThreadPool;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walk_graph::{DEFAULT_COST, Graph, NodeKey, snap_to_precision};
use walk_scene::Scene;

use crate::config::{GeneratorConfig, Parallelism};
use crate::error::GenerateResult;

/// Summary of one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Nodes in the generated graph.
    pub nodes: usize,
    /// Edges written under the default cost.
    pub edges: usize,
    /// Frontier batches expanded.
    pub batches: usize,
    /// Probes that produced no edge.
    pub rejected: usize,
}

/// A feasible child found while expanding one parent.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    child: Point3<f64>,
    score: f64,
}

/// Everything one parent contributes to a batch.
#[derive(Debug)]
struct Expansion {
    parent: usize,
    accepted: Vec<Candidate>,
    rejected: usize,
}

/// Where candidate evaluation runs.
enum Workers {
    Global,
    Single,
    Pool(ThreadPool),
}

impl Workers {
    fn new(parallelism: Parallelism) -> GenerateResult<Self> {
        Ok(match parallelism {
            Parallelism::All => Self::Global,
            Parallelism::Single => Self::Single,
            Parallelism::Threads(n) => {
                Self::Pool(rayon::ThreadPoolBuilder::new().num_threads(n).build()?)
            }
        })
    }

    /// Order-preserving map over `items`.
    fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        match self {
            Self::Single => items.iter().map(f).collect(),
            Self::Global => items.par_iter().map(f).collect(),
            Self::Pool(pool) => pool.install(|| items.par_iter().map(f).collect()),
        }
    }
}

/// Lattice offsets `(i, j)` for `-k <= i, j <= k`, skipping the center,
/// in row-major order (`i` outer, `j` inner).
#[allow(clippy::cast_precision_loss)]
fn lattice_offsets(k: usize, spacing: &Vector3<f64>) -> Vec<Vector3<f64>> {
    let k = i64::try_from(k).unwrap_or(i64::MAX);
    let mut offsets = Vec::new();
    for i in -k..=k {
        for j in -k..=k {
            if i == 0 && j == 0 {
                continue;
            }
            offsets.push(Vector3::new(i as f64 * spacing.x, j as f64 * spacing.y, 0.0));
        }
    }
    offsets
}

/// Grows an accessibility graph over a [`Scene`].
///
/// # Example
///
/// ```
/// use walk_generate::{GeneratorConfig, GraphGenerator, Point3};
/// use walk_mesh::primitives::plane;
/// use walk_scene::{Scene, SceneConfig};
///
/// let floor = plane(-2.5, -2.5, 2.5, 2.5, 0.0);
/// let scene = Scene::from_mesh(&floor, SceneConfig::default()).unwrap();
///
/// let config = GeneratorConfig::new().with_start(Point3::new(0.0, 0.0, 1.0));
/// let graph = GraphGenerator::new(&scene, config).unwrap().generate().unwrap();
///
/// // A 5 x 5 lattice fits on the floor
/// assert_eq!(graph.len(), 25);
/// ```
#[derive(Debug)]
pub struct GraphGenerator<'a> {
    scene: &'a Scene,
    config: GeneratorConfig,
    offsets: Vec<Vector3<f64>>,
}

impl<'a> GraphGenerator<'a> {
    /// Prepare a generator for `scene`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidConfig`](crate::GenerateError::InvalidConfig)
    /// if the configuration fails validation.
    pub fn new(scene: &'a Scene, config: GeneratorConfig) -> GenerateResult<Self> {
        config.validate()?;
        let offsets = lattice_offsets(config.max_step_connections(), config.spacing());
        Ok(Self {
            scene,
            config,
            offsets,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the graph.
    ///
    /// The result is left uncompressed. A seed that does not project onto
    /// the scene yields an empty graph.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::ThreadPool`](crate::GenerateError::ThreadPool) if a
    ///   dedicated pool cannot be built
    /// - [`GenerateError::Graph`](crate::GenerateError::Graph) if a node or
    ///   edge cannot be stored
    pub fn generate(&self) -> GenerateResult<Graph> {
        self.generate_with_stats().map(|(graph, _)| graph)
    }

    /// Generate the graph and report what happened.
    ///
    /// # Errors
    ///
    /// As [`generate`](Self::generate).
    pub fn generate_with_stats(&self) -> GenerateResult<(Graph, GenerationStats)> {
        let workers = Workers::new(self.config.parallelism())?;
        let mut graph = Graph::new();
        let mut stats = GenerationStats::default();
        let cap = self.config.max_nodes();

        info!(
            start = ?self.config.start(),
            spacing = ?self.config.spacing(),
            max_nodes = ?cap,
            probes = self.offsets.len(),
            "Generating graph"
        );

        let Some(seed) = self.project(self.config.start()) else {
            warn!(start = ?self.config.start(), "Start does not project onto the scene");
            return Ok((graph, stats));
        };
        let mut queue = VecDeque::from([graph.intern(seed)?]);

        'frontier: while !queue.is_empty() {
            let remaining = match cap {
                Some(cap) if graph.len() >= cap => break,
                Some(cap) => (cap - graph.len()).min(queue.len()),
                None => queue.len(),
            };
            let parents: Vec<(usize, Point3<f64>)> = queue
                .drain(..remaining)
                .map(|id| (id, graph.positions()[id]))
                .collect();
            stats.batches += 1;
            debug!(
                batch = stats.batches,
                parents = parents.len(),
                nodes = graph.len(),
                "Expanding frontier"
            );

            let expansions = workers.map(&parents, |(id, position)| self.expand(*id, position));

            for expansion in expansions {
                stats.rejected += expansion.rejected;
                for candidate in &expansion.accepted {
                    let before = graph.len();
                    let child = graph.intern(candidate.child)?;
                    if graph.len() > before {
                        queue.push_back(child);
                    }
                    graph.add_edge(expansion.parent, child, candidate.score, DEFAULT_COST)?;
                    stats.edges += 1;
                }
                if cap.is_some_and(|cap| graph.len() >= cap) {
                    break 'frontier;
                }
            }
        }

        stats.nodes = graph.len();
        info!(
            nodes = stats.nodes,
            edges = stats.edges,
            batches = stats.batches,
            rejected = stats.rejected,
            "Graph generated"
        );
        Ok((graph, stats))
    }

    /// Probe every lattice offset around one parent.
    fn expand(&self, parent: usize, position: &Point3<f64>) -> Expansion {
        let parent_key = NodeKey::from_position(position);
        let lift = self.config.spacing().z;
        let mut accepted = Vec::with_capacity(self.offsets.len());
        let mut rejected = 0;

        for offset in &self.offsets {
            let probe = Point3::new(position.x + offset.x, position.y + offset.y, position.z + lift);
            let child = self.project(&probe).filter(|child| {
                NodeKey::from_position(child) != parent_key && self.feasible(position, child)
            });
            match child {
                Some(child) => accepted.push(Candidate {
                    child,
                    score: (child - position).norm(),
                }),
                None => rejected += 1,
            }
        }

        Expansion {
            parent,
            accepted,
            rejected,
        }
    }

    /// Drop `probe` onto the scene, snapping the result to the node grid.
    ///
    /// Query failures count as a miss.
    fn project(&self, probe: &Point3<f64>) -> Option<Point3<f64>> {
        let origin = Point3::new(snap_to_precision(probe.x), snap_to_precision(probe.y), probe.z);
        let hit = self
            .scene
            .ray_point(origin, -Vector3::z(), -1.0)
            .ok()
            .flatten()?;
        Some(Point3::new(origin.x, origin.y, snap_to_precision(hit.z)))
    }

    /// Step, slope and line-of-sight checks for the edge `from -> to`.
    fn feasible(&self, from: &Point3<f64>, to: &Point3<f64>) -> bool {
        let rise = to.z - from.z;
        let run = (to.x - from.x).hypot(to.y - from.y);
        let (max_step, max_slope) = if rise >= 0.0 {
            (self.config.up_step(), self.config.up_slope())
        } else {
            (self.config.down_step(), self.config.down_slope())
        };

        rise.abs() <= max_step
            && rise.abs().atan2(run).to_degrees() <= max_slope
            && self.line_of_sight(from, to)
    }

    /// Ground connectivity between two ground points.
    ///
    /// Both ends are lifted by the scene's surface offset. If that segment is
    /// blocked, the start is raised by the step limit for the direction of
    /// travel and tested again, which lets an edge climb onto or off a ledge
    /// no taller than a step.
    fn line_of_sight(&self, from: &Point3<f64>, to: &Point3<f64>) -> bool {
        let offset = self.scene.surface_offset();
        let target = Point3::new(to.x, to.y, to.z + offset);
        if self.unobstructed(&Point3::new(from.x, from.y, from.z + offset), &target) {
            return true;
        }

        let step = if to.z < from.z {
            self.config.down_step()
        } else {
            self.config.up_step()
        };
        self.unobstructed(&Point3::new(from.x, from.y, from.z + offset + step), &target)
    }

    fn unobstructed(&self, from: &Point3<f64>, to: &Point3<f64>) -> bool {
        let direction = to - from;
        let distance = direction.norm();
        matches!(self.scene.ray_occluded(*from, direction, distance), Ok(false))
    }
}

/// Generate a graph with a one-off [`GraphGenerator`].
///
/// # Errors
///
/// As [`GraphGenerator::new`] and [`GraphGenerator::generate`].
pub fn generate_graph(scene: &Scene, config: GeneratorConfig) -> GenerateResult<Graph> {
    GraphGenerator::new(scene, config)?.generate()
}
