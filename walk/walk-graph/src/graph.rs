//! The graph store: nodes, named edge costs and their CSR form.

use hashbrown::HashMap;
use nalgebra::Point3;
use tracing::debug;

use crate::csr::{Csr, CsrView};
use crate::edge::{EdgeSet, IntEdge};
use crate::error::{GraphError, GraphResult};
use crate::node::{Node, NodeKey};

/// Name of the default cost type, set by the generator to edge length.
pub const DEFAULT_COST: &str = "";

/// Whether the CSR reflects every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GraphState {
    /// Writes have been buffered since the last compression.
    #[default]
    Mutable,
    /// The CSR views are current and topology is frozen.
    Compressed,
}

/// Scores for one alternate cost type.
///
/// `values` is aligned with the default CSR; pairs without an override
/// carry the default score.
#[derive(Debug, Clone, Default)]
struct AlternateCost {
    overrides: HashMap<(usize, usize), f64>,
    values: Vec<f64>,
}

impl AlternateCost {
    fn materialize(&mut self, default: &Csr) {
        self.values = default
            .view()
            .triplets()
            .map(|(r, c, v)| self.overrides.get(&(r, c)).copied().unwrap_or(v))
            .collect();
    }
}

/// A directed graph over 3D positions with multiple named edge costs.
///
/// Nodes are interned by position: inserting a position that rounds to an
/// existing node returns that node's id. Ids are dense from zero in
/// insertion order.
///
/// Edges are written first under the default cost (`""`). Any other cost
/// name can then override scores of existing default edges, but never add
/// new pairs. Writes are buffered; [`compress`](Self::compress) builds the
/// CSR that every read query uses.
///
/// # Example
///
/// ```
/// use walk_graph::{Graph, Point3};
///
/// let mut graph = Graph::new();
/// let a = graph.intern(Point3::new(0.0, 0.0, 0.0)).unwrap();
/// let b = graph.intern(Point3::new(1.0, 0.0, 0.0)).unwrap();
/// let c = graph.intern(Point3::new(1.0, 1.0, 0.0)).unwrap();
///
/// graph.add_edge(a, b, 1.0, "").unwrap();
/// graph.add_edge(b, c, 1.0, "").unwrap();
/// graph.compress();
///
/// // Stairs are twice as expensive
/// graph.add_edge(b, c, 2.0, "Stairs").unwrap();
///
/// assert_eq!(graph.csr_view("").unwrap().get(b, c), Some(1.0));
/// assert_eq!(graph.csr_view("Stairs").unwrap().get(b, c), Some(2.0));
/// assert_eq!(graph.csr_view("Stairs").unwrap().get(a, b), Some(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    positions: Vec<Point3<f64>>,
    index: HashMap<NodeKey, usize>,
    pending: Vec<(usize, usize, f64)>,
    default: Csr,
    alternates: HashMap<String, AlternateCost>,
    pub(crate) attributes: HashMap<String, HashMap<usize, String>>,
    state: GraphState,
}

impl Graph {
    /// Create an empty, mutable graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            index: HashMap::new(),
            pending: Vec::new(),
            default: Csr::empty(0),
            alternates: HashMap::new(),
            attributes: HashMap::new(),
            state: GraphState::Mutable,
        }
    }

    /// Build a compressed graph from adjacency lists.
    ///
    /// `edges[i]` lists the children of `nodes[i]` (as indices into `nodes`)
    /// and `scores[i]` their default scores. Nodes that round to the same
    /// position are merged.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidArgument`] if the arrays have mismatched
    ///   lengths, or a position or score is not finite
    /// - [`GraphError::OutOfRange`] if a child index is not in `nodes`
    pub fn from_adjacency(
        nodes: &[Point3<f64>],
        edges: &[Vec<usize>],
        scores: &[Vec<f64>],
    ) -> GraphResult<Self> {
        if edges.len() != nodes.len() || scores.len() != nodes.len() {
            return Err(GraphError::invalid_argument(format!(
                "{} nodes but {} edge lists and {} score lists",
                nodes.len(),
                edges.len(),
                scores.len()
            )));
        }

        let mut graph = Self::new();
        let ids = nodes
            .iter()
            .map(|p| graph.intern(*p))
            .collect::<GraphResult<Vec<_>>>()?;

        let mut sets = Vec::with_capacity(nodes.len());
        for (i, (children, child_scores)) in edges.iter().zip(scores).enumerate() {
            if children.len() != child_scores.len() {
                return Err(GraphError::invalid_argument(format!(
                    "node {i} has {} children but {} scores",
                    children.len(),
                    child_scores.len()
                )));
            }
            let mut set = EdgeSet::new(ids[i], Vec::with_capacity(children.len()));
            for (&child, &score) in children.iter().zip(child_scores) {
                let Some(&child_id) = ids.get(child) else {
                    return Err(GraphError::OutOfRange {
                        id: child,
                        len: nodes.len(),
                    });
                };
                set.children.push(IntEdge::new(child_id, score));
            }
            sets.push(set);
        }

        graph.add_edges(&sets, DEFAULT_COST)?;
        graph.compress();
        Ok(graph)
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> GraphState {
        self.state
    }

    /// Returns `true` if the CSR views reflect every write.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.state == GraphState::Compressed
    }

    /// Insert a position or look up the node it rounds to.
    ///
    /// Adding a new node to a compressed graph returns it to the mutable
    /// state, since the CSR no longer covers every node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidArgument`] if a coordinate is not finite.
    pub fn intern(&mut self, position: Point3<f64>) -> GraphResult<usize> {
        let key = NodeKey::from_position(&position).ok_or_else(|| {
            GraphError::invalid_argument(format!("node position {position:?} is not finite"))
        })?;

        if let Some(&id) = self.index.get(&key) {
            return Ok(id);
        }

        let id = self.positions.len();
        self.positions.push(position);
        self.index.insert(key, id);
        self.state = GraphState::Mutable;
        Ok(id)
    }

    /// Id of the node at `position`, if one exists.
    #[must_use]
    pub fn id_from_position(&self, position: &Point3<f64>) -> Option<usize> {
        NodeKey::from_position(position).and_then(|key| self.index.get(&key).copied())
    }

    /// The node with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] for an unknown id.
    pub fn node_from_id(&self, id: usize) -> GraphResult<Node> {
        self.check_id(id)?;
        Ok(Node::new(self.positions[id], id))
    }

    /// Every node in id order.
    #[must_use]
    pub fn nodes(&self) -> Vec<Node> {
        self.positions
            .iter()
            .enumerate()
            .map(|(id, p)| Node::new(*p, id))
            .collect()
    }

    /// Node positions in id order.
    #[must_use]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub(crate) fn check_id(&self, id: usize) -> GraphResult<()> {
        if id < self.positions.len() {
            Ok(())
        } else {
            Err(GraphError::OutOfRange {
                id,
                len: self.positions.len(),
            })
        }
    }

    // =========================================================================
    // Edge writes
    // =========================================================================

    /// Add or update one edge.
    ///
    /// Under the default cost this creates the pair or overwrites its score.
    /// Under any other cost the pair must already exist in the default cost;
    /// the graph is compressed first if needed.
    ///
    /// # Errors
    ///
    /// - [`GraphError::OutOfRange`] if either id is unknown
    /// - [`GraphError::InvalidArgument`] if `score` is not finite
    /// - [`GraphError::EdgeNotInDefault`] for an alternate cost on a missing pair
    pub fn add_edge(&mut self, parent: usize, child: usize, score: f64, cost: &str) -> GraphResult<()> {
        self.write(&[(parent, child, score)], cost)
    }

    /// Add an edge between two positions, interning them under the default cost.
    ///
    /// Under an alternate cost both positions must already be nodes.
    ///
    /// # Errors
    ///
    /// As [`add_edge`](Self::add_edge), plus [`GraphError::InvalidArgument`]
    /// for non-finite positions.
    pub fn add_edge_between(
        &mut self,
        parent: Point3<f64>,
        child: Point3<f64>,
        score: f64,
        cost: &str,
    ) -> GraphResult<()> {
        validate_score(score)?;
        if cost == DEFAULT_COST {
            for p in [&parent, &child] {
                if NodeKey::from_position(p).is_none() {
                    return Err(GraphError::invalid_argument(format!(
                        "node position {p:?} is not finite"
                    )));
                }
            }
            let p = self.intern(parent)?;
            let c = self.intern(child)?;
            return self.add_edge(p, c, score, cost);
        }

        match (self.id_from_position(&parent), self.id_from_position(&child)) {
            (Some(p), Some(c)) => self.add_edge(p, c, score, cost),
            _ => Err(GraphError::invalid_argument(format!(
                "no node at {parent:?} or {child:?} for cost {cost:?}"
            ))),
        }
    }

    /// Add many edges under one cost. Either every edge is written or none is.
    ///
    /// # Errors
    ///
    /// As [`add_edge`](Self::add_edge), for the first offending edge.
    pub fn add_edges(&mut self, sets: &[EdgeSet], cost: &str) -> GraphResult<()> {
        let triples: Vec<_> = sets.iter().flat_map(EdgeSet::triplets).collect();
        self.write(&triples, cost)
    }

    fn write(&mut self, triples: &[(usize, usize, f64)], cost: &str) -> GraphResult<()> {
        for &(parent, child, score) in triples {
            self.check_id(parent)?;
            self.check_id(child)?;
            validate_score(score)?;
        }

        if cost == DEFAULT_COST {
            if !triples.is_empty() {
                self.pending.extend_from_slice(triples);
                self.state = GraphState::Mutable;
            }
            return Ok(());
        }

        self.compress();
        let view = self.default.view();
        let slots = triples
            .iter()
            .map(|&(parent, child, _)| {
                view.find(parent, child).ok_or_else(|| GraphError::EdgeNotInDefault {
                    parent,
                    child,
                    cost: cost.to_owned(),
                })
            })
            .collect::<GraphResult<Vec<_>>>()?;

        let default_values = &self.default.values;
        let alternate = self
            .alternates
            .entry(cost.to_owned())
            .or_insert_with(|| AlternateCost {
                overrides: HashMap::new(),
                values: default_values.clone(),
            });
        for (&slot, &(parent, child, score)) in slots.iter().zip(triples) {
            alternate.overrides.insert((parent, child), score);
            alternate.values[slot] = score;
        }
        Ok(())
    }

    /// Merge buffered writes into the CSR views. Idempotent.
    ///
    /// The default CSR gets one row per node. Alternate costs are realigned
    /// with it, taking the default score where they have no override.
    pub fn compress(&mut self) {
        if self.state == GraphState::Compressed {
            return;
        }

        let rows = self.positions.len();
        self.default = self.default.merged(rows, &self.pending);
        self.pending.clear();
        for alternate in self.alternates.values_mut() {
            alternate.materialize(&self.default);
        }
        self.state = GraphState::Compressed;

        debug!(
            nodes = rows,
            edges = self.default.values.len(),
            costs = self.alternates.len() + 1,
            "Compressed graph"
        );
    }

    // =========================================================================
    // Reads (require compression)
    // =========================================================================

    /// CSR view of a cost type.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NotCompressed`] if writes are pending
    /// - [`GraphError::UnknownCost`] if `cost` was never written
    pub fn csr_view(&self, cost: &str) -> GraphResult<CsrView<'_>> {
        if self.state != GraphState::Compressed {
            return Err(GraphError::NotCompressed);
        }
        if cost == DEFAULT_COST {
            return Ok(self.default.view());
        }
        let alternate = self
            .alternates
            .get(cost)
            .ok_or_else(|| GraphError::unknown_cost(cost))?;
        Ok(CsrView::new(
            &self.default.row_ptr,
            &self.default.col_idx,
            &alternate.values,
        ))
    }

    /// Number of edges stored under a cost type.
    ///
    /// # Errors
    ///
    /// As [`csr_view`](Self::csr_view).
    pub fn edge_count(&self, cost: &str) -> GraphResult<usize> {
        Ok(self.csr_view(cost)?.nnz())
    }

    /// Returns `true` if `parent -> child` exists (or either direction,
    /// when `undirected`).
    ///
    /// # Errors
    ///
    /// As [`csr_view`](Self::csr_view), plus [`GraphError::OutOfRange`].
    pub fn has_edge(&self, parent: usize, child: usize, cost: &str, undirected: bool) -> GraphResult<bool> {
        let view = self.csr_view(cost)?;
        self.check_id(parent)?;
        self.check_id(child)?;
        Ok(view.find(parent, child).is_some() || (undirected && view.find(child, parent).is_some()))
    }

    /// Outgoing edges of a node in child-id order.
    ///
    /// # Errors
    ///
    /// As [`has_edge`](Self::has_edge).
    pub fn outgoing_edges(&self, id: usize, cost: &str) -> GraphResult<Vec<IntEdge>> {
        let view = self.csr_view(cost)?;
        self.check_id(id)?;
        Ok(view.row(id).map(|(c, s)| IntEdge::new(c, s)).collect())
    }

    /// Edges touching a node in either direction, keyed by the other endpoint.
    ///
    /// When both directions exist the outgoing score is reported.
    ///
    /// # Errors
    ///
    /// As [`has_edge`](Self::has_edge).
    pub fn undirected_edges(&self, id: usize, cost: &str) -> GraphResult<Vec<IntEdge>> {
        let view = self.csr_view(cost)?;
        self.check_id(id)?;

        let mut edges: Vec<IntEdge> = view.row(id).map(|(c, s)| IntEdge::new(c, s)).collect();
        for parent in 0..view.rows() {
            if view.find(id, parent).is_some() {
                continue;
            }
            if let Some(score) = view.get(parent, id) {
                edges.push(IntEdge::new(parent, score));
            }
        }
        edges.sort_by_key(|e| e.child);
        Ok(edges)
    }

    /// Outgoing edges of every node that has any, in parent-id order.
    ///
    /// # Errors
    ///
    /// As [`csr_view`](Self::csr_view).
    pub fn edges(&self, cost: &str) -> GraphResult<Vec<EdgeSet>> {
        let view = self.csr_view(cost)?;
        Ok((0..view.rows())
            .filter(|&r| !view.row_range(r).is_empty())
            .map(|r| EdgeSet::new(r, view.row(r).map(|(c, s)| IntEdge::new(c, s)).collect()))
            .collect())
    }

    /// Every cost name present, default first, others sorted.
    #[must_use]
    pub fn cost_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.alternates.keys().cloned().collect();
        names.sort();
        names.insert(0, DEFAULT_COST.to_owned());
        names
    }

    // =========================================================================
    // Clearing
    // =========================================================================

    /// Remove every node, edge, cost and attribute.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Remove one cost type.
    ///
    /// Clearing the default cost removes every edge (and with it every
    /// alternate cost) but keeps the nodes, and leaves the graph mutable.
    /// Clearing an alternate cost does not touch topology.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownCost`] for an alternate name that was
    /// never written.
    pub fn clear_cost(&mut self, cost: &str) -> GraphResult<()> {
        if cost == DEFAULT_COST {
            self.pending.clear();
            self.default = Csr::empty(self.positions.len());
            self.alternates.clear();
            self.state = GraphState::Mutable;
            return Ok(());
        }
        self.alternates
            .remove(cost)
            .map(|_| ())
            .ok_or_else(|| GraphError::unknown_cost(cost))
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_score(score: f64) -> GraphResult<()> {
    if score.is_finite() {
        Ok(())
    } else {
        Err(GraphError::invalid_argument(format!(
            "edge score must be finite, got {score}"
        )))
    }
}
