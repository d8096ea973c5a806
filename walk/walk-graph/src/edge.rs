//! Edge records returned by graph queries and accepted by bulk writes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An outgoing edge identified by its child id.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntEdge {
    /// Id of the child node.
    pub child: usize,
    /// Edge score.
    pub score: f64,
}

impl IntEdge {
    /// Create an edge record.
    #[must_use]
    pub const fn new(child: usize, score: f64) -> Self {
        Self { child, score }
    }
}

/// All outgoing edges of one parent.
///
/// # Example
///
/// ```
/// use walk_graph::{EdgeSet, IntEdge};
///
/// let set = EdgeSet::new(0, vec![IntEdge::new(1, 2.0), IntEdge::new(3, 1.5)]);
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeSet {
    /// Id of the parent node.
    pub parent: usize,
    /// Outgoing edges in child-id order.
    pub children: Vec<IntEdge>,
}

impl EdgeSet {
    /// Create an edge set.
    #[must_use]
    pub const fn new(parent: usize, children: Vec<IntEdge>) -> Self {
        Self { parent, children }
    }

    /// Number of edges in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the set has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate `(parent, child, score)` triples.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.children.iter().map(|e| (self.parent, e.child, e.score))
    }
}
