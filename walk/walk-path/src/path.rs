//! Paths through a graph.

/// One node on a [`Path`] and the cost of the edge leaving it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathMember {
    /// Node id.
    pub node: usize,
    /// Score of the edge to the next member, `0.0` on the last member.
    pub cost: f64,
}

impl PathMember {
    /// Creates a path member.
    #[must_use]
    pub const fn new(node: usize, cost: f64) -> Self {
        Self { node, cost }
    }
}

/// An ordered walk from a source node to a destination node.
///
/// # Example
///
/// ```
/// use walk_path::{Path, PathMember};
///
/// let path = Path::new(vec![
///     PathMember::new(0, 2.0),
///     PathMember::new(2, 1.0),
///     PathMember::new(4, 0.0),
/// ]);
/// assert_eq!(path.nodes(), vec![0, 2, 4]);
/// assert!((path.total_cost() - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    members: Vec<PathMember>,
}

impl Path {
    /// Creates a path from its members.
    #[must_use]
    pub const fn new(members: Vec<PathMember>) -> Self {
        Self { members }
    }

    /// The members in walking order.
    #[must_use]
    pub fn members(&self) -> &[PathMember] {
        &self.members
    }

    /// Number of nodes on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the path has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Node ids in walking order.
    #[must_use]
    pub fn nodes(&self) -> Vec<usize> {
        self.members.iter().map(|m| m.node).collect()
    }

    /// First node, if any.
    #[must_use]
    pub fn head(&self) -> Option<usize> {
        self.members.first().map(|m| m.node)
    }

    /// Last node, if any.
    #[must_use]
    pub fn tail(&self) -> Option<usize> {
        self.members.last().map(|m| m.node)
    }

    /// Sum of member costs, accumulated from the head.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.members.iter().map(|m| m.cost).sum()
    }

    /// Consumes the path, returning its members.
    #[must_use]
    pub fn into_members(self) -> Vec<PathMember> {
        self.members
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn empty_path() {
        let path = Path::default();
        assert!(path.is_empty());
        assert_eq!(path.head(), None);
        assert_eq!(path.total_cost(), 0.0);
    }

    #[test]
    fn ends_and_cost() {
        let path = Path::new(vec![PathMember::new(5, 1.5), PathMember::new(7, 0.0)]);
        assert_eq!(path.len(), 2);
        assert_eq!(path.head(), Some(5));
        assert_eq!(path.tail(), Some(7));
        assert_eq!(path.total_cost(), 1.5);
        assert_eq!(path.into_members()[1], PathMember::new(7, 0.0));
    }
}
