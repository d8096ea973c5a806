//! Per-node summaries of incident edge scores.

use crate::error::GraphResult;
use crate::graph::Graph;

/// How [`Graph::aggregate`] summarizes a node's edge scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AggregationType {
    /// Sum of scores.
    Sum,
    /// Mean score (zero for nodes without edges).
    Average,
    /// Number of edges.
    Count,
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    mean: f64,
    count: usize,
}

impl Accumulator {
    #[allow(clippy::cast_precision_loss)]
    fn push(&mut self, score: f64) {
        self.count += 1;
        self.sum += score;
        // Running mean keeps error bounded for high-degree nodes
        self.mean += (score - self.mean) / self.count as f64;
    }

    #[allow(clippy::cast_precision_loss)]
    fn result(&self, mode: AggregationType) -> f64 {
        match mode {
            AggregationType::Sum => self.sum,
            AggregationType::Average => self.mean,
            AggregationType::Count => self.count as f64,
        }
    }
}

impl Graph {
    /// Summarize each node's edge scores under a cost type.
    ///
    /// With `directed` only outgoing edges count; otherwise an edge counts
    /// for both of its endpoints (once, for a self-loop).
    ///
    /// # Errors
    ///
    /// As [`Graph::csr_view`].
    ///
    /// # Example
    ///
    /// ```
    /// use walk_graph::{AggregationType, Graph, Point3};
    ///
    /// let mut graph = Graph::new();
    /// for x in 0..3 {
    ///     graph.intern(Point3::new(f64::from(x), 0.0, 0.0)).unwrap();
    /// }
    /// graph.add_edge(0, 1, 30.0, "").unwrap();
    /// graph.add_edge(1, 0, 15.0, "").unwrap();
    /// graph.add_edge(0, 2, 45.0, "").unwrap();
    /// graph.compress();
    ///
    /// let out = graph.aggregate("", AggregationType::Sum, true).unwrap();
    /// assert_eq!(out, vec![75.0, 15.0, 0.0]);
    /// let both = graph.aggregate("", AggregationType::Sum, false).unwrap();
    /// assert_eq!(both, vec![90.0, 45.0, 45.0]);
    /// ```
    pub fn aggregate(&self, cost: &str, mode: AggregationType, directed: bool) -> GraphResult<Vec<f64>> {
        let view = self.csr_view(cost)?;
        let mut acc = vec![Accumulator::default(); view.rows()];

        for (parent, child, score) in view.triplets() {
            acc[parent].push(score);
            if !directed && child != parent {
                acc[child].push(score);
            }
        }

        Ok(acc.iter().map(|a| a.result(mode)).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{GraphError, Point3};
    use approx::assert_relative_eq;

    fn triangle_graph() -> Graph {
        let mut graph = Graph::new();
        for x in 0..3 {
            graph.intern(Point3::new(f64::from(x), 0.0, 0.0)).unwrap();
        }
        graph.add_edge(0, 1, 30.0, "").unwrap();
        graph.add_edge(1, 0, 15.0, "").unwrap();
        graph.add_edge(0, 2, 45.0, "").unwrap();
        graph.compress();
        graph
    }

    #[test]
    fn count_and_average() {
        let graph = triangle_graph();
        assert_eq!(
            graph.aggregate("", AggregationType::Count, true).unwrap(),
            vec![2.0, 1.0, 0.0]
        );
        assert_eq!(
            graph.aggregate("", AggregationType::Count, false).unwrap(),
            vec![3.0, 2.0, 1.0]
        );
        let avg = graph.aggregate("", AggregationType::Average, false).unwrap();
        assert_relative_eq!(avg[0], 30.0);
        assert_relative_eq!(avg[1], 22.5);
        assert_relative_eq!(avg[2], 45.0);
    }

    #[test]
    fn alternate_cost_aggregates() {
        let mut graph = triangle_graph();
        graph.add_edge(0, 2, 5.0, "Comfort").unwrap();
        let sums = graph.aggregate("Comfort", AggregationType::Sum, true).unwrap();
        assert_eq!(sums, vec![35.0, 15.0, 0.0]);
    }

    #[test]
    fn requires_compression_and_known_cost() {
        let mut graph = triangle_graph();
        assert!(graph.aggregate("Nope", AggregationType::Sum, true).unwrap_err().is_unknown_cost());
        graph.add_edge(2, 1, 1.0, "").unwrap();
        assert!(matches!(
            graph.aggregate("", AggregationType::Sum, true),
            Err(GraphError::NotCompressed)
        ));
    }
}
