//! Per-node string attributes stored alongside the graph.

use hashbrown::HashMap;

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;

impl Graph {
    /// Set attribute `name` on the given nodes.
    ///
    /// `ids` and `values` are parallel arrays. Existing values for the same
    /// node are replaced. Nothing is written if any id is invalid.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidArgument`] if the name is empty or the arrays
    ///   differ in length
    /// - [`GraphError::OutOfRange`] if an id is not a node
    ///
    /// # Example
    ///
    /// ```
    /// use walk_graph::{Graph, Point3};
    ///
    /// let mut graph = Graph::new();
    /// graph.intern(Point3::new(0.0, 0.0, 0.0)).unwrap();
    /// graph.intern(Point3::new(1.0, 0.0, 0.0)).unwrap();
    ///
    /// graph.add_node_attributes(&[1], "zone", &["lobby"]).unwrap();
    /// assert_eq!(graph.node_attributes("zone"), vec!["", "lobby"]);
    /// ```
    pub fn add_node_attributes<S: AsRef<str>>(
        &mut self,
        ids: &[usize],
        name: &str,
        values: &[S],
    ) -> GraphResult<()> {
        if name.is_empty() {
            return Err(GraphError::invalid_argument("attribute name must not be empty"));
        }
        if ids.len() != values.len() {
            return Err(GraphError::invalid_argument(format!(
                "{} ids but {} attribute values",
                ids.len(),
                values.len()
            )));
        }
        for &id in ids {
            self.check_id(id)?;
        }

        let column = self.attributes.entry(name.to_owned()).or_insert_with(HashMap::new);
        for (&id, value) in ids.iter().zip(values) {
            column.insert(id, value.as_ref().to_owned());
        }
        Ok(())
    }

    /// Value of attribute `name` for every node in id order.
    ///
    /// Nodes without a value get the empty string. An attribute that was
    /// never written yields an empty vector.
    #[must_use]
    pub fn node_attributes(&self, name: &str) -> Vec<String> {
        let Some(column) = self.attributes.get(name) else {
            return Vec::new();
        };
        (0..self.len())
            .map(|id| column.get(&id).cloned().unwrap_or_default())
            .collect()
    }

    /// Value of attribute `name` for one node, if set.
    #[must_use]
    pub fn node_attribute(&self, id: usize, name: &str) -> Option<&str> {
        self.attributes.get(name)?.get(&id).map(String::as_str)
    }

    /// Remove attribute `name` from every node. Returns `true` if it existed.
    pub fn clear_node_attribute(&mut self, name: &str) -> bool {
        self.attributes.remove(name).is_some()
    }

    /// Names of every attribute, sorted.
    #[must_use]
    pub fn attribute_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.attributes.keys().cloned().collect();
        names.sort();
        names
    }
}
