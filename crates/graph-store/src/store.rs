//! In-memory undirected graph store with derived edge weights.

use crate::weight::{MetricVector, WeightModel};
use graph_types::{
    Edge, EdgeKey, EdgePayload, GraphPayload, GraphStoreError, Neighbor, Node, NodeAttributes,
    NodePayload,
};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

type AdjacencyIndex = HashMap<String, BTreeSet<String>>;

/// Sole owner of nodes, edges, and adjacency.
///
/// Every successful mutation recomputes all edge weights and bumps `revision`, so readers
/// never observe stale weights and can detect that a graph they looked at has changed.
/// Accessors hand out owned copies.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// node_id -> node.
    nodes: HashMap<String, Node>,
    /// Node ids in insertion order (snapshots and listings).
    node_order: Vec<String>,
    /// canonical key -> edge.
    edges: HashMap<EdgeKey, Edge>,
    /// Edge keys in insertion order.
    edge_order: Vec<EdgeKey>,
    /// node_id -> neighbor ids.
    adjacency: AdjacencyIndex,
    revision: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a loader payload. Fails on the first invalid node or edge.
    pub fn from_payload(payload: &GraphPayload) -> Result<Self, GraphStoreError> {
        let mut store = Self::new();
        for node in &payload.nodes {
            store.insert_node(&node.id, node.label.as_deref(), node.attributes())?;
        }
        for edge in &payload.edges {
            store.insert_edge(&edge.from, &edge.to, edge.relation_type.as_deref())?;
        }
        store.recalculate_weights();
        Ok(store)
    }

    /// Replace the whole graph with `payload`. On error the current graph is left untouched.
    pub fn load(&mut self, payload: &GraphPayload) -> Result<(), GraphStoreError> {
        let mut fresh = Self::from_payload(payload)?;
        fresh.revision = self.revision + 1;
        *self = fresh;
        tracing::debug!(
            nodes = self.node_count(),
            edges = self.edge_count(),
            "graph loaded"
        );
        Ok(())
    }

    pub fn add_node(
        &mut self,
        id: &str,
        label: Option<&str>,
        attributes: Option<NodeAttributes>,
    ) -> Result<(), GraphStoreError> {
        let key = self.insert_node(id, label, attributes.unwrap_or_default())?;
        self.commit();
        tracing::debug!(node_id = %key, "node added");
        Ok(())
    }

    /// Merge `partial` into the node's attributes field by field.
    pub fn update_node_attributes(
        &mut self,
        id: &str,
        partial: &NodeAttributes,
    ) -> Result<(), GraphStoreError> {
        let id = id.trim();
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphStoreError::NodeNotFound(id.to_string()))?;
        if let Some(field) = partial.non_finite_field() {
            return Err(GraphStoreError::NonFiniteAttribute {
                node: id.to_string(),
                field,
            });
        }
        node.attributes.apply(partial);
        self.commit();
        tracing::debug!(node_id = %id, "node attributes updated");
        Ok(())
    }

    pub fn add_edge(
        &mut self,
        from: &str,
        to: &str,
        relation_type: Option<&str>,
    ) -> Result<(), GraphStoreError> {
        let key = self.insert_edge(from, to, relation_type)?;
        self.commit();
        tracing::debug!(edge = %key, "edge added");
        Ok(())
    }

    /// Remove a node and every incident edge.
    pub fn remove_node(&mut self, id: &str) -> Result<(), GraphStoreError> {
        let id = id.trim();
        if self.nodes.remove(id).is_none() {
            return Err(GraphStoreError::NodeNotFound(id.to_string()));
        }
        self.node_order.retain(|n| n != id);
        let neighbors = self.adjacency.remove(id).unwrap_or_default();
        for neighbor in &neighbors {
            if let Some(set) = self.adjacency.get_mut(neighbor) {
                set.remove(id);
            }
            self.edges.remove(&EdgeKey::new(id, neighbor));
        }
        self.edge_order.retain(|k| !k.touches(id));
        self.commit();
        tracing::debug!(node_id = %id, removed_edges = neighbors.len(), "node removed");
        Ok(())
    }

    pub fn remove_edge(&mut self, from: &str, to: &str) -> Result<(), GraphStoreError> {
        let key = EdgeKey::new(from.trim(), to.trim());
        if self.edges.remove(&key).is_none() {
            return Err(GraphStoreError::EdgeNotFound(key));
        }
        self.edge_order.retain(|k| k != &key);
        if let Some(set) = self.adjacency.get_mut(key.low()) {
            set.remove(key.high());
        }
        if let Some(set) = self.adjacency.get_mut(key.high()) {
            set.remove(key.low());
        }
        self.commit();
        tracing::debug!(edge = %key, "edge removed");
        Ok(())
    }

    /// Clear nodes, edges, and adjacency.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.node_order.clear();
        self.edges.clear();
        self.edge_order.clear();
        self.adjacency.clear();
        self.revision += 1;
        tracing::debug!("graph reset");
    }

    /// Recompute every edge weight from current endpoint metrics.
    pub fn recalculate_weights(&mut self) {
        let nodes = &self.nodes;
        let adjacency = &self.adjacency;
        for edge in self.edges.values_mut() {
            let a = metrics_of(nodes, adjacency, &edge.from);
            let b = metrics_of(nodes, adjacency, &edge.to);
            edge.weight = WeightModel::calculate(&a, &b);
        }
        tracing::trace!(edges = self.edges.len(), "weights recalculated");
    }

    /// Neighbors ordered by descending weight, ascending id on ties.
    pub fn neighbors_sorted(&self, id: &str) -> Result<Vec<Neighbor>, GraphStoreError> {
        let id = id.trim();
        let set = self
            .adjacency
            .get(id)
            .ok_or_else(|| GraphStoreError::NodeNotFound(id.to_string()))?;
        let mut out: Vec<Neighbor> = set
            .iter()
            .map(|n| Neighbor {
                id: n.clone(),
                weight: self.edge_weight(id, n).unwrap_or(0.0),
            })
            .collect();
        out.sort_by(|a, b| match b.weight.total_cmp(&a.weight) {
            Ordering::Equal => a.id.cmp(&b.id),
            other => other,
        });
        Ok(out)
    }

    /// Neighbor ids in ascending order.
    pub fn neighbors(&self, id: &str) -> Result<Vec<String>, GraphStoreError> {
        let id = id.trim();
        self.adjacency
            .get(id)
            .map(|set| set.iter().cloned().collect())
            .ok_or_else(|| GraphStoreError::NodeNotFound(id.to_string()))
    }

    /// Metric vector of a node as the weight model sees it right now.
    pub fn metrics(&self, id: &str) -> Option<MetricVector> {
        let id = id.trim();
        self.nodes
            .contains_key(id)
            .then(|| metrics_of(&self.nodes, &self.adjacency, id))
    }

    pub fn node(&self, id: &str) -> Option<Node> {
        self.nodes.get(id.trim()).cloned()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> Vec<Node> {
        self.node_order
            .iter()
            .filter_map(|id| self.nodes.get(id).cloned())
            .collect()
    }

    pub fn edge(&self, a: &str, b: &str) -> Option<Edge> {
        self.edges.get(&EdgeKey::new(a.trim(), b.trim())).cloned()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> Vec<Edge> {
        self.edge_order
            .iter()
            .filter_map(|k| self.edges.get(k).cloned())
            .collect()
    }

    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        self.edges.get(&EdgeKey::new(a.trim(), b.trim())).map(|e| e.weight)
    }

    pub fn degree(&self, id: &str) -> Option<usize> {
        self.adjacency.get(id.trim()).map(BTreeSet::len)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id.trim())
    }

    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        self.edges.contains_key(&EdgeKey::new(a.trim(), b.trim()))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mutation counter; changes on every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Snapshot for renderers and persistence; `relation_degree` carries the current weight.
    pub fn snapshot(&self) -> GraphPayload {
        GraphPayload {
            nodes: self.nodes().iter().map(NodePayload::from).collect(),
            edges: self.edges().iter().map(EdgePayload::from).collect(),
        }
    }

    fn insert_node(
        &mut self,
        id: &str,
        label: Option<&str>,
        attributes: NodeAttributes,
    ) -> Result<String, GraphStoreError> {
        let key = id.trim();
        if key.is_empty() {
            return Err(GraphStoreError::EmptyId);
        }
        if let Some(field) = attributes.non_finite_field() {
            return Err(GraphStoreError::NonFiniteAttribute {
                node: key.to_string(),
                field,
            });
        }
        if self.nodes.contains_key(key) {
            return Err(GraphStoreError::DuplicateNode(key.to_string()));
        }
        let label = label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(key)
            .to_string();
        self.nodes.insert(
            key.to_string(),
            Node {
                id: key.to_string(),
                label,
                attributes,
            },
        );
        self.node_order.push(key.to_string());
        self.adjacency.insert(key.to_string(), BTreeSet::new());
        Ok(key.to_string())
    }

    fn insert_edge(
        &mut self,
        from: &str,
        to: &str,
        relation_type: Option<&str>,
    ) -> Result<EdgeKey, GraphStoreError> {
        let (a, b) = (from.trim(), to.trim());
        for endpoint in [a, b] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphStoreError::MissingEndpoint(endpoint.to_string()));
            }
        }
        let key = EdgeKey::new(a, b);
        if self.edges.contains_key(&key) {
            return Err(GraphStoreError::DuplicateEdge(key));
        }
        self.adjacency
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
        let weight = WeightModel::calculate(
            &metrics_of(&self.nodes, &self.adjacency, a),
            &metrics_of(&self.nodes, &self.adjacency, b),
        );
        self.edges.insert(
            key.clone(),
            Edge {
                from: a.to_string(),
                to: b.to_string(),
                relation_type: relation_type.unwrap_or("").trim().to_string(),
                weight,
            },
        );
        self.edge_order.push(key.clone());
        Ok(key)
    }

    fn commit(&mut self) {
        self.recalculate_weights();
        self.revision += 1;
    }
}

fn metrics_of(nodes: &HashMap<String, Node>, adjacency: &AdjacencyIndex, id: &str) -> MetricVector {
    let degree = adjacency.get(id).map(BTreeSet::len).unwrap_or(0);
    match nodes.get(id) {
        Some(node) => MetricVector::from_attributes(&node.attributes, degree),
        None => MetricVector::new(0.0, 0.0, degree as f64),
    }
}
