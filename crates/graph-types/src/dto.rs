//! Graph entities and the loader/persistence payload shapes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-node metrics used for weight derivation. Every field is independently optional;
/// an unset field is not the same as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_count: Option<u32>,
}

impl NodeAttributes {
    pub fn new(activity: Option<f64>, interaction: Option<f64>, connection_count: Option<u32>) -> Self {
        Self {
            activity,
            interaction,
            connection_count,
        }
    }

    /// Field-wise overwrite: fields set in `partial` replace ours, omitted fields are kept.
    pub fn apply(&mut self, partial: &NodeAttributes) {
        if partial.activity.is_some() {
            self.activity = partial.activity;
        }
        if partial.interaction.is_some() {
            self.interaction = partial.interaction;
        }
        if partial.connection_count.is_some() {
            self.connection_count = partial.connection_count;
        }
    }

    /// Name of the first set metric that is NaN or infinite. The weight model only accepts
    /// finite values.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        match (self.activity, self.interaction) {
            (Some(v), _) if !v.is_finite() => Some("activity"),
            (_, Some(v)) if !v.is_finite() => Some("interaction"),
            _ => None,
        }
    }

    /// Keep our value per field when set, otherwise take `fallback`'s.
    pub fn or(&self, fallback: &NodeAttributes) -> NodeAttributes {
        NodeAttributes {
            activity: self.activity.or(fallback.activity),
            interaction: self.interaction.or(fallback.interaction),
            connection_count: self.connection_count.or(fallback.connection_count),
        }
    }
}

/// A graph node. `id` is trimmed and unique; `label` falls back to the id when blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub attributes: NodeAttributes,
}

/// Canonical identity of an undirected edge: the endpoint ids in lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    low: String,
    high: String,
}

impl EdgeKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self {
                low: a.to_string(),
                high: b.to_string(),
            }
        } else {
            Self {
                low: b.to_string(),
                high: a.to_string(),
            }
        }
    }

    pub fn low(&self) -> &str {
        &self.low
    }

    pub fn high(&self) -> &str {
        &self.high
    }

    pub fn touches(&self, id: &str) -> bool {
        self.low == id || self.high == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint of this key.
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.low == id {
            Some(&self.high)
        } else if self.high == id {
            Some(&self.low)
        } else {
            None
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}--{}", self.low, self.high)
    }
}

/// An undirected edge. `from`/`to` keep the caller's insertion direction for display only;
/// `weight` is derived by the store and never set by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub relation_type: String,
    pub weight: f64,
}

impl Edge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(&self.from, &self.to)
    }
}

/// Neighbor of a node together with the weight of the connecting edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: String,
    pub weight: f64,
}

/// Node entry of a loader payload / persistence snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePayload {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub activity: Option<f64>,
    #[serde(default)]
    pub interaction: Option<f64>,
    #[serde(default)]
    pub connection_count: Option<u32>,
}

impl NodePayload {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_attributes(mut self, attributes: NodeAttributes) -> Self {
        self.activity = attributes.activity;
        self.interaction = attributes.interaction;
        self.connection_count = attributes.connection_count;
        self
    }

    pub fn attributes(&self) -> NodeAttributes {
        NodeAttributes::new(self.activity, self.interaction, self.connection_count)
    }
}

impl From<&Node> for NodePayload {
    fn from(node: &Node) -> Self {
        NodePayload::new(node.id.clone())
            .with_label(node.label.clone())
            .with_attributes(node.attributes)
    }
}

/// Edge entry of a loader payload / persistence snapshot. `relation_degree` carries the
/// derived weight on save and is ignored on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgePayload {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub relation_type: Option<String>,
    #[serde(default)]
    pub relation_degree: Option<f64>,
}

impl EdgePayload {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Self::default()
        }
    }

    pub fn with_relation(mut self, relation_type: impl Into<String>) -> Self {
        self.relation_type = Some(relation_type.into());
        self
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.from.trim(), self.to.trim())
    }
}

impl From<&Edge> for EdgePayload {
    fn from(edge: &Edge) -> Self {
        EdgePayload {
            from: edge.from.clone(),
            to: edge.to.clone(),
            relation_type: Some(edge.relation_type.clone()),
            relation_degree: Some(edge.weight),
        }
    }
}

/// Whole-graph node/edge list exchanged with loaders, renderers, and persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
    #[serde(default)]
    pub nodes: Vec<NodePayload>,
    #[serde(default)]
    pub edges: Vec<EdgePayload>,
}

/// Saved graph (repository record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphRecord {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub graph: GraphPayload,
}

/// Listing entry for a saved graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRecordSummary {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub node_count: usize,
    pub edge_count: usize,
}

impl From<&GraphRecord> for GraphRecordSummary {
    fn from(record: &GraphRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            created_at: record.created_at.clone(),
            node_count: record.graph.nodes.len(),
            edge_count: record.graph.edges.len(),
        }
    }
}

/// What the user currently has selected in a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Selection {
    Node { id: String },
    Edge { key: EdgeKey },
}
