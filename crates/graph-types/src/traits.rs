//! Collaborator traits (repository, renderer) and error taxonomy.

use crate::{EdgeKey, GraphPayload, GraphRecord, GraphRecordSummary};
use async_trait::async_trait;

/// Persistent store of named graph snapshots.
#[async_trait]
pub trait GraphRepository: Send + Sync {
    /// Save a graph under a display name; returns the stored record with its new id.
    async fn save(&self, name: &str, graph: &GraphPayload) -> Result<GraphRecord, RepositoryError>;

    /// List summaries of every saved graph, in save order.
    async fn list(&self) -> Result<Vec<GraphRecordSummary>, RepositoryError>;

    /// Get one record by id.
    async fn get(&self, id: &str) -> Result<GraphRecord, RepositoryError>;
}

/// Display surface driven by the core. Implementations only receive owned snapshots
/// and commands; they never hold references into the store.
pub trait GraphRenderer {
    /// Full resync of nodes and edges.
    fn sync(&mut self, graph: &GraphPayload);

    fn highlight_nodes(&mut self, ids: &[String], color: &str);

    fn highlight_edge(&mut self, key: &EdgeKey, color: &str);

    fn clear_edge(&mut self, key: &EdgeKey);

    fn clear_highlights(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphStoreError {
    #[error("node id must not be empty")]
    EmptyId,
    #[error("node already exists: {0}")]
    DuplicateNode(String),
    #[error("node not found: {0}")]
    NodeNotFound(String),
    #[error("node {node}: {field} must be a finite number")]
    NonFiniteAttribute { node: String, field: &'static str },
    #[error("edge endpoint not found: {0}")]
    MissingEndpoint(String),
    #[error("edge already exists: {0}")]
    DuplicateEdge(EdgeKey),
    #[error("edge not found: {0}")]
    EdgeNotFound(EdgeKey),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraversalError {
    #[error("graph has no nodes")]
    EmptyGraph,
    #[error("start node not found: {0}")]
    UnknownStartNode(String),
    #[error("end node not found: {0}")]
    UnknownEndNode(String),
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("graph not found: {0}")]
    NotFound(String),
    #[error("repository io: {0}")]
    Io(#[from] std::io::Error),
    #[error("repository serialization: {0}")]
    Serde(#[from] serde_json::Error),
}
