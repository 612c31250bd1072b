//! Graph store, weight model, and graph merge.

mod merge;
mod store;
mod weight;

pub use graph_types::{
    Edge, EdgeKey, EdgePayload, GraphPayload, GraphStoreError, Neighbor, Node, NodeAttributes,
    NodePayload,
};
pub use merge::{collapse_duplicate_edges, merge};
pub use store::GraphStore;
pub use weight::{MetricVector, WeightModel};
