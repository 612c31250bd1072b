//! Merge of two independently loaded graph payloads.

use graph_types::{EdgeKey, EdgePayload, GraphPayload, NodePayload};
use std::collections::{HashMap, HashSet};

/// Combine `base` and `incoming` into one payload.
///
/// Nodes are keyed by trimmed id. For an id present in both, `base` wins: its label is kept
/// unless blank, and each attribute field is taken from `base` when set, else from `incoming`.
/// Edges are unioned by canonical key, scanning `base` before `incoming`; the first
/// occurrence wins and later duplicates are dropped without error.
///
/// The result is not commutative when the inputs disagree on a node's label or
/// attributes, while the resulting node and edge id sets are the same either way.
/// `relation_degree` is cleared on every edge because weights are derived on load.
pub fn merge(base: &GraphPayload, incoming: &GraphPayload) -> GraphPayload {
    let mut order: Vec<String> = Vec::new();
    let mut merged: HashMap<String, NodePayload> = HashMap::new();

    for node in base.nodes.iter().chain(incoming.nodes.iter()) {
        let id = node.id.trim();
        if id.is_empty() {
            tracing::warn!("skipping node with empty id during merge");
            continue;
        }
        match merged.get_mut(id) {
            Some(existing) => {
                if existing.label.as_deref().map_or(true, |l| l.trim().is_empty()) {
                    existing.label = node.label.clone();
                }
                let attributes = existing.attributes().or(&node.attributes());
                *existing = existing.clone().with_attributes(attributes);
            }
            None => {
                let mut fresh = node.clone();
                fresh.id = id.to_string();
                merged.insert(id.to_string(), fresh);
                order.push(id.to_string());
            }
        }
    }

    let edges = unique_edges(base.edges.iter().chain(incoming.edges.iter()));

    let nodes = order
        .into_iter()
        .filter_map(|id| merged.remove(&id))
        .collect();
    tracing::debug!(
        base_nodes = base.nodes.len(),
        incoming_nodes = incoming.nodes.len(),
        merged_edges = edges.len(),
        "graphs merged"
    );
    GraphPayload { nodes, edges }
}

/// Copy of `payload` with edges reduced to one per canonical key, first occurrence winning.
/// Lets a loader accept edge lists that name an undirected edge from both ends.
pub fn collapse_duplicate_edges(payload: &GraphPayload) -> GraphPayload {
    let edges = unique_edges(payload.edges.iter());
    if edges.len() < payload.edges.len() {
        tracing::debug!(
            dropped = payload.edges.len() - edges.len(),
            "duplicate edges collapsed"
        );
    }
    GraphPayload {
        nodes: payload.nodes.clone(),
        edges,
    }
}

fn unique_edges<'a>(edges: impl Iterator<Item = &'a EdgePayload>) -> Vec<EdgePayload> {
    let mut seen: HashSet<EdgeKey> = HashSet::new();
    let mut out: Vec<EdgePayload> = Vec::new();
    for edge in edges {
        if !seen.insert(edge.key()) {
            continue;
        }
        out.push(EdgePayload {
            from: edge.from.trim().to_string(),
            to: edge.to.trim().to_string(),
            relation_type: edge.relation_type.clone(),
            relation_degree: None,
        });
    }
    out
}
