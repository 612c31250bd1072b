//! Greedy (Welsh-Powell) vertex coloring.

use graph_store::GraphStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Color index per node id. Adjacent nodes never share a color; self-loops are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coloring {
    pub colors: BTreeMap<String, usize>,
    pub color_count: usize,
}

/// Colors nodes in descending degree order (ascending id on ties), each taking the
/// smallest color not used by an already colored neighbor. An empty graph yields no colors.
pub fn greedy_coloring(store: &GraphStore) -> Coloring {
    let mut order: Vec<(usize, String)> = store
        .nodes()
        .into_iter()
        .map(|n| (store.degree(&n.id).unwrap_or(0), n.id))
        .collect();
    order.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    let mut colors: BTreeMap<String, usize> = BTreeMap::new();
    for (_, id) in order {
        let taken: BTreeSet<usize> = store
            .neighbors(&id)
            .unwrap_or_default()
            .iter()
            .filter(|n| **n != id)
            .filter_map(|n| colors.get(n).copied())
            .collect();
        let color = (0..).find(|c| !taken.contains(c)).unwrap_or(0);
        colors.insert(id, color);
    }
    let color_count = colors.values().collect::<BTreeSet<_>>().len();
    tracing::debug!(nodes = colors.len(), color_count, "graph colored");
    Coloring {
        colors,
        color_count,
    }
}
