//! Weighted shortest paths where heavier (more similar) edges are cheaper.

use graph_store::GraphStore;
use graph_types::TraversalError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathAlgorithm {
    Dijkstra,
    AStar,
}

impl PathAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathAlgorithm::Dijkstra => "dijkstra",
            PathAlgorithm::AStar => "astar",
        }
    }

    /// Remaining-cost estimate. Zero for both, so A* expands in Dijkstra order.
    fn heuristic(&self, _node: &str) -> f64 {
        0.0
    }
}

impl fmt::Display for PathAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathAlgorithm {
    type Err = TraversalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(PathAlgorithm::Dijkstra),
            "astar" | "a*" | "a-star" => Ok(PathAlgorithm::AStar),
            _ => Err(TraversalError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// Result of a shortest-path query. `path` is empty and `cost` is `None` when `end` is
/// unreachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortestPath {
    pub visited: Vec<String>,
    pub path: Vec<String>,
    pub cost: Option<f64>,
}

struct QueueEntry {
    priority: f64,
    node: String,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // Reversed: BinaryHeap is a max-heap, we pop the lowest priority, then lowest id.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Traversal cost of an edge: `1 - weight`, with the weight clamped to `[0, 1]`.
fn edge_cost(weight: f64) -> f64 {
    1.0 - weight.clamp(0.0, 1.0)
}

pub fn shortest_path(
    store: &GraphStore,
    algorithm: PathAlgorithm,
    start_id: &str,
    end_id: &str,
) -> Result<ShortestPath, TraversalError> {
    if store.is_empty() {
        return Err(TraversalError::EmptyGraph);
    }
    let (start, end) = (start_id.trim(), end_id.trim());
    if !store.contains_node(start) {
        return Err(TraversalError::UnknownStartNode(start.to_string()));
    }
    if !store.contains_node(end) {
        return Err(TraversalError::UnknownEndNode(end.to_string()));
    }

    let mut distances: HashMap<String, f64> = HashMap::new();
    let mut previous: HashMap<String, String> = HashMap::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut visit_order: Vec<String> = Vec::new();
    let mut heap = BinaryHeap::new();

    distances.insert(start.to_string(), 0.0);
    heap.push(QueueEntry {
        priority: algorithm.heuristic(start),
        node: start.to_string(),
    });

    while let Some(QueueEntry { node: current, .. }) = heap.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        visit_order.push(current.clone());
        if current == end {
            break;
        }
        let current_cost = distances.get(&current).copied().unwrap_or(f64::INFINITY);
        for neighbor in store.neighbors_sorted(&current).unwrap_or_default() {
            if visited.contains(&neighbor.id) {
                continue;
            }
            let next = current_cost + edge_cost(neighbor.weight);
            if next < distances.get(&neighbor.id).copied().unwrap_or(f64::INFINITY) {
                distances.insert(neighbor.id.clone(), next);
                previous.insert(neighbor.id.clone(), current.clone());
                heap.push(QueueEntry {
                    priority: next + algorithm.heuristic(&neighbor.id),
                    node: neighbor.id,
                });
            }
        }
    }

    let path = rebuild_path(&previous, start, end);
    let cost = if path.is_empty() {
        None
    } else {
        distances.get(end).copied()
    };
    tracing::debug!(
        algorithm = %algorithm,
        start = %start,
        end = %end,
        visited = visit_order.len(),
        hops = path.len().saturating_sub(1),
        "shortest path computed"
    );
    Ok(ShortestPath {
        visited: visit_order,
        path,
        cost,
    })
}

fn rebuild_path(previous: &HashMap<String, String>, start: &str, end: &str) -> Vec<String> {
    if start == end {
        return vec![start.to_string()];
    }
    if !previous.contains_key(end) {
        return Vec::new();
    }
    let mut path = vec![end.to_string()];
    let mut cursor = end;
    while cursor != start {
        match previous.get(cursor) {
            Some(p) => {
                path.push(p.clone());
                cursor = p.as_str();
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_types::NodeAttributes;

    fn at(activity: f64, interaction: f64) -> Option<NodeAttributes> {
        Some(NodeAttributes::new(Some(activity), Some(interaction), Some(0)))
    }

    /// s and t are only connected through a (close) or b (far).
    fn diamond() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_node("s", None, at(0.0, 0.0)).unwrap();
        store.add_node("a", None, at(1.0, 0.0)).unwrap();
        store.add_node("b", None, at(1.0, 5.0)).unwrap();
        store.add_node("t", None, at(2.0, 0.0)).unwrap();
        store.add_node("island", None, at(0.0, 0.0)).unwrap();
        for (x, y) in [("s", "a"), ("a", "t"), ("s", "b"), ("b", "t")] {
            store.add_edge(x, y, None).unwrap();
        }
        store
    }

    #[test]
    fn prefers_heavier_route() {
        let store = diamond();
        for algorithm in [PathAlgorithm::Dijkstra, PathAlgorithm::AStar] {
            let result = shortest_path(&store, algorithm, "s", "t").unwrap();
            assert_eq!(result.path, vec!["s", "a", "t"]);
            assert!((result.cost.unwrap() - 1.0).abs() < 1e-12);
            assert_eq!(result.visited.first().map(String::as_str), Some("s"));
            assert_eq!(result.visited.last().map(String::as_str), Some("t"));
        }
    }

    #[test]
    fn unreachable_end_yields_empty_path() {
        let store = diamond();
        let result = shortest_path(&store, PathAlgorithm::Dijkstra, "s", "island").unwrap();
        assert!(result.path.is_empty());
        assert_eq!(result.cost, None);
        assert_eq!(result.visited.len(), 4);
    }

    #[test]
    fn same_start_and_end() {
        let store = diamond();
        let result = shortest_path(&store, PathAlgorithm::AStar, "a", "a").unwrap();
        assert_eq!(result.path, vec!["a"]);
        assert_eq!(result.cost, Some(0.0));
    }

    #[test]
    fn validates_endpoints_and_tokens() {
        let store = diamond();
        assert_eq!(
            shortest_path(&store, PathAlgorithm::Dijkstra, "x", "t"),
            Err(TraversalError::UnknownStartNode("x".to_string()))
        );
        assert_eq!(
            shortest_path(&store, PathAlgorithm::Dijkstra, "s", "y"),
            Err(TraversalError::UnknownEndNode("y".to_string()))
        );
        assert_eq!(
            shortest_path(&GraphStore::new(), PathAlgorithm::Dijkstra, "s", "t"),
            Err(TraversalError::EmptyGraph)
        );
        assert_eq!("A*".parse::<PathAlgorithm>(), Ok(PathAlgorithm::AStar));
        assert!("bfs".parse::<PathAlgorithm>().is_err());
    }

    #[test]
    fn edge_cost_clamps() {
        assert_eq!(edge_cost(1.0), 0.0);
        assert_eq!(edge_cost(1.5), 0.0);
        assert_eq!(edge_cost(-2.0), 1.0);
    }
}
