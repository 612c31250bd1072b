//! BFS/DFS producing a full, replayable step trace.

use graph_store::GraphStore;
use graph_types::TraversalError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Traversal algorithm. Parsed from `"bfs"` / `"dfs"` (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bfs,
    Dfs,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = TraversalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            _ => Err(TraversalError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Init,
    Visit,
    Skip,
    Edge,
}

/// Edge under consideration: `discovered` is true when `to` was newly put on the frontier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeProbe {
    pub from: String,
    pub to: String,
    pub discovered: bool,
}

/// Immutable snapshot of the traversal at one step.
///
/// `frontier` is listed front-to-back for BFS (next dequeued first) and bottom-to-top for
/// DFS (next popped last).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalStep {
    pub kind: StepKind,
    pub current: Option<String>,
    pub edge: Option<EdgeProbe>,
    pub frontier: Vec<String>,
    pub visited: BTreeSet<String>,
    pub order: Vec<String>,
}

#[derive(Default)]
struct Trace {
    steps: Vec<TraversalStep>,
    visited: BTreeSet<String>,
    order: Vec<String>,
}

impl Trace {
    fn record<'a>(
        &mut self,
        kind: StepKind,
        current: Option<&str>,
        edge: Option<EdgeProbe>,
        frontier: impl Iterator<Item = &'a String>,
    ) {
        self.steps.push(TraversalStep {
            kind,
            current: current.map(str::to_string),
            edge,
            frontier: frontier.cloned().collect(),
            visited: self.visited.clone(),
            order: self.order.clone(),
        });
    }
}

/// Build the full step trace for `algorithm` starting at `start_id`.
pub fn run_traversal(
    store: &GraphStore,
    algorithm: Algorithm,
    start_id: &str,
) -> Result<Vec<TraversalStep>, TraversalError> {
    if store.is_empty() {
        return Err(TraversalError::EmptyGraph);
    }
    let start = start_id.trim();
    if !store.contains_node(start) {
        return Err(TraversalError::UnknownStartNode(start.to_string()));
    }
    let steps = match algorithm {
        Algorithm::Bfs => bfs(store, start),
        Algorithm::Dfs => dfs(store, start),
    };
    tracing::debug!(
        algorithm = %algorithm,
        start = %start,
        steps = steps.len(),
        "traversal trace built"
    );
    Ok(steps)
}

/// Final visitation order, for non-animated queries.
pub fn traversal_order(
    store: &GraphStore,
    algorithm: Algorithm,
    start_id: &str,
) -> Result<Vec<String>, TraversalError> {
    let steps = run_traversal(store, algorithm, start_id)?;
    Ok(steps.last().map(|s| s.order.clone()).unwrap_or_default())
}

fn bfs(store: &GraphStore, start: &str) -> Vec<TraversalStep> {
    let mut trace = Trace::default();
    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(start.to_string());
    trace.visited.insert(start.to_string());
    trace.record(StepKind::Init, None, None, queue.iter());

    while let Some(current) = queue.pop_front() {
        trace.order.push(current.clone());
        trace.record(StepKind::Visit, Some(current.as_str()), None, queue.iter());

        for neighbor in store.neighbors_sorted(&current).unwrap_or_default() {
            let discovered = trace.visited.insert(neighbor.id.clone());
            if discovered {
                queue.push_back(neighbor.id.clone());
            }
            let probe = EdgeProbe {
                from: current.clone(),
                to: neighbor.id,
                discovered,
            };
            trace.record(StepKind::Edge, Some(current.as_str()), Some(probe), queue.iter());
        }
    }
    trace.steps
}

fn dfs(store: &GraphStore, start: &str) -> Vec<TraversalStep> {
    let mut trace = Trace::default();
    let mut stack: Vec<String> = vec![start.to_string()];
    trace.record(StepKind::Init, None, None, stack.iter());

    while let Some(current) = stack.pop() {
        if trace.visited.contains(&current) {
            trace.record(StepKind::Skip, Some(current.as_str()), None, stack.iter());
            continue;
        }
        trace.visited.insert(current.clone());
        trace.order.push(current.clone());
        trace.record(StepKind::Visit, Some(current.as_str()), None, stack.iter());

        // Reversed so the highest-weight neighbor ends on top of the stack.
        let neighbors = store.neighbors_sorted(&current).unwrap_or_default();
        for neighbor in neighbors.into_iter().rev() {
            let discovered = !trace.visited.contains(&neighbor.id);
            if discovered {
                stack.push(neighbor.id.clone());
            }
            let probe = EdgeProbe {
                from: current.clone(),
                to: neighbor.id,
                discovered,
            };
            trace.record(StepKind::Edge, Some(current.as_str()), Some(probe), stack.iter());
        }
    }
    trace.steps
}
