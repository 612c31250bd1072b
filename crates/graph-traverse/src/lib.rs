//! Traversal engine (BFS/DFS step traces), shortest-path queries, and greedy coloring.

mod coloring;
mod engine;
mod shortest_path;

pub use coloring::{greedy_coloring, Coloring};
pub use engine::{run_traversal, traversal_order, Algorithm, EdgeProbe, StepKind, TraversalStep};
pub use graph_types::TraversalError;
pub use shortest_path::{shortest_path, PathAlgorithm, ShortestPath};
