//! Axum server and routes.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use graph_store::{collapse_duplicate_edges, merge, GraphStore};
use graph_traverse::{
    greedy_coloring, run_traversal, shortest_path, traversal_order, Algorithm, Coloring,
    PathAlgorithm, TraversalError, TraversalStep,
};
use graph_types::{
    GraphPayload, GraphRecord, GraphRecordSummary, GraphRepository, GraphStoreError,
    RepositoryError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub struct AppState {
    pub repository: Arc<dyn GraphRepository>,
}

/// Response envelope shared by every JSON route. HTTP status is always 200; `code` carries
/// the outcome.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            code: 200,
            message: "Success".to_string(),
            data: Some(data),
        })
    }

    fn fail(code: i32, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            code,
            message: message.into(),
            data: None,
        })
    }
}

fn graph_error<T>(e: GraphStoreError) -> Json<ApiResponse<T>> {
    ApiResponse::fail(400, e.to_string())
}

fn traversal_error<T>(e: TraversalError) -> Json<ApiResponse<T>> {
    ApiResponse::fail(400, e.to_string())
}

fn repository_error<T>(e: RepositoryError) -> Json<ApiResponse<T>> {
    match e {
        RepositoryError::NotFound(_) => ApiResponse::fail(404, e.to_string()),
        _ => ApiResponse::fail(500, e.to_string()),
    }
}

/// Request graphs may list an undirected edge from both ends; the first listing wins.
fn build_store(graph: &GraphPayload) -> Result<GraphStore, GraphStoreError> {
    GraphStore::from_payload(&collapse_duplicate_edges(graph))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/algorithms/coloring", post(handle_coloring))
        .route("/algorithms/trace/:algorithm", post(handle_trace))
        .route("/algorithms/:algorithm", post(handle_algorithm))
        .route("/graphs/merge", post(handle_merge))
        .route("/graphs", get(handle_list_graphs).post(handle_save_graph))
        .route("/graphs/:id", get(handle_get_graph))
        .route("/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct AlgorithmRequest {
    pub start_id: String,
    #[serde(default)]
    pub end_id: Option<String>,
    #[serde(default)]
    pub graph: GraphPayload,
}

/// `order` is the visitation order for BFS/DFS and the path for shortest-path algorithms.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AlgorithmResponse {
    pub order: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visited: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

async fn handle_algorithm(
    Path(algorithm): Path<String>,
    Json(req): Json<AlgorithmRequest>,
) -> Json<ApiResponse<AlgorithmResponse>> {
    let store = match build_store(&req.graph) {
        Ok(s) => s,
        Err(e) => return graph_error(e),
    };
    if let Ok(traversal) = algorithm.parse::<Algorithm>() {
        return match traversal_order(&store, traversal, &req.start_id) {
            Ok(order) => ApiResponse::ok(AlgorithmResponse {
                order,
                ..Default::default()
            }),
            Err(e) => traversal_error(e),
        };
    }
    let path_algorithm = match algorithm.parse::<PathAlgorithm>() {
        Ok(a) => a,
        Err(e) => return traversal_error(e),
    };
    let end_id = match req.end_id.as_deref() {
        Some(end) if !end.trim().is_empty() => end,
        _ => return ApiResponse::fail(400, "end_id is required"),
    };
    match shortest_path(&store, path_algorithm, &req.start_id, end_id) {
        Ok(result) => ApiResponse::ok(AlgorithmResponse {
            order: result.path.clone(),
            visited: Some(result.visited),
            path: Some(result.path),
            cost: result.cost,
        }),
        Err(e) => traversal_error(e),
    }
}

async fn handle_trace(
    Path(algorithm): Path<String>,
    Json(req): Json<AlgorithmRequest>,
) -> Json<ApiResponse<Vec<TraversalStep>>> {
    let algorithm = match algorithm.parse::<Algorithm>() {
        Ok(a) => a,
        Err(e) => return traversal_error(e),
    };
    let store = match build_store(&req.graph) {
        Ok(s) => s,
        Err(e) => return graph_error(e),
    };
    match run_traversal(&store, algorithm, &req.start_id) {
        Ok(steps) => ApiResponse::ok(steps),
        Err(e) => traversal_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct GraphRequest {
    #[serde(default)]
    pub graph: GraphPayload,
}

async fn handle_coloring(Json(req): Json<GraphRequest>) -> Json<ApiResponse<Coloring>> {
    match build_store(&req.graph) {
        Ok(store) => ApiResponse::ok(greedy_coloring(&store)),
        Err(e) => graph_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    #[serde(default)]
    pub base: GraphPayload,
    #[serde(default)]
    pub incoming: GraphPayload,
}

async fn handle_merge(Json(req): Json<MergeRequest>) -> Json<ApiResponse<GraphPayload>> {
    let merged = merge(&req.base, &req.incoming);
    match GraphStore::from_payload(&merged) {
        Ok(store) => {
            tracing::info!(
                nodes = store.node_count(),
                edges = store.edge_count(),
                "graphs merged"
            );
            ApiResponse::ok(store.snapshot())
        }
        Err(e) => graph_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveGraphRequest {
    pub name: String,
    #[serde(default)]
    pub graph: GraphPayload,
}

async fn handle_save_graph(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveGraphRequest>,
) -> Json<ApiResponse<GraphRecord>> {
    let name = req.name.trim();
    if name.is_empty() {
        return ApiResponse::fail(400, "name must not be empty");
    }
    match state.repository.save(name, &req.graph).await {
        Ok(record) => ApiResponse::ok(record),
        Err(e) => repository_error(e),
    }
}

async fn handle_list_graphs(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<GraphRecordSummary>>> {
    match state.repository.list().await {
        Ok(list) => ApiResponse::ok(list),
        Err(e) => repository_error(e),
    }
}

async fn handle_get_graph(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<ApiResponse<GraphRecord>> {
    match state.repository.get(&id).await {
        Ok(record) => ApiResponse::ok(record),
        Err(e) => repository_error(e),
    }
}

async fn handle_health() -> &'static str {
    "ok"
}
