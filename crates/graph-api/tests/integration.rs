//! Integration tests: traversal, shortest path, trace, merge, saved graphs.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use graph_api::repository::{InMemoryGraphRepository, JsonFileGraphRepository};
use graph_api::server::{self, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

fn test_app() -> axum::Router {
    let state = Arc::new(AppState {
        repository: Arc::new(InMemoryGraphRepository::new()),
    });
    server::router(state)
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> Value {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn get_json(app: &axum::Router, uri: &str) -> Value {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn path_graph() -> Value {
    json!({
        "nodes": [
            { "id": "A", "activity": 0.0, "interaction": 0.0, "connection_count": 1 },
            { "id": "B", "activity": 0.0, "interaction": 0.0, "connection_count": 1 },
            { "id": "C", "activity": 0.0, "interaction": 0.0, "connection_count": 1 },
            { "id": "D", "activity": 0.0, "interaction": 0.0, "connection_count": 1 }
        ],
        "edges": [
            { "from": "A", "to": "B" },
            { "from": "B", "to": "C" },
            { "from": "C", "to": "D" }
        ]
    })
}

fn order_of(j: &Value) -> Vec<String> {
    j["data"]["order"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn bfs_and_dfs_orders() {
    let app = test_app();
    for algorithm in ["bfs", "dfs"] {
        let j = post_json(
            &app,
            &format!("/algorithms/{}", algorithm),
            json!({ "start_id": "A", "graph": path_graph() }),
        )
        .await;
        assert_eq!(j["code"], 200);
        assert_eq!(order_of(&j), vec!["A", "B", "C", "D"]);
        assert!(j["data"].get("path").is_none());
    }
}

#[tokio::test]
async fn unknown_start_and_algorithm_are_validation_errors() {
    let app = test_app();
    let j = post_json(
        &app,
        "/algorithms/bfs",
        json!({ "start_id": "Z", "graph": path_graph() }),
    )
    .await;
    assert_eq!(j["code"], 400);
    assert!(j["message"].as_str().unwrap().contains("Z"));
    assert!(j.get("data").is_none());

    let j = post_json(
        &app,
        "/algorithms/kruskal",
        json!({ "start_id": "A", "graph": path_graph() }),
    )
    .await;
    assert_eq!(j["code"], 400);
    assert!(j["message"].as_str().unwrap().contains("unsupported algorithm"));

    let j = post_json(
        &app,
        "/algorithms/dfs",
        json!({ "start_id": "A", "graph": { "nodes": [], "edges": [] } }),
    )
    .await;
    assert_eq!(j["code"], 400);
}

#[tokio::test]
async fn invalid_graph_payload_is_rejected() {
    let app = test_app();
    let graph = json!({
        "nodes": [{ "id": "A" }, { "id": "A" }],
        "edges": []
    });
    let j = post_json(&app, "/algorithms/bfs", json!({ "start_id": "A", "graph": graph })).await;
    assert_eq!(j["code"], 400);
    assert!(j["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn reversed_duplicate_edges_load_as_one() {
    let app = test_app();
    let graph = json!({
        "nodes": [{ "id": "a" }, { "id": "b" }, { "id": "c" }],
        "edges": [
            { "from": "a", "to": "b" },
            { "from": "b", "to": "a" },
            { "from": "b", "to": "c" }
        ]
    });
    let j = post_json(&app, "/algorithms/bfs", json!({ "start_id": "a", "graph": graph.clone() })).await;
    assert_eq!(j["code"], 200);
    assert_eq!(order_of(&j), vec!["a", "b", "c"]);

    let j = post_json(&app, "/algorithms/trace/dfs", json!({ "start_id": "a", "graph": graph })).await;
    assert_eq!(j["code"], 200);
    let edge_steps_from_a = j["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["kind"] == "edge" && s["edge"]["from"] == "a")
        .count();
    assert_eq!(edge_steps_from_a, 1);
}

#[tokio::test]
async fn coloring_separates_neighbors() {
    let app = test_app();
    let graph = json!({
        "nodes": [{ "id": "a" }, { "id": "b" }, { "id": "c" }, { "id": "d" }],
        "edges": [
            { "from": "a", "to": "b" },
            { "from": "b", "to": "c" },
            { "from": "a", "to": "c" },
            { "from": "c", "to": "a" },
            { "from": "c", "to": "d" }
        ]
    });
    let j = post_json(&app, "/algorithms/coloring", json!({ "graph": graph })).await;
    assert_eq!(j["code"], 200);
    assert_eq!(j["data"]["color_count"], 3);
    let colors = &j["data"]["colors"];
    assert_eq!(colors["c"], 0);
    assert_ne!(colors["a"], colors["b"]);
    assert_ne!(colors["d"], colors["c"]);

    let j = post_json(&app, "/algorithms/coloring", json!({ "graph": { "nodes": [{ "id": "x" }, { "id": "x" }] } })).await;
    assert_eq!(j["code"], 400);
}

#[tokio::test]
async fn shortest_path_endpoints() {
    let app = test_app();
    for algorithm in ["dijkstra", "astar"] {
        let j = post_json(
            &app,
            &format!("/algorithms/{}", algorithm),
            json!({ "start_id": "A", "end_id": "D", "graph": path_graph() }),
        )
        .await;
        assert_eq!(j["code"], 200);
        assert_eq!(order_of(&j), vec!["A", "B", "C", "D"]);
        assert_eq!(j["data"]["path"], json!(["A", "B", "C", "D"]));
        assert_eq!(j["data"]["visited"].as_array().unwrap().len(), 4);
        assert!(j["data"]["cost"].as_f64().unwrap() >= 0.0);
    }

    let j = post_json(
        &app,
        "/algorithms/dijkstra",
        json!({ "start_id": "A", "graph": path_graph() }),
    )
    .await;
    assert_eq!(j["code"], 400);
    assert_eq!(j["message"], "end_id is required");
}

#[tokio::test]
async fn trace_returns_every_step() {
    let app = test_app();
    let j = post_json(
        &app,
        "/algorithms/trace/bfs",
        json!({ "start_id": "A", "graph": path_graph() }),
    )
    .await;
    assert_eq!(j["code"], 200);
    let steps = j["data"].as_array().unwrap();
    assert_eq!(steps[0]["kind"], "init");
    assert_eq!(steps[0]["frontier"], json!(["A"]));
    assert_eq!(steps[1]["kind"], "visit");
    assert_eq!(steps[1]["current"], "A");
    let last = steps.last().unwrap();
    assert_eq!(last["order"], json!(["A", "B", "C", "D"]));

    let j = post_json(
        &app,
        "/algorithms/trace/dijkstra",
        json!({ "start_id": "A", "graph": path_graph() }),
    )
    .await;
    assert_eq!(j["code"], 400);
}

#[tokio::test]
async fn merge_prefers_base_and_recomputes_weights() {
    let app = test_app();
    let base = json!({
        "nodes": [
            { "id": "a", "label": "Alpha", "activity": 0.0, "interaction": 0.0, "connection_count": 2 },
            { "id": "b", "activity": 1.0, "interaction": 0.0, "connection_count": 0 }
        ],
        "edges": [{ "from": "a", "to": "b", "relation_type": "first", "relation_degree": 42.0 }]
    });
    let incoming = json!({
        "nodes": [
            { "id": "a", "label": "Other", "activity": 9.0 },
            { "id": "c" }
        ],
        "edges": [
            { "from": "b", "to": "a", "relation_type": "second" },
            { "from": "a", "to": "c" }
        ]
    });
    let j = post_json(&app, "/graphs/merge", json!({ "base": base, "incoming": incoming })).await;
    assert_eq!(j["code"], 200);
    let nodes = j["data"]["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["id"], "a");
    assert_eq!(nodes[0]["label"], "Alpha");
    assert_eq!(nodes[0]["activity"], 0.0);
    let edges = j["data"]["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0]["relation_type"], "first");
    let weight = edges[0]["relation_degree"].as_f64().unwrap();
    assert!((weight - 1.0 / (1.0 + 5f64.sqrt())).abs() < 1e-9);
}

#[tokio::test]
async fn save_list_get_graphs() {
    let app = test_app();
    let j = post_json(&app, "/graphs", json!({ "name": "  ", "graph": path_graph() })).await;
    assert_eq!(j["code"], 400);

    let j = post_json(&app, "/graphs", json!({ "name": " chain ", "graph": path_graph() })).await;
    assert_eq!(j["code"], 200);
    assert_eq!(j["data"]["name"], "chain");
    let id = j["data"]["id"].as_str().unwrap().to_string();

    let j = get_json(&app, "/graphs").await;
    assert_eq!(j["code"], 200);
    let list = j["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], id.as_str());
    assert_eq!(list[0]["node_count"], 4);
    assert_eq!(list[0]["edge_count"], 3);

    let j = get_json(&app, &format!("/graphs/{}", id)).await;
    assert_eq!(j["code"], 200);
    assert_eq!(j["data"]["graph"]["nodes"].as_array().unwrap().len(), 4);

    let j = get_json(&app, "/graphs/does-not-exist").await;
    assert_eq!(j["code"], 404);
}

#[tokio::test]
async fn file_repository_backs_the_router() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graphs.json");
    let state = Arc::new(AppState {
        repository: Arc::new(JsonFileGraphRepository::new(&path)),
    });
    let app = server::router(state);
    let j = post_json(&app, "/graphs", json!({ "name": "disk", "graph": path_graph() })).await;
    assert_eq!(j["code"], 200);

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    let on_disk: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(on_disk.as_array().unwrap().len(), 1);
    assert_eq!(on_disk[0]["name"], "disk");
}

#[tokio::test]
async fn health() {
    let app = test_app();
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}
