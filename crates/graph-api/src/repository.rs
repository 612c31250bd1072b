//! Saved-graph repositories: a JSON array file on disk and a process-lifetime map.

use async_trait::async_trait;
use graph_types::{GraphPayload, GraphRecord, GraphRecordSummary, GraphRepository, RepositoryError};
use std::path::{Path, PathBuf};
use uuid::Uuid;

fn new_record(name: &str, graph: &GraphPayload) -> GraphRecord {
    GraphRecord {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
        graph: graph.clone(),
    }
}

/// In-memory implementation of GraphRepository (process lifetime only).
pub struct InMemoryGraphRepository {
    records: tokio::sync::RwLock<Vec<GraphRecord>>,
}

impl InMemoryGraphRepository {
    pub fn new() -> Self {
        Self {
            records: tokio::sync::RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryGraphRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphRepository for InMemoryGraphRepository {
    async fn save(&self, name: &str, graph: &GraphPayload) -> Result<GraphRecord, RepositoryError> {
        let record = new_record(name, graph);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<GraphRecordSummary>, RepositoryError> {
        let guard = self.records.read().await;
        Ok(guard.iter().map(GraphRecordSummary::from).collect())
    }

    async fn get(&self, id: &str) -> Result<GraphRecord, RepositoryError> {
        let guard = self.records.read().await;
        guard
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }
}

/// JSON file-backed GraphRepository. The whole file is one array of records, rewritten on
/// every save. A missing or unparseable file reads as empty.
pub struct JsonFileGraphRepository {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileGraphRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<GraphRecord>, RepositoryError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Vec<GraphRecord>>(&content) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable graph store; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn write_records(&self, records: &[GraphRecord]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }
}

#[async_trait]
impl GraphRepository for JsonFileGraphRepository {
    async fn save(&self, name: &str, graph: &GraphPayload) -> Result<GraphRecord, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records().await?;
        let record = new_record(name, graph);
        records.push(record.clone());
        self.write_records(&records).await?;
        tracing::info!(id = %record.id, name = %record.name, "graph saved");
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<GraphRecordSummary>, RepositoryError> {
        let records = self.read_records().await?;
        Ok(records.iter().map(GraphRecordSummary::from).collect())
    }

    async fn get(&self, id: &str) -> Result<GraphRecord, RepositoryError> {
        self.read_records()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_types::{EdgePayload, NodePayload};

    fn pair() -> GraphPayload {
        GraphPayload {
            nodes: vec![NodePayload::new("a"), NodePayload::new("b")],
            edges: vec![EdgePayload::new("a", "b")],
        }
    }

    #[tokio::test]
    async fn file_repository_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("graphs.json");
        let repo = JsonFileGraphRepository::new(&path);
        assert!(repo.list().await.unwrap().is_empty());

        let saved = repo.save("pair", &pair()).await.unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&saved.created_at).is_ok());

        let reopened = JsonFileGraphRepository::new(&path);
        let summaries = reopened.list().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].node_count, 2);
        assert_eq!(summaries[0].edge_count, 1);
        let fetched = reopened.get(&saved.id).await.unwrap();
        assert_eq!(fetched.graph, pair());
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graphs.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();
        let repo = JsonFileGraphRepository::new(&path);
        assert!(repo.list().await.unwrap().is_empty());
        repo.save("fresh", &GraphPayload::default()).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let repo = InMemoryGraphRepository::new();
        repo.save("one", &pair()).await.unwrap();
        match repo.get("missing").await {
            Err(RepositoryError::NotFound(id)) => assert_eq!(id, "missing"),
            other => panic!("expected NotFound, got {:?}", other.map(|r| r.id)),
        }
    }
}
