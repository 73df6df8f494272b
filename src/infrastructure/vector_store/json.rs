//! JSON-snapshot vector store
//!
//! Keeps all records in memory and persists them as a single serialized
//! blob. Search is an exact linear scan; corpora are small by design and
//! callers needing scale swap the implementation behind [`VectorStore`].

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{cosine_similarity, EngineError, RetrievalResult, VectorRecord, VectorStore};

/// Persisted snapshot payload
#[derive(Debug, Serialize, Deserialize)]
struct StoreSnapshot {
    dimension: Option<usize>,
    records: Vec<VectorRecord>,
}

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<VectorRecord>,
    dimension: Option<usize>,
}

/// Vector store persisting to a single JSON blob on disk
#[derive(Debug)]
pub struct JsonVectorStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl JsonVectorStore {
    /// Create an empty store bound to a snapshot path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Create a store bound to a snapshot path and load any existing snapshot
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let store = Self::new(path);
        store.load().await?;
        Ok(store)
    }

    /// The snapshot path this store persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_lock_error(e: impl std::fmt::Display) -> EngineError {
        EngineError::internal(format!("Failed to acquire read lock: {}", e))
    }

    fn write_lock_error(e: impl std::fmt::Display) -> EngineError {
        EngineError::internal(format!("Failed to acquire write lock: {}", e))
    }
}

#[async_trait]
impl VectorStore for JsonVectorStore {
    async fn upsert_many(&self, records: Vec<VectorRecord>) -> Result<(), EngineError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut state = self.state.write().map_err(Self::write_lock_error)?;

        // Validate the whole batch before touching the store: a mismatch
        // refuses the write and must not leave a partial apply behind.
        let expected = state
            .dimension
            .unwrap_or_else(|| records[0].embedding.len());

        for record in &records {
            if record.embedding.len() != expected {
                return Err(EngineError::dimension_mismatch(
                    expected,
                    record.embedding.len(),
                ));
            }
        }

        for record in records {
            match state.records.iter().position(|r| r.id == record.id) {
                Some(index) => state.records[index] = record,
                None => state.records.push(record),
            }
        }

        state.dimension = Some(expected);

        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalResult>, EngineError> {
        // Snapshot under the lock; score and sort outside it.
        let records = {
            let state = self.state.read().map_err(Self::read_lock_error)?;
            state.records.clone()
        };

        let mut scored: Vec<RetrievalResult> = records
            .into_iter()
            .map(|record| {
                let score = cosine_similarity(query_embedding, &record.embedding);
                RetrievalResult {
                    id: record.id,
                    text: record.text,
                    score,
                    metadata: record.metadata,
                }
            })
            .collect();

        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k.max(1));

        Ok(scored)
    }

    async fn clear(&self) -> Result<(), EngineError> {
        let mut state = self.state.write().map_err(Self::write_lock_error)?;

        state.records.clear();
        state.dimension = None;

        Ok(())
    }

    async fn save(&self) -> Result<(), EngineError> {
        let snapshot = {
            let state = self.state.read().map_err(Self::read_lock_error)?;
            StoreSnapshot {
                dimension: state.dimension,
                records: state.records.clone(),
            }
        };

        let payload = serde_json::to_vec(&snapshot)
            .map_err(|e| EngineError::storage(format!("Failed to serialize snapshot: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                EngineError::storage(format!("Failed to create snapshot directory: {}", e))
            })?;
        }

        tokio::fs::write(&self.path, payload)
            .await
            .map_err(|e| EngineError::storage(format!("Failed to write snapshot: {}", e)))?;

        debug!(path = %self.path.display(), records = snapshot.records.len(), "saved vector store snapshot");

        Ok(())
    }

    async fn load(&self) -> Result<(), EngineError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(EngineError::storage(format!(
                    "Failed to read snapshot: {}",
                    e
                )))
            }
        };

        // A corrupt snapshot fails closed: the store stays empty rather
        // than surfacing a parse error to the caller.
        let snapshot: StoreSnapshot = match serde_json::from_slice(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %self.path.display(), "discarding malformed vector store snapshot: {}", e);
                return Ok(());
            }
        };

        let dimension = snapshot
            .dimension
            .or_else(|| snapshot.records.first().map(|r| r.embedding.len()));

        let records: Vec<VectorRecord> = match dimension {
            Some(expected) => {
                let (valid, dropped): (Vec<_>, Vec<_>) = snapshot
                    .records
                    .into_iter()
                    .partition(|r| r.embedding.len() == expected);

                if !dropped.is_empty() {
                    warn!(
                        path = %self.path.display(),
                        dropped = dropped.len(),
                        "dropping snapshot records with mismatched dimension"
                    );
                }

                valid
            }
            None => Vec::new(),
        };

        let mut state = self.state.write().map_err(Self::write_lock_error)?;
        state.dimension = if records.is_empty() { None } else { dimension };
        state.records = records;

        Ok(())
    }

    async fn len(&self) -> Result<usize, EngineError> {
        let state = self.state.read().map_err(Self::read_lock_error)?;
        Ok(state.records.len())
    }

    async fn dimension(&self) -> Result<Option<usize>, EngineError> {
        let state = self.state.read().map_err(Self::read_lock_error)?;
        Ok(state.dimension)
    }
}
