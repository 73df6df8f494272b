//! Vector record and retrieval result types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A stored (id, text, embedding, metadata) record.
///
/// `id` is unique within a store; re-upserting the same id replaces the
/// prior entry. Metadata is opaque key/value data and carries at minimum
/// the originating source path and chunk index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Unique identifier within the store
    pub id: String,
    /// The original chunk text
    pub text: String,
    /// The embedding vector
    pub embedding: Vec<f32>,
    /// Opaque metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl VectorRecord {
    /// Create a new record
    pub fn new(id: impl Into<String>, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            embedding,
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get the embedding dimension
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

/// A scored projection of a [`VectorRecord`] against a query.
///
/// Ephemeral and read-only; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalResult {
    /// Id of the matching record
    pub id: String,
    /// The matching record's text
    pub text: String,
    /// Cosine similarity against the query
    pub score: f32,
    /// The matching record's metadata
    pub metadata: HashMap<String, serde_json::Value>,
}

impl RetrievalResult {
    /// Get the source path from metadata, or `"unknown"`
    pub fn source_path(&self) -> &str {
        self.metadata
            .get("source_path")
            .and_then(|value| value.as_str())
            .unwrap_or("unknown")
    }
}
