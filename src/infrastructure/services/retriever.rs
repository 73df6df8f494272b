//! Retrieval service
//!
//! Composes the embedding model and the vector store to answer "top-k most
//! relevant chunks for this query" and to build a length-bounded context
//! window for prompt grounding.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{
    EmbeddingModel, EngineError, RetrievalResult, SourceChunk, VectorRecord, VectorStore,
};

/// Statistics returned by an indexing run
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    /// Number of records in the store after the run
    pub indexed_chunks: usize,
    /// Name of the embedding model used
    pub embedding_model: String,
    /// Dimension of the embeddings produced
    pub embedding_dimension: usize,
}

/// Retriever over an embedding model and a vector store
#[derive(Debug)]
pub struct Retriever {
    embedding_model: Arc<dyn EmbeddingModel>,
    store: Arc<dyn VectorStore>,
}

impl Retriever {
    /// Create a new retriever
    pub fn new(embedding_model: Arc<dyn EmbeddingModel>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedding_model,
            store,
        }
    }

    /// Name of the underlying embedding model
    pub fn embedding_model_name(&self) -> &'static str {
        self.embedding_model.model_name()
    }

    /// Number of indexed records
    pub async fn index_size(&self) -> Result<usize, EngineError> {
        self.store.len().await
    }

    /// Embed a batch of chunks and upsert them into the store.
    ///
    /// `rebuild` clears the store first. The snapshot is saved after a
    /// successful upsert.
    pub async fn index(
        &self,
        chunks: Vec<SourceChunk>,
        rebuild: bool,
    ) -> Result<IndexStats, EngineError> {
        if rebuild {
            self.store.clear().await?;
        }

        // Embedding is pure CPU work and runs without any store lock held.
        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let embeddings = self.embedding_model.embed_batch(&texts);

        let records: Vec<VectorRecord> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| VectorRecord {
                id: chunk.id,
                text: chunk.text,
                embedding,
                metadata: chunk.metadata,
            })
            .collect();

        self.store.upsert_many(records).await?;
        self.store.save().await?;

        let stats = IndexStats {
            indexed_chunks: self.store.len().await?,
            embedding_model: self.embedding_model.model_name().to_string(),
            embedding_dimension: self.embedding_model.dimension(),
        };

        info!(
            chunks = stats.indexed_chunks,
            model = %stats.embedding_model,
            "indexed document chunks"
        );

        Ok(stats)
    }

    /// Top-k most relevant chunks for a query
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievalResult>, EngineError> {
        let query_embedding = self.embedding_model.embed(query);
        self.store.search(&query_embedding, top_k).await
    }

    /// Retrieve and render a length-bounded context string.
    ///
    /// Result lines are concatenated greedily in rank order; a line that
    /// would push the total past `max_chars` is dropped whole and scanning
    /// stops there, so the context is deterministic and rank-prioritized.
    pub async fn build_context(
        &self,
        query: &str,
        top_k: usize,
        max_chars: usize,
    ) -> Result<(String, Vec<RetrievalResult>), EngineError> {
        let results = self.retrieve(query, top_k).await?;

        let mut lines: Vec<String> = Vec::new();
        let mut current_len = 0usize;

        for (rank, result) in results.iter().enumerate() {
            let line = format!(
                "[{}] (score={:.3}, source={}) {}",
                rank + 1,
                result.score,
                result.source_path(),
                result.text
            );

            let line_len = line.chars().count();
            if current_len + line_len > max_chars {
                break;
            }

            lines.push(line);
            current_len += line_len;
        }

        debug!(
            results = results.len(),
            context_lines = lines.len(),
            "built retrieval context"
        );

        Ok((lines.join("\n"), results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::embedding::HashingEmbeddingModel;
    use crate::infrastructure::vector_store::JsonVectorStore;
    use std::collections::HashMap;

    fn chunk(id: &str, text: &str, source: &str) -> SourceChunk {
        SourceChunk {
            id: id.to_string(),
            text: text.to_string(),
            metadata: HashMap::from([
                ("source_path".to_string(), serde_json::json!(source)),
                ("chunk_index".to_string(), serde_json::json!(0)),
            ]),
        }
    }

    fn topic_chunks() -> Vec<SourceChunk> {
        vec![
            chunk(
                "rust",
                "rust is a systems programming language focused on memory safety",
                "docs/rust.md",
            ),
            chunk(
                "pasta",
                "cooking pasta requires salted boiling water and fresh ingredients",
                "docs/pasta.md",
            ),
            chunk(
                "stars",
                "telescopes reveal distant stars and galaxies in the night sky",
                "docs/stars.md",
            ),
        ]
    }

    fn test_retriever(dir: &tempfile::TempDir) -> Retriever {
        let model = Arc::new(HashingEmbeddingModel::new(64).unwrap());
        let store = Arc::new(JsonVectorStore::new(dir.path().join("vectors.json")));
        Retriever::new(model, store)
    }

    #[tokio::test]
    async fn test_index_reports_stats() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = test_retriever(&dir);

        let stats = retriever.index(topic_chunks(), false).await.unwrap();

        assert_eq!(stats.indexed_chunks, 3);
        assert_eq!(stats.embedding_model, "hashing-embed-v1");
        assert_eq!(stats.embedding_dimension, 64);
        assert_eq!(retriever.index_size().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_retrieve_ranks_matching_topic_first() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = test_retriever(&dir);
        retriever.index(topic_chunks(), false).await.unwrap();

        let results = retriever
            .retrieve("rust programming language", 1)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "rust");
    }

    #[tokio::test]
    async fn test_rebuild_clears_previous_index() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = test_retriever(&dir);

        retriever.index(topic_chunks(), false).await.unwrap();
        let stats = retriever
            .index(vec![chunk("only", "a single chunk", "docs/only.md")], true)
            .await
            .unwrap();

        assert_eq!(stats.indexed_chunks, 1);
    }

    #[tokio::test]
    async fn test_build_context_lines_in_rank_order() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = test_retriever(&dir);
        retriever.index(topic_chunks(), false).await.unwrap();

        let (context, results) = retriever
            .build_context("rust programming language", 3, 10_000)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);

        let lines: Vec<&str> = context.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("[1] (score="));
        assert!(lines[0].contains("docs/rust.md"));
        assert!(lines[1].starts_with("[2] "));
    }

    #[tokio::test]
    async fn test_build_context_drops_overflowing_line_whole() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = test_retriever(&dir);
        retriever.index(topic_chunks(), false).await.unwrap();

        let (full_context, _) = retriever
            .build_context("rust programming language", 3, 10_000)
            .await
            .unwrap();
        let first_line_len = full_context.lines().next().unwrap().chars().count();

        // Exactly the first line fits; the second would overflow and is
        // dropped entirely.
        let (context, results) = retriever
            .build_context("rust programming language", 3, first_line_len)
            .await
            .unwrap();

        assert_eq!(context.lines().count(), 1);
        assert_eq!(results.len(), 3);

        // A limit below the first line yields an empty context, while the
        // results themselves are still returned.
        let (empty, results) = retriever
            .build_context("rust programming language", 3, first_line_len - 1)
            .await
            .unwrap();

        assert!(empty.is_empty());
        assert_eq!(results.len(), 3);
    }
}
