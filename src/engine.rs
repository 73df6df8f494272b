//! Engine context
//!
//! Explicitly constructed, explicitly passed dependency container for the
//! retrieval and caching subsystem. Initialization order is fixed here:
//! embedding model, vector store (with snapshot load), retriever, cache
//! backend probe, cache service. There is no global mutable state.

use std::sync::Arc;

use tracing::info;

use crate::config::EngineConfig;
use crate::domain::{EmbeddingModel, EngineError, VectorStore};
use crate::infrastructure::cache::connect_cache_backend;
use crate::infrastructure::embedding::build_embedding_model;
use crate::infrastructure::ingestion::build_chunks;
use crate::infrastructure::services::{IndexStats, Retriever, SemanticCacheService};
use crate::infrastructure::vector_store::JsonVectorStore;

/// The assembled retrieval and caching engine
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    embedding_model: Arc<dyn EmbeddingModel>,
    retriever: Arc<Retriever>,
    cache: Arc<SemanticCacheService>,
}

impl Engine {
    /// Build the engine from configuration.
    ///
    /// Configuration errors are fatal; an unreachable external cache
    /// backend is not, and degrades to the in-process backend.
    pub async fn initialize(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let embedding_model = build_embedding_model(&config.embedding)?;

        let store: Arc<dyn VectorStore> =
            Arc::new(JsonVectorStore::open(config.vector_store.path.clone()).await?);
        let retriever = Arc::new(Retriever::new(embedding_model.clone(), store));

        let backend = connect_cache_backend(&config.cache).await?;
        let active_backend = backend.active;
        let cache = Arc::new(SemanticCacheService::new(
            backend,
            embedding_model.clone(),
            config.cache.clone(),
        ));

        info!(
            model = embedding_model.model_name(),
            dimension = embedding_model.dimension(),
            cache_backend = %active_backend,
            "engine initialized"
        );

        Ok(Self {
            config,
            embedding_model,
            retriever,
            cache,
        })
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The shared embedding model
    pub fn embedding_model(&self) -> Arc<dyn EmbeddingModel> {
        self.embedding_model.clone()
    }

    /// The retriever service
    pub fn retriever(&self) -> Arc<Retriever> {
        self.retriever.clone()
    }

    /// Chunk every document under the configured data directory and index
    /// the result; `rebuild` clears the store first
    pub async fn index_documents(&self, rebuild: bool) -> Result<IndexStats, EngineError> {
        let chunks = build_chunks(
            &self.config.retrieval.data_dir,
            &self.config.retrieval.chunking(),
        );
        self.retriever.index(chunks, rebuild).await
    }

    /// The semantic cache service
    pub fn cache(&self) -> Arc<SemanticCacheService> {
        self.cache.clone()
    }
}
