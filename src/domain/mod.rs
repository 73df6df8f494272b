//! Domain layer - Core types and contracts

pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod semantic_cache;
pub mod vector_store;

pub use embedding::{cosine_similarity, EmbeddingModel};
pub use error::EngineError;
pub use ingestion::{chunk_text, ChunkingConfig, SourceChunk};
pub use semantic_cache::{
    CacheBackend, CacheHitKind, CacheLookup, CacheRecord, CacheStats, CacheStatsSnapshot,
    CacheStatus, SemanticCacheConfig,
};
pub use vector_store::{RetrievalResult, VectorRecord, VectorStore};
