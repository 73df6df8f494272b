//! LLM Recall
//!
//! Embedding-based retrieval and semantic caching engine for LLM
//! applications, with support for:
//! - Deterministic text embeddings with no external service dependency
//! - Exact cosine-similarity retrieval over a persisted vector store
//! - Exact + semantic prompt caching with TTL and bounded-size eviction
//! - Pluggable cache backends (redis or in-process) with transparent
//!   degraded-mode fallback

pub mod config;
pub mod domain;
pub mod engine;
pub mod infrastructure;

pub use config::EngineConfig;
pub use domain::{
    cosine_similarity, CacheHitKind, CacheLookup, CacheRecord, CacheStats, CacheStatsSnapshot,
    CacheStatus, EmbeddingModel, EngineError, RetrievalResult, SemanticCacheConfig, SourceChunk,
    VectorRecord, VectorStore,
};
pub use engine::Engine;
pub use infrastructure::logging::init_tracing;
pub use infrastructure::services::{IndexStats, Retriever, SemanticCacheService};
