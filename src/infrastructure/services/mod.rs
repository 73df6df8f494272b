//! Engine services

mod retriever;
mod semantic_cache_service;

pub use retriever::{IndexStats, Retriever};
pub use semantic_cache_service::SemanticCacheService;
