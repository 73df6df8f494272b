//! Semantic cache domain models and traits
//!
//! Provides prompt/completion caching that serves exact matches by content
//! hash and semantically similar prompts by embedding similarity.

mod backend;
mod config;
mod record;
mod stats;

pub use backend::CacheBackend;
pub use config::SemanticCacheConfig;
pub use record::{exact_key, index_key, normalize_prompt, CacheHitKind, CacheLookup, CacheRecord};
pub use stats::{CacheStats, CacheStatsSnapshot, CacheStatus};
