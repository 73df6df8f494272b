//! Cache backend implementations and selection

mod factory;
mod in_memory;
mod redis;

pub use factory::{connect_cache_backend, CacheBackendHandle, CacheBackendKind};
pub use in_memory::InMemoryCacheBackend;
pub use redis::RedisCacheBackend;
