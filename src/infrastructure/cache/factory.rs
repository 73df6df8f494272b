//! Cache backend selection
//!
//! The backend is chosen exactly once, at construction time. A configured
//! external backend that fails its connection probe falls back to the
//! in-process backend for the remainder of the process lifetime and is
//! never re-probed.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{CacheBackend, EngineError, SemanticCacheConfig};

use super::in_memory::InMemoryCacheBackend;
use super::redis::{RedisBackendConfig, RedisCacheBackend};

/// Supported cache backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackendKind {
    /// In-process store
    #[default]
    Memory,
    /// External redis store
    Redis,
}

impl std::fmt::Display for CacheBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendKind::Memory => write!(f, "memory"),
            CacheBackendKind::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for CacheBackendKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in_memory" | "inmemory" => Ok(CacheBackendKind::Memory),
            "redis" | "external" => Ok(CacheBackendKind::Redis),
            _ => Err(EngineError::configuration(format!(
                "Unknown cache backend: {}. Valid backends: memory, redis",
                s
            ))),
        }
    }
}

/// Result of backend selection, recording what was configured and what is
/// actually serving requests
#[derive(Debug, Clone)]
pub struct CacheBackendHandle {
    /// The selected backend
    pub backend: Arc<dyn CacheBackend>,
    /// What the configuration asked for
    pub configured: CacheBackendKind,
    /// What is actually in use
    pub active: CacheBackendKind,
    /// Whether the external backend is connected
    pub connected: bool,
    /// Whether a configured external backend failed its probe
    pub probe_failed: bool,
}

/// Select and construct the cache backend from configuration.
///
/// An unknown backend name is a fatal configuration error; an unreachable
/// external backend is not, and degrades to the in-process store.
pub async fn connect_cache_backend(
    config: &SemanticCacheConfig,
) -> Result<CacheBackendHandle, EngineError> {
    let configured: CacheBackendKind = config.backend.parse()?;

    match configured {
        CacheBackendKind::Memory => Ok(CacheBackendHandle {
            backend: Arc::new(InMemoryCacheBackend::new()),
            configured,
            active: CacheBackendKind::Memory,
            connected: false,
            probe_failed: false,
        }),
        CacheBackendKind::Redis => {
            let redis_config =
                RedisBackendConfig::new(config.redis_url.clone(), config.namespace.clone());

            match RedisCacheBackend::connect(redis_config).await {
                Ok(backend) => {
                    info!(url = %config.redis_url, "semantic cache using redis backend");

                    Ok(CacheBackendHandle {
                        backend: Arc::new(backend),
                        configured,
                        active: CacheBackendKind::Redis,
                        connected: true,
                        probe_failed: false,
                    })
                }
                Err(e) => {
                    warn!(
                        url = %config.redis_url,
                        "redis unreachable, semantic cache falling back to memory backend: {}",
                        e
                    );

                    Ok(CacheBackendHandle {
                        backend: Arc::new(InMemoryCacheBackend::new()),
                        configured,
                        active: CacheBackendKind::Memory,
                        connected: false,
                        probe_failed: true,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!(
            "memory".parse::<CacheBackendKind>().unwrap(),
            CacheBackendKind::Memory
        );
        assert_eq!(
            "in_memory".parse::<CacheBackendKind>().unwrap(),
            CacheBackendKind::Memory
        );
        assert_eq!(
            "redis".parse::<CacheBackendKind>().unwrap(),
            CacheBackendKind::Redis
        );
        assert_eq!(
            "REDIS".parse::<CacheBackendKind>().unwrap(),
            CacheBackendKind::Redis
        );
        assert_eq!(
            "external".parse::<CacheBackendKind>().unwrap(),
            CacheBackendKind::Redis
        );
    }

    #[test]
    fn test_backend_kind_from_str_invalid() {
        assert!("memcached".parse::<CacheBackendKind>().is_err());
    }

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(CacheBackendKind::Memory.to_string(), "memory");
        assert_eq!(CacheBackendKind::Redis.to_string(), "redis");
    }

    #[tokio::test]
    async fn test_memory_backend_selected() {
        let config = SemanticCacheConfig::new().with_backend("memory");

        let handle = connect_cache_backend(&config).await.unwrap();

        assert_eq!(handle.configured, CacheBackendKind::Memory);
        assert_eq!(handle.active, CacheBackendKind::Memory);
        assert!(!handle.connected);
        assert!(!handle.probe_failed);
        assert_eq!(handle.backend.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_unknown_backend_rejected() {
        let config = SemanticCacheConfig::new().with_backend("memcached");

        assert!(connect_cache_backend(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_redis_falls_back_to_memory() {
        // Nothing listens on this port; the probe must fail fast and
        // degrade instead of erroring.
        let config = SemanticCacheConfig::new()
            .with_backend("redis")
            .with_redis_url("redis://127.0.0.1:1");

        let handle = connect_cache_backend(&config).await.unwrap();

        assert_eq!(handle.configured, CacheBackendKind::Redis);
        assert_eq!(handle.active, CacheBackendKind::Memory);
        assert!(!handle.connected);
        assert!(handle.probe_failed);
    }
}
