//! Semantic cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::EngineError;

/// Configuration for the semantic cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Backend to use: `memory` or `redis`
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Redis connection URL (used when the backend is `redis`)
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Namespace prefix for all cache keys
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Time-to-live for cached entries in seconds
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Maximum number of entries before oldest-first eviction
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Similarity threshold for semantic hits (0.0 to 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// How many of the most recently written entries a semantic lookup scans
    #[serde(default = "default_semantic_scan_limit")]
    pub semantic_scan_limit: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_namespace() -> String {
    "llmrecall".to_string()
}

fn default_ttl_seconds() -> u64 {
    3600
}

fn default_max_entries() -> usize {
    1000
}

fn default_similarity_threshold() -> f32 {
    0.92
}

fn default_semantic_scan_limit() -> usize {
    50
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            backend: default_backend(),
            redis_url: default_redis_url(),
            namespace: default_namespace(),
            ttl_seconds: default_ttl_seconds(),
            max_entries: default_max_entries(),
            similarity_threshold: default_similarity_threshold(),
            semantic_scan_limit: default_semantic_scan_limit(),
        }
    }
}

impl SemanticCacheConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get TTL as Duration, clamped to at least one second
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds.max(1))
    }

    /// Set whether caching is enabled
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the backend name
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    /// Set the redis URL
    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = url.into();
        self
    }

    /// Set the key namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_seconds = ttl.as_secs();
        self
    }

    /// Set the maximum number of entries
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Set the similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the semantic scan limit
    pub fn with_semantic_scan_limit(mut self, limit: usize) -> Self {
        self.semantic_scan_limit = limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.ttl_seconds == 0 {
            return Err(EngineError::configuration(
                "cache ttl_seconds must be greater than 0",
            ));
        }

        if self.max_entries == 0 {
            return Err(EngineError::configuration(
                "cache max_entries must be greater than 0",
            ));
        }

        if self.semantic_scan_limit == 0 {
            return Err(EngineError::configuration(
                "cache semantic_scan_limit must be greater than 0",
            ));
        }

        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(EngineError::configuration(
                "cache similarity_threshold must be between 0.0 and 1.0",
            ));
        }

        Ok(())
    }
}
