//! Semantic prompt/completion cache service
//!
//! Serves exact hits by content hash of the normalized prompt and semantic
//! hits by embedding similarity over a bounded window of the most recently
//! written records. Backend failures degrade to "as if the cache were
//! empty"; they never fail the surrounding request.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::semantic_cache::exact_key;
use crate::domain::{
    cosine_similarity, CacheBackend, CacheLookup, CacheRecord, CacheStats, CacheStatsSnapshot,
    CacheStatus, EmbeddingModel, EngineError, SemanticCacheConfig,
};
use crate::infrastructure::cache::{CacheBackendHandle, CacheBackendKind};

/// Exact + semantic cache over a pluggable backend
#[derive(Debug)]
pub struct SemanticCacheService {
    backend: Arc<dyn CacheBackend>,
    embedding_model: Arc<dyn EmbeddingModel>,
    config: SemanticCacheConfig,
    stats: CacheStats,
    configured_backend: CacheBackendKind,
    active_backend: CacheBackendKind,
    backend_connected: bool,
}

impl SemanticCacheService {
    /// Create a new cache service over a selected backend.
    ///
    /// A failed external-backend probe is counted as one error; the
    /// fallback backend then serves for the process lifetime.
    pub fn new(
        handle: CacheBackendHandle,
        embedding_model: Arc<dyn EmbeddingModel>,
        config: SemanticCacheConfig,
    ) -> Self {
        let stats = CacheStats::new();
        if handle.probe_failed {
            stats.record_error();
        }

        Self {
            backend: handle.backend,
            embedding_model,
            config,
            stats,
            configured_backend: handle.configured,
            active_backend: handle.active,
            backend_connected: handle.connected,
        }
    }

    /// Whether caching is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Get the configuration
    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    /// Point-in-time counters
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// Classify a prompt as exact hit, semantic hit, or miss.
    ///
    /// The exact path is checked first and unconditionally; the semantic
    /// scan runs only when `allow_semantic` is set and covers at most the
    /// configured number of most recently written records.
    pub async fn lookup(&self, prompt: &str, allow_semantic: bool) -> CacheLookup {
        if !self.config.enabled {
            return CacheLookup::miss();
        }

        self.stats.record_request();

        let key = exact_key(&self.config.namespace, prompt);
        if let Some(record) = self.read_record(&key).await {
            if !record.output.is_empty() {
                self.stats.record_exact_hit();
                debug!("exact cache hit");
                return CacheLookup::exact(record.output);
            }
        }

        if !allow_semantic {
            self.stats.record_miss();
            return CacheLookup::miss();
        }

        // Embedding runs without any backend lock held.
        let query_embedding = self.embedding_model.embed(prompt);
        let threshold = self.config.similarity_threshold;

        let keys = match self
            .backend
            .latest_keys(self.config.semantic_scan_limit.max(1))
            .await
        {
            Ok(keys) => keys,
            Err(e) => {
                warn!("cache index scan failed: {}", e);
                self.stats.record_error();
                Vec::new()
            }
        };

        let mut best_output: Option<String> = None;
        let mut best_score = -1.0f32;

        for key in keys {
            let Some(record) = self.read_record(&key).await else {
                continue;
            };

            if record.embedding.is_empty() || record.output.is_empty() {
                continue;
            }

            let score = cosine_similarity(&query_embedding, &record.embedding);

            // Strict `>` keeps the first-seen (most recent) candidate among
            // exactly equal top scores.
            if score >= threshold && score > best_score {
                best_score = score;
                best_output = Some(record.output);
            }
        }

        match best_output {
            Some(output) => {
                self.stats.record_semantic_hit();
                debug!(score = best_score, "semantic cache hit");
                CacheLookup::semantic(output)
            }
            None => {
                self.stats.record_miss();
                CacheLookup::miss()
            }
        }
    }

    /// Write a prompt/completion pair and trigger capacity eviction.
    ///
    /// Failures are counted and swallowed: a failed cache write must not
    /// fail the request that produced the completion.
    pub async fn store(&self, prompt: &str, output: &str) {
        if !self.config.enabled {
            return;
        }

        let embedding = self.embedding_model.embed(prompt);
        let record = CacheRecord::new(prompt, output, embedding, self.config.ttl());
        let key = exact_key(&self.config.namespace, prompt);

        if let Err(e) = self.write_record(&key, record).await {
            warn!("cache write failed: {}", e);
            self.stats.record_error();
            return;
        }

        self.stats.record_write();
    }

    /// Delete all records; returns how many were removed
    pub async fn clear(&self) -> Result<usize, EngineError> {
        let removed = self.backend.clear().await?;
        self.stats.record_invalidation();
        Ok(removed)
    }

    /// Full status surface for observability
    pub async fn status(&self) -> CacheStatus {
        let entry_count = match self.backend.len().await {
            Ok(count) => count,
            Err(e) => {
                warn!("cache size probe failed: {}", e);
                self.stats.record_error();
                0
            }
        };

        CacheStatus {
            enabled: self.config.enabled,
            configured_backend: self.configured_backend.to_string(),
            active_backend: self.active_backend.to_string(),
            backend_connected: self.backend_connected,
            ttl_seconds: self.config.ttl_seconds,
            max_entries: self.config.max_entries,
            similarity_threshold: self.config.similarity_threshold,
            semantic_scan_limit: self.config.semantic_scan_limit,
            entry_count,
            stats: self.stats.snapshot(),
        }
    }

    async fn read_record(&self, key: &str) -> Option<CacheRecord> {
        match self.backend.get(key).await {
            Ok(record) => record,
            Err(e) => {
                warn!("cache read failed: {}", e);
                self.stats.record_error();
                None
            }
        }
    }

    async fn write_record(&self, key: &str, record: CacheRecord) -> Result<(), EngineError> {
        self.backend.put(key, record, self.config.ttl()).await?;
        self.backend
            .trim_to(self.config.max_entries.max(1))
            .await?;
        Ok(())
    }
}
