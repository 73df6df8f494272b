//! Cache backend trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use super::CacheRecord;
use crate::domain::EngineError;

/// Storage strategy behind the semantic cache.
///
/// Implementations own the record payloads plus a write-time-ordered
/// secondary index supporting "N most recent" scans and oldest-first
/// eviction. Keys are opaque to the backend; the service builds them.
#[async_trait]
pub trait CacheBackend: Send + Sync + Debug {
    /// Get the backend name
    fn backend_name(&self) -> &'static str;

    /// Read a record; an expired record reads as absent and is deleted lazily
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>, EngineError>;

    /// Write a record under `key` with the given TTL and index it by its
    /// write time
    async fn put(&self, key: &str, record: CacheRecord, ttl: Duration) -> Result<(), EngineError>;

    /// Keys of the most recently written records, newest first, at most
    /// `limit`
    async fn latest_keys(&self, limit: usize) -> Result<Vec<String>, EngineError>;

    /// Remove a single record; returns whether it existed
    async fn remove(&self, key: &str) -> Result<bool, EngineError>;

    /// Evict oldest-by-write-time records until at most `max_entries`
    /// remain; returns how many were evicted
    async fn trim_to(&self, max_entries: usize) -> Result<usize, EngineError>;

    /// Remove every record; returns how many were removed
    async fn clear(&self) -> Result<usize, EngineError>;

    /// Number of live entries
    async fn len(&self) -> Result<usize, EngineError>;
}
