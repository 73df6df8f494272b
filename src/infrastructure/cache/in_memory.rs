//! In-process cache backend
//!
//! Keeps records in a map plus an explicit insertion-order list so "N most
//! recent" scans and oldest-first eviction work without timestamps having
//! to be distinct. Also serves as the degraded-mode fallback when the
//! external backend is unreachable.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{CacheBackend, CacheRecord, EngineError};

#[derive(Debug, Default)]
struct MemoryState {
    items: HashMap<String, CacheRecord>,
    /// Keys in write order, oldest first; a re-put keeps its original slot
    order: Vec<String>,
}

/// In-memory cache backend
#[derive(Debug, Default)]
pub struct InMemoryCacheBackend {
    state: Mutex<MemoryState>,
}

impl InMemoryCacheBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_error(e: impl std::fmt::Display) -> EngineError {
        EngineError::internal(format!("Failed to acquire cache lock: {}", e))
    }
}

#[async_trait]
impl CacheBackend for InMemoryCacheBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<CacheRecord>, EngineError> {
        let mut state = self.state.lock().map_err(Self::lock_error)?;

        let expired = match state.items.get(key) {
            Some(record) => record.is_expired(),
            None => return Ok(None),
        };

        if expired {
            state.items.remove(key);
            state.order.retain(|k| k != key);
            return Ok(None);
        }

        Ok(state.items.get(key).cloned())
    }

    async fn put(
        &self,
        key: &str,
        record: CacheRecord,
        _ttl: Duration,
    ) -> Result<(), EngineError> {
        let mut state = self.state.lock().map_err(Self::lock_error)?;

        if !state.items.contains_key(key) {
            state.order.push(key.to_string());
        }
        state.items.insert(key.to_string(), record);

        Ok(())
    }

    async fn latest_keys(&self, limit: usize) -> Result<Vec<String>, EngineError> {
        let state = self.state.lock().map_err(Self::lock_error)?;

        let live: Vec<&String> = state
            .order
            .iter()
            .filter(|k| state.items.contains_key(*k))
            .collect();

        let take = limit.max(1).min(live.len());
        Ok(live[live.len() - take..]
            .iter()
            .rev()
            .map(|k| (*k).clone())
            .collect())
    }

    async fn remove(&self, key: &str) -> Result<bool, EngineError> {
        let mut state = self.state.lock().map_err(Self::lock_error)?;

        let removed = state.items.remove(key).is_some();
        state.order.retain(|k| k != key);

        Ok(removed)
    }

    async fn trim_to(&self, max_entries: usize) -> Result<usize, EngineError> {
        let mut state = self.state.lock().map_err(Self::lock_error)?;

        let max_entries = max_entries.max(1);
        if state.items.len() <= max_entries {
            return Ok(0);
        }

        let over_by = state.items.len() - max_entries;
        let oldest: Vec<String> = state
            .order
            .iter()
            .filter(|k| state.items.contains_key(*k))
            .take(over_by)
            .cloned()
            .collect();

        for key in &oldest {
            state.items.remove(key);
            state.order.retain(|k| k != key);
        }

        Ok(oldest.len())
    }

    async fn clear(&self) -> Result<usize, EngineError> {
        let mut state = self.state.lock().map_err(Self::lock_error)?;

        let count = state.items.len();
        state.items.clear();
        state.order.clear();

        Ok(count)
    }

    async fn len(&self) -> Result<usize, EngineError> {
        let state = self.state.lock().map_err(Self::lock_error)?;
        Ok(state.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prompt: &str, ttl_secs: u64) -> CacheRecord {
        CacheRecord::new(
            prompt,
            format!("output for {}", prompt),
            vec![0.1, 0.2],
            Duration::from_secs(ttl_secs),
        )
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let backend = InMemoryCacheBackend::new();

        backend
            .put("k1", record("p1", 60), Duration::from_secs(60))
            .await
            .unwrap();

        let found = backend.get("k1").await.unwrap();
        assert_eq!(found.unwrap().prompt, "p1");

        assert!(backend.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_record_deleted_lazily() {
        let backend = InMemoryCacheBackend::new();

        let mut expired = record("p1", 60);
        expired.expires_at = 0.0;
        backend
            .put("k1", expired, Duration::from_secs(60))
            .await
            .unwrap();

        assert!(backend.get("k1").await.unwrap().is_none());
        assert_eq!(backend.len().await.unwrap(), 0);
        assert!(backend.latest_keys(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_latest_keys_newest_first() {
        let backend = InMemoryCacheBackend::new();

        for i in 0..4 {
            backend
                .put(
                    &format!("k{}", i),
                    record(&format!("p{}", i), 60),
                    Duration::from_secs(60),
                )
                .await
                .unwrap();
        }

        let latest = backend.latest_keys(2).await.unwrap();
        assert_eq!(latest, vec!["k3".to_string(), "k2".to_string()]);

        let all = backend.latest_keys(10).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], "k3");
        assert_eq!(all[3], "k0");
    }

    #[tokio::test]
    async fn test_reput_keeps_original_order_slot() {
        let backend = InMemoryCacheBackend::new();

        backend
            .put("k0", record("p0", 60), Duration::from_secs(60))
            .await
            .unwrap();
        backend
            .put("k1", record("p1", 60), Duration::from_secs(60))
            .await
            .unwrap();
        backend
            .put("k0", record("p0 again", 60), Duration::from_secs(60))
            .await
            .unwrap();

        let latest = backend.latest_keys(10).await.unwrap();
        assert_eq!(latest, vec!["k1".to_string(), "k0".to_string()]);
        assert_eq!(backend.get("k0").await.unwrap().unwrap().prompt, "p0 again");
    }

    #[tokio::test]
    async fn test_trim_to_evicts_oldest() {
        let backend = InMemoryCacheBackend::new();

        for i in 0..5 {
            backend
                .put(
                    &format!("k{}", i),
                    record(&format!("p{}", i), 60),
                    Duration::from_secs(60),
                )
                .await
                .unwrap();
        }

        let evicted = backend.trim_to(3).await.unwrap();

        assert_eq!(evicted, 2);
        assert_eq!(backend.len().await.unwrap(), 3);
        assert!(backend.get("k0").await.unwrap().is_none());
        assert!(backend.get("k1").await.unwrap().is_none());
        assert!(backend.get("k2").await.unwrap().is_some());
        assert!(backend.get("k4").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_trim_to_under_capacity_is_noop() {
        let backend = InMemoryCacheBackend::new();

        backend
            .put("k0", record("p0", 60), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(backend.trim_to(3).await.unwrap(), 0);
        assert_eq!(backend.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let backend = InMemoryCacheBackend::new();

        backend
            .put("k0", record("p0", 60), Duration::from_secs(60))
            .await
            .unwrap();
        backend
            .put("k1", record("p1", 60), Duration::from_secs(60))
            .await
            .unwrap();

        assert!(backend.remove("k0").await.unwrap());
        assert!(!backend.remove("k0").await.unwrap());

        assert_eq!(backend.clear().await.unwrap(), 1);
        assert_eq!(backend.len().await.unwrap(), 0);
    }
}
