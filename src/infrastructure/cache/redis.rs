//! Redis cache backend
//!
//! Records live under `<namespace>:cache:exact:<hash>` keys with a native
//! TTL; a companion sorted set `<namespace>:cache:index` scored by write
//! time supports "N most recent" scans and oldest-first eviction without
//! enumerating the keyspace.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::semantic_cache::index_key;
use crate::domain::{CacheBackend, CacheRecord, EngineError};

/// Configuration for the redis backend
#[derive(Debug, Clone)]
pub struct RedisBackendConfig {
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379")
    pub url: String,
    /// Namespace prefix shared with the cache service's key scheme
    pub namespace: String,
    /// Connection probe timeout
    pub connect_timeout: Duration,
}

impl RedisBackendConfig {
    /// Creates a new configuration
    pub fn new(url: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            namespace: namespace.into(),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Sets the connection probe timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Redis cache backend
#[derive(Clone)]
pub struct RedisCacheBackend {
    connection: ConnectionManager,
    namespace: String,
}

impl fmt::Debug for RedisCacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCacheBackend")
            .field("namespace", &self.namespace)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCacheBackend {
    /// Connect to redis and verify the connection with a PING.
    ///
    /// This is the one-shot probe the factory relies on; it is never
    /// retried after construction.
    pub async fn connect(config: RedisBackendConfig) -> Result<Self, EngineError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| EngineError::cache(format!("Failed to create redis client: {}", e)))?;

        let mut connection = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| EngineError::cache("Timed out connecting to redis"))?
            .map_err(|e| EngineError::cache(format!("Failed to connect to redis: {}", e)))?;

        let _: String = redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .map_err(|e| EngineError::cache(format!("Redis ping failed: {}", e)))?;

        Ok(Self {
            connection,
            namespace: config.namespace,
        })
    }

    fn index_key(&self) -> String {
        index_key(&self.namespace)
    }

    fn exact_pattern(&self) -> String {
        format!("{}:cache:exact:*", self.namespace)
    }
}

#[async_trait]
impl CacheBackend for RedisCacheBackend {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<CacheRecord>, EngineError> {
        let mut conn = self.connection.clone();

        let raw: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| EngineError::cache(format!("Failed to get key '{}': {}", key, e)))?;

        match raw {
            Some(payload) => {
                // Malformed payloads surface as a cache error; the service
                // counts them and reads the entry as absent.
                let record: CacheRecord = serde_json::from_str(&payload).map_err(|e| {
                    EngineError::cache(format!("Malformed cache payload for '{}': {}", key, e))
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, record: CacheRecord, ttl: Duration) -> Result<(), EngineError> {
        let mut conn = self.connection.clone();

        let payload = serde_json::to_string(&record)
            .map_err(|e| EngineError::cache(format!("Failed to serialize cache record: {}", e)))?;

        let ttl_secs = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(key, payload, ttl_secs)
            .await
            .map_err(|e| EngineError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        let _: () = conn
            .zadd(self.index_key(), key, record.created_at)
            .await
            .map_err(|e| EngineError::cache(format!("Failed to index key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn latest_keys(&self, limit: usize) -> Result<Vec<String>, EngineError> {
        let mut conn = self.connection.clone();

        let stop = limit.max(1) as isize - 1;
        let keys: Vec<String> = conn
            .zrevrange(self.index_key(), 0, stop)
            .await
            .map_err(|e| EngineError::cache(format!("Failed to read cache index: {}", e)))?;

        Ok(keys)
    }

    async fn remove(&self, key: &str) -> Result<bool, EngineError> {
        let mut conn = self.connection.clone();

        let deleted: i32 = conn
            .del(key)
            .await
            .map_err(|e| EngineError::cache(format!("Failed to delete key '{}': {}", key, e)))?;

        let _: i32 = conn
            .zrem(self.index_key(), key)
            .await
            .map_err(|e| EngineError::cache(format!("Failed to unindex key '{}': {}", key, e)))?;

        Ok(deleted > 0)
    }

    async fn trim_to(&self, max_entries: usize) -> Result<usize, EngineError> {
        let mut conn = self.connection.clone();
        let index = self.index_key();

        let current: usize = conn
            .zcard(&index)
            .await
            .map_err(|e| EngineError::cache(format!("Failed to size cache index: {}", e)))?;

        let max_entries = max_entries.max(1);
        if current <= max_entries {
            return Ok(0);
        }

        let over_by = current - max_entries;
        let oldest: Vec<String> = conn
            .zrange(&index, 0, over_by as isize - 1)
            .await
            .map_err(|e| EngineError::cache(format!("Failed to read cache index: {}", e)))?;

        // An expired value may already be gone; removing still drops the
        // index entry, which is what the count tracks.
        for key in &oldest {
            self.remove(key).await?;
        }

        Ok(oldest.len())
    }

    async fn clear(&self) -> Result<usize, EngineError> {
        let mut conn = self.connection.clone();
        let pattern = self.exact_pattern();

        let mut cursor = 0u64;
        let mut removed = 0usize;

        loop {
            let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| EngineError::cache(format!("Failed to scan cache keys: {}", e)))?;

            if !keys.is_empty() {
                let deleted: i32 = conn
                    .del(&keys)
                    .await
                    .map_err(|e| EngineError::cache(format!("Failed to delete keys: {}", e)))?;
                removed += deleted as usize;
            }

            cursor = new_cursor;

            if cursor == 0 {
                break;
            }
        }

        let _: i32 = conn
            .del(self.index_key())
            .await
            .map_err(|e| EngineError::cache(format!("Failed to delete cache index: {}", e)))?;

        Ok(removed)
    }

    async fn len(&self) -> Result<usize, EngineError> {
        let mut conn = self.connection.clone();

        let count: usize = conn
            .zcard(self.index_key())
            .await
            .map_err(|e| EngineError::cache(format!("Failed to size cache index: {}", e)))?;

        Ok(count)
    }
}
