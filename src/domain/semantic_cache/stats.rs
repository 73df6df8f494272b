//! Cache statistics counters and status reporting

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Process-wide cache counters.
///
/// Monotonically incrementing; reset only by restart.
#[derive(Debug, Default)]
pub struct CacheStats {
    requests: AtomicU64,
    exact_hits: AtomicU64,
    semantic_hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    invalidations: AtomicU64,
    errors: AtomicU64,
}

impl CacheStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_exact_hit(&self) {
        self.exact_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_semantic_hit(&self) {
        self.semantic_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters with the derived hit ratio
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let requests = self.requests.load(Ordering::Relaxed);
        let exact_hits = self.exact_hits.load(Ordering::Relaxed);
        let semantic_hits = self.semantic_hits.load(Ordering::Relaxed);

        let hit_ratio = if requests == 0 {
            0.0
        } else {
            let ratio = (exact_hits + semantic_hits) as f64 / requests as f64;
            (ratio * 10_000.0).round() / 10_000.0
        };

        CacheStatsSnapshot {
            requests,
            exact_hits,
            semantic_hits,
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            hit_ratio,
        }
    }
}

/// Point-in-time view of [`CacheStats`]
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsSnapshot {
    pub requests: u64,
    pub exact_hits: u64,
    pub semantic_hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub invalidations: u64,
    pub errors: u64,
    /// Hits over requests, rounded to four decimal places
    pub hit_ratio: f64,
}

/// Cache status surface consumed by callers
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub enabled: bool,
    pub configured_backend: String,
    pub active_backend: String,
    pub backend_connected: bool,
    pub ttl_seconds: u64,
    pub max_entries: usize,
    pub similarity_threshold: f32,
    pub semantic_scan_limit: usize,
    pub entry_count: usize,
    pub stats: CacheStatsSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let stats = CacheStats::new();

        stats.record_request();
        stats.record_request();
        stats.record_request();
        stats.record_exact_hit();
        stats.record_semantic_hit();
        stats.record_miss();
        stats.record_write();
        stats.record_invalidation();
        stats.record_error();

        let snapshot = stats.snapshot();

        assert_eq!(snapshot.requests, 3);
        assert_eq!(snapshot.exact_hits, 1);
        assert_eq!(snapshot.semantic_hits, 1);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.writes, 1);
        assert_eq!(snapshot.invalidations, 1);
        assert_eq!(snapshot.errors, 1);
    }

    #[test]
    fn test_hit_ratio_rounded() {
        let stats = CacheStats::new();

        stats.record_request();
        stats.record_request();
        stats.record_request();
        stats.record_exact_hit();

        let snapshot = stats.snapshot();

        assert!((snapshot.hit_ratio - 0.3333).abs() < 1e-9);
    }

    #[test]
    fn test_hit_ratio_no_requests() {
        let stats = CacheStats::new();

        assert_eq!(stats.snapshot().hit_ratio, 0.0);
    }
}
