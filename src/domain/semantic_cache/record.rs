//! Cache record and lookup types

use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A cached prompt/completion pair with its prompt embedding.
///
/// Keyed by a content hash of the normalized prompt for exact lookup and
/// discoverable through a recency-ordered secondary index for semantic scans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    /// The original prompt text
    pub prompt: String,
    /// The cached completion
    pub output: String,
    /// Embedding of the prompt, used for semantic matching
    pub embedding: Vec<f32>,
    /// Unix timestamp (seconds) when this record was written
    pub created_at: f64,
    /// Unix timestamp (seconds) after which this record is expired
    pub expires_at: f64,
}

impl CacheRecord {
    /// Create a new record expiring `ttl` from now
    pub fn new(
        prompt: impl Into<String>,
        output: impl Into<String>,
        embedding: Vec<f32>,
        ttl: Duration,
    ) -> Self {
        let now = unix_now();

        Self {
            prompt: prompt.into(),
            output: output.into(),
            embedding,
            created_at: now,
            expires_at: now + ttl.as_secs_f64().max(1.0),
        }
    }

    /// Check if the record is past its expiry
    pub fn is_expired(&self) -> bool {
        unix_now() >= self.expires_at
    }
}

/// Outcome classification of a single cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheHitKind {
    Exact,
    Semantic,
    Miss,
}

impl std::fmt::Display for CacheHitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheHitKind::Exact => write!(f, "exact"),
            CacheHitKind::Semantic => write!(f, "semantic"),
            CacheHitKind::Miss => write!(f, "miss"),
        }
    }
}

/// Result of a cache lookup
#[derive(Debug, Clone, Serialize)]
pub struct CacheLookup {
    /// Whether the lookup hit
    pub hit: bool,
    /// The cached completion, when hit
    pub output: Option<String>,
    /// How the lookup resolved
    pub hit_type: CacheHitKind,
}

impl CacheLookup {
    /// An exact-match hit
    pub fn exact(output: impl Into<String>) -> Self {
        Self {
            hit: true,
            output: Some(output.into()),
            hit_type: CacheHitKind::Exact,
        }
    }

    /// A similarity-match hit
    pub fn semantic(output: impl Into<String>) -> Self {
        Self {
            hit: true,
            output: Some(output.into()),
            hit_type: CacheHitKind::Semantic,
        }
    }

    /// A miss
    pub fn miss() -> Self {
        Self {
            hit: false,
            output: None,
            hit_type: CacheHitKind::Miss,
        }
    }
}

/// Normalize a prompt for exact-key hashing: trimmed and lowercased, so
/// case- and whitespace-variant prompts share one exact key.
pub fn normalize_prompt(prompt: &str) -> String {
    prompt.trim().to_lowercase()
}

/// Exact-lookup key for a prompt under a namespace
pub fn exact_key(namespace: &str, prompt: &str) -> String {
    let digest = Sha256::digest(normalize_prompt(prompt).as_bytes());
    format!("{}:cache:exact:{}", namespace, hex::encode(digest))
}

/// Key of the recency-ordered secondary index for a namespace
pub fn index_key(namespace: &str) -> String {
    format!("{}:cache:index", namespace)
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_expiry_window() {
        let record = CacheRecord::new("prompt", "output", vec![0.1], Duration::from_secs(60));

        assert!(!record.is_expired());
        assert!(record.expires_at > record.created_at);
        assert!((record.expires_at - record.created_at - 60.0).abs() < 0.001);
    }

    #[test]
    fn test_record_zero_ttl_clamped() {
        let record = CacheRecord::new("prompt", "output", vec![0.1], Duration::from_secs(0));

        assert!((record.expires_at - record.created_at - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_prompt() {
        assert_eq!(normalize_prompt("  What Is 2+2  "), "what is 2+2");
        assert_eq!(normalize_prompt("what is 2+2"), "what is 2+2");
    }

    #[test]
    fn test_exact_key_ignores_case_and_whitespace() {
        let a = exact_key("ns", "what is 2+2");
        let b = exact_key("ns", "What Is 2+2  ");
        let c = exact_key("ns", "what is 3+3");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("ns:cache:exact:"));
    }

    #[test]
    fn test_index_key() {
        assert_eq!(index_key("ns"), "ns:cache:index");
    }

    #[test]
    fn test_lookup_constructors() {
        let exact = CacheLookup::exact("4");
        assert!(exact.hit);
        assert_eq!(exact.output.as_deref(), Some("4"));
        assert_eq!(exact.hit_type, CacheHitKind::Exact);

        let miss = CacheLookup::miss();
        assert!(!miss.hit);
        assert!(miss.output.is_none());
        assert_eq!(miss.hit_type, CacheHitKind::Miss);
    }

    #[test]
    fn test_hit_kind_display() {
        assert_eq!(CacheHitKind::Exact.to_string(), "exact");
        assert_eq!(CacheHitKind::Semantic.to_string(), "semantic");
        assert_eq!(CacheHitKind::Miss.to_string(), "miss");
    }
}
