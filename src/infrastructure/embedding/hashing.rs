//! Hashing embedding model
//!
//! Deterministic text-to-vector embedding with no external service
//! dependency: tokens are hashed into buckets of a fixed-dimension vector
//! with a hash-derived sign, then the vector is L2-normalized.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::config::EmbeddingConfig;
use crate::domain::{EmbeddingModel, EngineError};

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9_]+").expect("valid token pattern"));

/// Name of the hashing embedding model
pub const HASHING_MODEL_NAME: &str = "hashing-embed-v1";

/// Embedding model that hashes tokens into vector buckets
#[derive(Debug)]
pub struct HashingEmbeddingModel {
    dimension: usize,
}

impl HashingEmbeddingModel {
    /// Create a new model with the given output dimension.
    ///
    /// A zero dimension is a fatal configuration error.
    pub fn new(dimension: usize) -> Result<Self, EngineError> {
        if dimension == 0 {
            return Err(EngineError::configuration(
                "embedding dimension must be greater than 0",
            ));
        }

        Ok(Self { dimension })
    }
}

impl EmbeddingModel for HashingEmbeddingModel {
    fn model_name(&self) -> &'static str {
        HASHING_MODEL_NAME
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();

        let mut has_tokens = false;
        for token in TOKEN_PATTERN.find_iter(&lowered) {
            has_tokens = true;

            let digest = Sha256::digest(token.as_str().as_bytes());
            let bucket = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]) as usize
                % self.dimension;
            let sign = if digest[4] % 2 == 0 { 1.0 } else { -1.0 };

            vector[bucket] += sign;
        }

        // No tokens: the zero vector is returned unmodified, and cosine
        // similarity against it is defined as exactly 0.
        if !has_tokens {
            return vector;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm == 0.0 {
            return vector;
        }

        vector.iter().map(|x| x / norm).collect()
    }
}

/// Build the configured embedding model.
///
/// Unrecognized model names fall back to the hashing model instead of
/// failing startup; an invalid dimension still aborts.
pub fn build_embedding_model(
    config: &EmbeddingConfig,
) -> Result<Arc<dyn EmbeddingModel>, EngineError> {
    if !config.model.eq_ignore_ascii_case(HASHING_MODEL_NAME) {
        warn!(
            model = %config.model,
            "unsupported embedding model configured, falling back to {}",
            HASHING_MODEL_NAME
        );
    }

    Ok(Arc::new(HashingEmbeddingModel::new(config.dimension)?))
}
