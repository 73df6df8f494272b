//! Chunking configuration and text windowing

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::EngineError;

/// Configuration for chunking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    /// Create a new chunking configuration
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.chunk_size == 0 {
            return Err(EngineError::configuration(
                "chunk_size must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            chunk_overlap: 100,
        }
    }
}

/// A bounded slice of a source document, the unit of indexing and retrieval
#[derive(Debug, Clone)]
pub struct SourceChunk {
    /// Stable content-derived identifier
    pub id: String,
    /// The chunk text
    pub text: String,
    /// Source path, chunk index, and any other opaque metadata
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Split text into fixed-size windows with overlap.
///
/// Whitespace is normalized first; an overlap at or above the chunk size is
/// clamped to a quarter of it so the window always advances.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let clean = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.is_empty() {
        return Vec::new();
    }

    let chunk_size = config.chunk_size.max(1);
    let mut overlap = config.chunk_overlap;
    if overlap >= chunk_size {
        overlap = chunk_size / 4;
    }

    let chars: Vec<char> = clean.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());

        if end == chars.len() {
            break;
        }

        start = end.saturating_sub(overlap);
    }

    chunks
}
