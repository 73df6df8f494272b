use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{ChunkingConfig, EngineError, SemanticCacheConfig};

/// Engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub embedding: EmbeddingConfig,
    pub vector_store: VectorStoreConfig,
    pub cache: SemanticCacheConfig,
    pub retrieval: RetrievalConfig,
    pub logging: LoggingConfig,
}

/// Embedding model selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Model name; unrecognized values fall back to the default hashing model
    pub model: String,
    /// Output vector dimension
    pub dimension: usize,
}

/// Vector store persistence
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// Snapshot path
    pub path: PathBuf,
}

/// Retrieval and indexing settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Directory scanned for indexable documents
    pub data_dir: PathBuf,
    /// Chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
    /// Default number of results per query
    pub default_top_k: usize,
    /// Default context window length bound in characters
    pub max_context_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "hashing-embed-v1".to_string(),
            dimension: 256,
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/vector_store.json"),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/docs"),
            chunk_size: 800,
            chunk_overlap: 100,
            default_top_k: 4,
            max_context_chars: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl RetrievalConfig {
    /// Chunking settings for the indexing pipeline
    pub fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig::new(self.chunk_size, self.chunk_overlap)
    }
}

impl EngineConfig {
    /// Load configuration from layered files and environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("LLM_RECALL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Validate cross-field constraints that are fatal at startup
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.embedding.dimension == 0 {
            return Err(EngineError::configuration(
                "embedding dimension must be greater than 0",
            ));
        }

        self.cache.validate()?;
        self.retrieval.chunking().validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();

        assert_eq!(config.embedding.model, "hashing-embed-v1");
        assert_eq!(config.embedding.dimension, 256);
        assert_eq!(config.vector_store.path, PathBuf::from("data/vector_store.json"));
        assert_eq!(config.retrieval.default_top_k, 4);
        assert_eq!(config.retrieval.max_context_chars, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_dimension() {
        let mut config = EngineConfig::default();
        config.embedding.dimension = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_cache_settings() {
        let mut config = EngineConfig::default();
        config.cache.max_entries = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chunking_settings_derived() {
        let config = RetrievalConfig::default();
        let chunking = config.chunking();

        assert_eq!(chunking.chunk_size, 800);
        assert_eq!(chunking.chunk_overlap, 100);
    }
}
