//! Engine configuration

mod app_config;

pub use app_config::{
    EmbeddingConfig, EngineConfig, LogFormat, LoggingConfig, RetrievalConfig, VectorStoreConfig,
};
