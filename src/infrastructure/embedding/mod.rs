//! Embedding model implementations

mod hashing;

pub use hashing::{build_embedding_model, HashingEmbeddingModel};
