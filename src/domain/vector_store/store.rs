//! Vector store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use super::{RetrievalResult, VectorRecord};
use crate::domain::EngineError;

/// Trait for durable vector collections searchable by cosine similarity.
///
/// The search contract is intentionally exact and linear in corpus size;
/// callers requiring scale should shard or replace the implementation
/// without touching this contract.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Insert or replace records by id.
    ///
    /// The store's dimension is fixed by the first record ever applied;
    /// a batch containing any mismatched embedding is refused whole and
    /// leaves the store untouched.
    async fn upsert_many(&self, records: Vec<VectorRecord>) -> Result<(), EngineError>;

    /// Score every stored record against the query and return at most
    /// `top_k` (minimum 1) results, best first. Ties keep insertion order.
    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalResult>, EngineError>;

    /// Remove all records and forget the learned dimension
    async fn clear(&self) -> Result<(), EngineError>;

    /// Persist a snapshot of the store
    async fn save(&self) -> Result<(), EngineError>;

    /// Load the persisted snapshot; a missing snapshot is a no-op
    async fn load(&self) -> Result<(), EngineError>;

    /// Number of stored records
    async fn len(&self) -> Result<usize, EngineError>;

    /// The learned embedding dimension, if any record has been applied
    async fn dimension(&self) -> Result<Option<usize>, EngineError>;
}
