//! Infrastructure layer - Concrete implementations

pub mod cache;
pub mod embedding;
pub mod ingestion;
pub mod logging;
pub mod services;
pub mod vector_store;
