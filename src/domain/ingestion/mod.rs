//! Document chunking types for indexing

mod chunker;

pub use chunker::{chunk_text, ChunkingConfig, SourceChunk};
