//! Vector store implementations

mod json;

pub use json::JsonVectorStore;
