//! Document collection and chunk building

mod loader;

pub use loader::{build_chunks, collect_documents};
