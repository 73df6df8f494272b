//! Source document collection and chunk building

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::warn;
use walkdir::WalkDir;

use crate::domain::{chunk_text, ChunkingConfig, SourceChunk};

const SUPPORTED_EXTENSIONS: [&str; 4] = ["txt", "md", "rst", "py"];

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collect supported document paths under a directory, sorted.
///
/// A missing directory yields an empty list.
pub fn collect_documents(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported(path))
        .collect();

    paths.sort();
    paths
}

/// Build indexable chunks from every supported document under a directory.
///
/// Chunk ids are content hashes of path, index, and text, so re-ingesting
/// unchanged documents upserts the same records. Unreadable files are
/// skipped with a warning.
pub fn build_chunks(root: &Path, config: &ChunkingConfig) -> Vec<SourceChunk> {
    let mut chunks = Vec::new();

    for path in collect_documents(root) {
        let text = match std::fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(path = %path.display(), "skipping unreadable document: {}", e);
                continue;
            }
        };

        for (index, chunk) in chunk_text(&text, config).into_iter().enumerate() {
            let raw_id = format!("{}::{}::{}", path.display(), index, chunk);
            let id = hex::encode(Sha256::digest(raw_id.as_bytes()));

            let metadata = HashMap::from([
                (
                    "source_path".to_string(),
                    serde_json::json!(path.display().to_string()),
                ),
                ("chunk_index".to_string(), serde_json::json!(index)),
            ]);

            chunks.push(SourceChunk {
                id,
                text: chunk,
                metadata,
            });
        }
    }

    chunks
}
