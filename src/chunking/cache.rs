//! Chunk cache: persists chunks so later runs reuse the same boundaries.

use super::Chunk;
use crate::error::{ReciteError, Result};
use crate::store::{ArtifactKey, ArtifactKind, ArtifactStore};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Saves and reloads the chunks of a document through an artifact store.
pub struct ChunkCache {
    store: Arc<dyn ArtifactStore>,
}

impl ChunkCache {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    /// Write every chunk as `<stem>_chunk_<n>.txt`. Any write failure is returned.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn save(&self, stem: &str, chunks: &[Chunk]) -> Result<()> {
        for chunk in chunks {
            let key = ArtifactKey::new(ArtifactKind::Chunk, stem, chunk.index);
            self.store.write(&key, chunk.text.as_bytes()).await?;
        }
        debug!("Saved {} chunks for {}", chunks.len(), stem);
        Ok(())
    }

    /// Reload previously saved chunks in index order.
    ///
    /// Returns an empty vector when nothing is cached or the cache cannot be
    /// trusted (unreadable file, invalid UTF-8, missing index).
    #[instrument(skip(self))]
    pub async fn load(&self, stem: &str) -> Vec<Chunk> {
        match self.try_load(stem).await {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!("Ignoring chunk cache for {}: {}", stem, e);
                Vec::new()
            }
        }
    }

    async fn try_load(&self, stem: &str) -> Result<Vec<Chunk>> {
        let indices = self.store.indices(ArtifactKind::Chunk, stem).await?;

        let mut chunks = Vec::with_capacity(indices.len());
        for (position, index) in indices.into_iter().enumerate() {
            if index != position + 1 {
                return Err(ReciteError::Store(format!(
                    "expected chunk {} but found chunk {}",
                    position + 1,
                    index
                )));
            }

            let key = ArtifactKey::new(ArtifactKind::Chunk, stem, index);
            let bytes = self.store.read(&key).await?;
            let text = String::from_utf8(bytes).map_err(|e| {
                ReciteError::Store(format!("{} is not UTF-8: {}", key.file_name(), e))
            })?;
            chunks.push(Chunk::new(index, text));
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FsArtifactStore, MemoryArtifactStore};

    fn sample(count: usize) -> Vec<Chunk> {
        (1..=count)
            .map(|i| Chunk::new(i, format!("Chunk number {}.", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_save_then_load_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsArtifactStore::new(
            dir.path().join("text_chunks"),
            dir.path().join("output_audio"),
            dir.path().join("summaries"),
        ));
        store.ensure_ready().await.unwrap();
        let cache = ChunkCache::new(store);

        let chunks = sample(12);
        cache.save("book", &chunks).await.unwrap();

        let loaded = cache.load("book").await;
        assert_eq!(loaded, chunks);
        assert_eq!(loaded[9].index, 10);
        assert!(dir.path().join("text_chunks/book_chunk_12.txt").exists());
    }

    #[tokio::test]
    async fn test_load_without_cache_is_empty() {
        let cache = ChunkCache::new(Arc::new(MemoryArtifactStore::new()));
        assert!(cache.load("book").await.is_empty());
    }

    #[tokio::test]
    async fn test_gap_is_treated_as_miss() {
        let store = Arc::new(MemoryArtifactStore::new());
        let cache = ChunkCache::new(store.clone());
        cache.save("book", &sample(3)).await.unwrap();

        store.remove(&ArtifactKey::new(ArtifactKind::Chunk, "book", 2));
        assert!(cache.load("book").await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_treated_as_miss() {
        let store = Arc::new(MemoryArtifactStore::new());
        let cache = ChunkCache::new(store.clone());
        cache.save("book", &sample(2)).await.unwrap();

        store
            .write(&ArtifactKey::new(ArtifactKind::Chunk, "book", 2), &[0xff, 0xfe])
            .await
            .unwrap();
        assert!(cache.load("book").await.is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // Directories are never created, so every write fails.
        let store = Arc::new(FsArtifactStore::new(
            dir.path().join("missing/chunks"),
            dir.path().join("missing/audio"),
            dir.path().join("missing/summaries"),
        ));
        let cache = ChunkCache::new(store);

        assert!(cache.save("book", &sample(1)).await.is_err());
    }
}
