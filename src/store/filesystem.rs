//! Filesystem artifact store.
//!
//! Each kind lives in its own directory; file names follow
//! `<stem>_chunk_<n>.txt`, `<stem>_part_<n>.mp3` and `<stem>_summary_<n>.txt`.

use super::{ArtifactKey, ArtifactKind, ArtifactStore};
use crate::config::Settings;
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Artifact store backed by plain files.
pub struct FsArtifactStore {
    chunks_dir: PathBuf,
    audio_dir: PathBuf,
    summaries_dir: PathBuf,
}

impl FsArtifactStore {
    /// Create a store over explicit directories.
    pub fn new(chunks_dir: PathBuf, audio_dir: PathBuf, summaries_dir: PathBuf) -> Self {
        Self {
            chunks_dir,
            audio_dir,
            summaries_dir,
        }
    }

    /// Create a store using the directories from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.chunks_dir(),
            settings.audio_dir(),
            settings.summaries_dir(),
        )
    }

    /// Directory holding artifacts of `kind`.
    pub fn dir(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Chunk => &self.chunks_dir,
            ArtifactKind::Audio => &self.audio_dir,
            ArtifactKind::Summary => &self.summaries_dir,
        }
    }

    /// Full path of an artifact.
    pub fn path(&self, key: &ArtifactKey) -> PathBuf {
        self.dir(key.kind).join(key.file_name())
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn ensure_ready(&self) -> Result<()> {
        for kind in ArtifactKind::ALL {
            tokio::fs::create_dir_all(self.dir(kind)).await?;
        }
        Ok(())
    }

    async fn exists(&self, key: &ArtifactKey) -> bool {
        tokio::fs::try_exists(self.path(key)).await.unwrap_or(false)
    }

    async fn read(&self, key: &ArtifactKey) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.path(key)).await?)
    }

    async fn write(&self, key: &ArtifactKey, data: &[u8]) -> Result<()> {
        let path = self.path(key);
        // Write-then-rename so an interrupted write never leaves a completion marker.
        let partial = path.with_extension(format!("{}.partial", key.kind.extension()));
        tokio::fs::write(&partial, data).await?;
        tokio::fs::rename(&partial, &path).await?;
        debug!("Wrote {} ({} bytes)", path.display(), data.len());
        Ok(())
    }

    async fn indices(&self, kind: ArtifactKind, stem: &str) -> Result<Vec<usize>> {
        let mut entries = match tokio::fs::read_dir(self.dir(kind)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut indices = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(index) = entry
                .file_name()
                .to_str()
                .and_then(|name| kind.parse_index(stem, name))
            {
                indices.push(index);
            }
        }

        indices.sort_unstable();
        Ok(indices)
    }

    fn describe(&self, key: &ArtifactKey) -> String {
        self.path(key).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> FsArtifactStore {
        FsArtifactStore::new(dir.join("chunks"), dir.join("audio"), dir.join("summaries"))
    }

    #[tokio::test]
    async fn test_write_read_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.ensure_ready().await.unwrap();

        let key = ArtifactKey::new(ArtifactKind::Audio, "book", 1);
        assert!(!store.exists(&key).await);

        store.write(&key, b"ID3").await.unwrap();
        assert!(store.exists(&key).await);
        assert_eq!(store.read(&key).await.unwrap(), b"ID3");
        assert!(dir.path().join("audio/book_part_1.mp3").exists());
        assert!(!dir.path().join("audio/book_part_1.mp3.partial").exists());
    }

    #[tokio::test]
    async fn test_indices_sort_numerically() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.ensure_ready().await.unwrap();

        for index in [10, 2, 1, 9] {
            let key = ArtifactKey::new(ArtifactKind::Chunk, "book", index);
            store.write(&key, b"text").await.unwrap();
        }
        // Unrelated files are ignored.
        std::fs::write(dir.path().join("chunks/other_chunk_3.txt"), "x").unwrap();
        std::fs::write(dir.path().join("chunks/notes.md"), "x").unwrap();

        let indices = store.indices(ArtifactKind::Chunk, "book").await.unwrap();
        assert_eq!(indices, vec![1, 2, 9, 10]);
    }

    #[tokio::test]
    async fn test_indices_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let indices = store.indices(ArtifactKind::Summary, "book").await.unwrap();
        assert!(indices.is_empty());
    }
}
