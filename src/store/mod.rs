//! Artifact storage for Recite.
//!
//! Every pipeline output (cached chunk text, synthesized audio, chunk summary) is
//! an artifact keyed by kind, document stem and 1-based chunk index. The
//! presence of an artifact is the completion marker for that stage; content is
//! never validated.

mod filesystem;
mod memory;

pub use filesystem::FsArtifactStore;
pub use memory::MemoryArtifactStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of artifact produced for a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Cached chunk text.
    Chunk,
    /// Synthesized audio part.
    Audio,
    /// One-sentence chunk summary.
    Summary,
}

impl ArtifactKind {
    /// All artifact kinds, in pipeline order.
    pub const ALL: [ArtifactKind; 3] = [ArtifactKind::Chunk, ArtifactKind::Audio, ArtifactKind::Summary];

    /// Marker placed between the stem and the index in file names.
    fn marker(&self) -> &'static str {
        match self {
            ArtifactKind::Chunk => "chunk",
            ArtifactKind::Audio => "part",
            ArtifactKind::Summary => "summary",
        }
    }

    /// File extension, without the dot.
    fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Chunk | ArtifactKind::Summary => "txt",
            ArtifactKind::Audio => "mp3",
        }
    }

    /// File name for the artifact of `stem` at `index`.
    pub fn file_name(&self, stem: &str, index: usize) -> String {
        format!("{}_{}_{}.{}", stem, self.marker(), index, self.extension())
    }

    /// Extract the chunk index from a file name following this kind's convention.
    ///
    /// Returns `None` for names belonging to another stem or kind, and for index 0.
    pub fn parse_index(&self, stem: &str, file_name: &str) -> Option<usize> {
        let prefix = format!("{}_{}_", stem, self.marker());
        let suffix = format!(".{}", self.extension());
        let index: usize = file_name
            .strip_prefix(&prefix)?
            .strip_suffix(&suffix)?
            .parse()
            .ok()?;
        (index >= 1).then_some(index)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Chunk => write!(f, "chunk"),
            ArtifactKind::Audio => write!(f, "audio"),
            ArtifactKind::Summary => write!(f, "summary"),
        }
    }
}

/// Identifies one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
    pub kind: ArtifactKind,
    pub stem: String,
    pub index: usize,
}

impl ArtifactKey {
    pub fn new(kind: ArtifactKind, stem: &str, index: usize) -> Self {
        Self {
            kind,
            stem: stem.to_string(),
            index,
        }
    }

    /// File name following the on-disk naming convention.
    pub fn file_name(&self) -> String {
        self.kind.file_name(&self.stem, self.index)
    }
}

/// Trait for artifact storage backends.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Prepare the backend for writing (e.g. create directories).
    async fn ensure_ready(&self) -> Result<()>;

    /// Whether the artifact exists. Errors while checking count as absent.
    async fn exists(&self, key: &ArtifactKey) -> bool;

    /// Read an artifact's content.
    async fn read(&self, key: &ArtifactKey) -> Result<Vec<u8>>;

    /// Write an artifact, replacing any previous content.
    async fn write(&self, key: &ArtifactKey, data: &[u8]) -> Result<()>;

    /// Indices of all stored artifacts of `kind` for `stem`, sorted numerically.
    async fn indices(&self, kind: ArtifactKind, stem: &str) -> Result<Vec<usize>>;

    /// Human-readable location of an artifact, for logs.
    fn describe(&self, key: &ArtifactKey) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(ArtifactKind::Audio.file_name("book", 3), "book_part_3.mp3");
        assert_eq!(ArtifactKind::Chunk.file_name("book", 10), "book_chunk_10.txt");
        assert_eq!(ArtifactKind::Summary.file_name("book", 1), "book_summary_1.txt");
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(ArtifactKind::Chunk.parse_index("book", "book_chunk_12.txt"), Some(12));
        assert_eq!(ArtifactKind::Chunk.parse_index("book", "book_part_12.mp3"), None);
        assert_eq!(ArtifactKind::Chunk.parse_index("other", "book_chunk_1.txt"), None);
        assert_eq!(ArtifactKind::Chunk.parse_index("book", "book_chunk_0.txt"), None);
        assert_eq!(ArtifactKind::Chunk.parse_index("book", "book_chunk_x.txt"), None);
        assert_eq!(ArtifactKind::Audio.parse_index("book", "book_part_2.mp3.partial"), None);
    }

    #[test]
    fn test_parse_index_with_underscored_stem() {
        let name = ArtifactKind::Summary.file_name("my_long_book", 7);
        assert_eq!(ArtifactKind::Summary.parse_index("my_long_book", &name), Some(7));
        assert_eq!(ArtifactKind::Summary.parse_index("my_long", &name), None);
    }
}
