//! In-memory artifact store.
//!
//! Useful for testing.

use super::{ArtifactKey, ArtifactKind, ArtifactStore};
use crate::error::{ReciteError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory artifact store.
pub struct MemoryArtifactStore {
    artifacts: RwLock<HashMap<ArtifactKey, Vec<u8>>>,
}

impl MemoryArtifactStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            artifacts: RwLock::new(HashMap::new()),
        }
    }

    /// Remove an artifact, returning whether it existed.
    pub fn remove(&self, key: &ArtifactKey) -> bool {
        self.artifacts
            .write()
            .map(|mut artifacts| artifacts.remove(key).is_some())
            .unwrap_or(false)
    }

    /// Number of stored artifacts of `kind`.
    pub fn count(&self, kind: ArtifactKind) -> usize {
        self.artifacts
            .read()
            .map(|artifacts| artifacts.keys().filter(|k| k.kind == kind).count())
            .unwrap_or(0)
    }
}

impl Default for MemoryArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> ReciteError {
    ReciteError::Store("artifact map lock poisoned".to_string())
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn exists(&self, key: &ArtifactKey) -> bool {
        self.artifacts
            .read()
            .map(|artifacts| artifacts.contains_key(key))
            .unwrap_or(false)
    }

    async fn read(&self, key: &ArtifactKey) -> Result<Vec<u8>> {
        let artifacts = self.artifacts.read().map_err(poisoned)?;
        artifacts
            .get(key)
            .cloned()
            .ok_or_else(|| ReciteError::Store(format!("{} not found", key.file_name())))
    }

    async fn write(&self, key: &ArtifactKey, data: &[u8]) -> Result<()> {
        let mut artifacts = self.artifacts.write().map_err(poisoned)?;
        artifacts.insert(key.clone(), data.to_vec());
        Ok(())
    }

    async fn indices(&self, kind: ArtifactKind, stem: &str) -> Result<Vec<usize>> {
        let artifacts = self.artifacts.read().map_err(poisoned)?;
        let mut indices: Vec<usize> = artifacts
            .keys()
            .filter(|k| k.kind == kind && k.stem == stem)
            .map(|k| k.index)
            .collect();
        indices.sort_unstable();
        Ok(indices)
    }

    fn describe(&self, key: &ArtifactKey) -> String {
        format!("memory:{}", key.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryArtifactStore::new();
        let key = ArtifactKey::new(ArtifactKind::Summary, "book", 2);

        assert!(!store.exists(&key).await);
        assert!(store.read(&key).await.is_err());

        store.write(&key, b"A storm begins.").await.unwrap();
        store
            .write(&ArtifactKey::new(ArtifactKind::Summary, "book", 1), b"x")
            .await
            .unwrap();
        store
            .write(&ArtifactKey::new(ArtifactKind::Summary, "other", 5), b"x")
            .await
            .unwrap();

        assert!(store.exists(&key).await);
        assert_eq!(store.indices(ArtifactKind::Summary, "book").await.unwrap(), vec![1, 2]);
        assert_eq!(store.count(ArtifactKind::Summary), 3);

        assert!(store.remove(&key));
        assert!(!store.exists(&key).await);
    }
}
