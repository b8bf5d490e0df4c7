//! Split command implementation.

use crate::chunking::{ChunkCache, Segmenter};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{prepare_chunks, SourceDocument};
use crate::store::{ArtifactStore, FsArtifactStore};
use anyhow::Result;
use std::sync::Arc;

/// Split the document and cache its chunks without calling any service.
pub async fn run_split(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Inspect, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let document = SourceDocument::read(&settings.input_path()).await?;
    let store = Arc::new(FsArtifactStore::from_settings(&settings));
    store.ensure_ready().await?;

    let cache = ChunkCache::new(store.clone());
    let segmenter = Segmenter::new(&settings.chunking.to_config());

    let prepared = match prepare_chunks(&cache, &segmenter, &document).await {
        Ok(prepared) => prepared,
        Err(e) => {
            Output::error(&format!("Failed to split: {}", e));
            return Err(e.into());
        }
    };

    Output::header(&format!("Chunks of {} ({})", document.stem, prepared.chunks.len()));
    println!();
    for chunk in &prepared.chunks {
        let marker = if chunk.char_len() > segmenter.max_chars() {
            " (oversized)"
        } else {
            ""
        };
        Output::kv(&format!("{:>4}", chunk.index), &format!("{} chars{}", chunk.char_len(), marker));
    }
    println!();

    if prepared.from_cache {
        Output::info("Chunks were already cached; delete them to re-split.");
    } else {
        Output::success(&format!(
            "Saved {} chunks to {}",
            prepared.chunks.len(),
            settings.chunks_dir().display()
        ));
    }

    Ok(())
}
