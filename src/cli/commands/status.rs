//! Status command implementation.

use crate::chunking::{ChunkCache, Segmenter};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{completion_status, SourceDocument};
use crate::store::FsArtifactStore;
use anyhow::Result;
use std::sync::Arc;

/// Show per-chunk completion without changing anything on disk.
pub async fn run_status(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Inspect, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let document = SourceDocument::read(&settings.input_path()).await?;
    let store = Arc::new(FsArtifactStore::from_settings(&settings));

    let cached = ChunkCache::new(store.clone()).load(&document.stem).await;
    let from_cache = !cached.is_empty();
    let chunks = if from_cache {
        cached
    } else {
        Segmenter::new(&settings.chunking.to_config()).split(&document.text)
    };

    if chunks.is_empty() {
        Output::warning(&format!("{} is empty", document.path.display()));
        return Ok(());
    }

    let statuses = completion_status(&*store, &document.stem, &chunks).await;

    Output::header(&format!("Status of {}", document.stem));
    println!();
    for status in &statuses {
        Output::chunk_row(status.index, status.chars, status.audio, status.summary);
    }
    println!();

    let audio = statuses.iter().filter(|s| s.audio).count();
    Output::kv(
        "Chunks",
        &format!(
            "{}{}",
            statuses.len(),
            if from_cache { "" } else { " (not yet cached)" }
        ),
    );
    Output::kv("Audio", &format!("{}/{}", audio, statuses.len()));
    Output::kv(
        "Summaries",
        &format!("{}/{}", statuses.iter().filter(|s| s.summary).count(), statuses.len()),
    );

    if audio == statuses.len() {
        Output::success("All parts are narrated.");
    } else {
        Output::info(&format!(
            "{} part(s) missing. Run 'recite run' to continue.",
            statuses.len() - audio
        ));
    }

    Ok(())
}
