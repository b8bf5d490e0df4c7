//! Pipeline orchestrator for Recite.
//!
//! Drives a document through segmentation, synthesis, summarization and
//! delivery. Chunks are processed strictly in order and one at a time. A
//! failure in any per-chunk stage is recorded in the report and never stops
//! the next chunk; only setup problems abort a run.

use crate::chunking::{Chunk, ChunkCache, Segmenter};
use crate::config::{Prompts, Settings};
use crate::error::{ReciteError, Result};
use crate::publish::{build_caption, AudioAttachment, Publisher, TelegramPublisher};
use crate::report::{
    ChunkReport, ChunkStatus, RunReport, StageOutcome, SummaryOutcome, SummarySource,
};
use crate::speech::{OpenAISpeech, SpeechSynthesizer};
use crate::store::{ArtifactKey, ArtifactKind, ArtifactStore, FsArtifactStore};
use crate::summary::{OpenAISummarizer, Summarizer};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The input manuscript.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    /// File name without extension; prefixes every artifact name.
    pub stem: String,
    pub text: String,
}

impl SourceDocument {
    /// Create a document from in-memory text.
    pub fn new(stem: &str, text: String) -> Self {
        Self {
            path: PathBuf::from(format!("{}.txt", stem)),
            stem: stem.to_string(),
            text,
        }
    }

    /// Read a document from disk.
    pub async fn read(path: &Path) -> Result<Self> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ReciteError::InvalidInput(format!("Cannot derive a name from {}", path.display()))
            })?
            .to_string();

        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            ReciteError::InvalidInput(format!("Cannot read {}: {}", path.display(), e))
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            stem,
            text,
        })
    }
}

/// Chunks ready for processing.
#[derive(Debug, Clone)]
pub struct PreparedChunks {
    pub chunks: Vec<Chunk>,
    /// Whether the chunks came from the cache.
    pub from_cache: bool,
}

/// Check whether the `kind` artifact for chunk `index` of `stem` exists.
pub async fn is_complete(store: &dyn ArtifactStore, kind: ArtifactKind, stem: &str, index: usize) -> bool {
    store.exists(&ArtifactKey::new(kind, stem, index)).await
}

/// Load cached chunks, or segment the document and cache the result.
///
/// Cache read problems fall back to segmentation; cache write problems are errors.
#[instrument(skip_all, fields(stem = %document.stem))]
pub async fn prepare_chunks(
    cache: &ChunkCache,
    segmenter: &Segmenter,
    document: &SourceDocument,
) -> Result<PreparedChunks> {
    // Checked before the cache so a blanked document never resumes from old chunks.
    if document.text.trim().is_empty() {
        return Err(ReciteError::EmptyDocument(document.path.display().to_string()));
    }

    let cached = cache.load(&document.stem).await;
    if !cached.is_empty() {
        info!("Loaded {} cached chunks", cached.len());
        return Ok(PreparedChunks {
            chunks: cached,
            from_cache: true,
        });
    }

    let chunks = segmenter.split(&document.text);

    let oversized = chunks
        .iter()
        .filter(|c| c.char_len() > segmenter.max_chars())
        .count();
    if oversized > 0 {
        warn!(
            "{} chunk(s) exceed {} characters because a single sentence is longer than the budget",
            oversized,
            segmenter.max_chars()
        );
    }

    cache.save(&document.stem, &chunks).await?;
    info!("Split document into {} chunks", chunks.len());

    Ok(PreparedChunks {
        chunks,
        from_cache: false,
    })
}

/// Read the completion state of every chunk without calling any service.
pub async fn completion_status(
    store: &dyn ArtifactStore,
    stem: &str,
    chunks: &[Chunk],
) -> Vec<ChunkStatus> {
    let mut statuses = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        statuses.push(ChunkStatus {
            index: chunk.index,
            chars: chunk.char_len(),
            audio: is_complete(store, ArtifactKind::Audio, stem, chunk.index).await,
            summary: is_complete(store, ArtifactKind::Summary, stem, chunk.index).await,
        });
    }
    statuses
}

/// The main orchestrator for the Recite pipeline.
pub struct Orchestrator {
    store: Arc<dyn ArtifactStore>,
    cache: ChunkCache,
    segmenter: Segmenter,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    summarizer: Arc<dyn Summarizer>,
    publisher: Arc<dyn Publisher>,
    title: Option<String>,
    caption_limit: usize,
}

impl Orchestrator {
    /// Create an orchestrator with the production services.
    ///
    /// Fails when a credential or the destination chat is missing.
    pub fn new(settings: Settings) -> Result<Self> {
        let chat_id = settings.chat_id().ok_or_else(|| {
            ReciteError::Config(
                "No destination chat. Set publish.chat_id or TELEGRAM_CHAT_ID.".to_string(),
            )
        })?;

        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let synthesizer = Arc::new(OpenAISpeech::from_settings(&settings.speech)?);
        let summarizer =
            Arc::new(OpenAISummarizer::from_settings(&settings.summary)?.with_prompts(prompts));
        let publisher = Arc::new(TelegramPublisher::from_env(&settings.publish, &chat_id)?);
        let store = Arc::new(FsArtifactStore::from_settings(&settings));

        info!(
            "Using {} ({}) for speech, {} for summaries",
            settings.speech.model, settings.speech.voice, settings.summary.model
        );

        Ok(Self::with_components(
            &settings,
            store,
            synthesizer,
            summarizer,
            publisher,
        ))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: &Settings,
        store: Arc<dyn ArtifactStore>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        summarizer: Arc<dyn Summarizer>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            cache: ChunkCache::new(store.clone()),
            store,
            segmenter: Segmenter::new(&settings.chunking.to_config()),
            synthesizer,
            summarizer,
            publisher,
            title: settings.publish.title.clone(),
            caption_limit: settings.publish.caption_limit,
        }
    }

    /// Whether the `kind` artifact for chunk `index` of `stem` exists.
    pub async fn is_complete(&self, kind: ArtifactKind, stem: &str, index: usize) -> bool {
        is_complete(self.store.as_ref(), kind, stem, index).await
    }

    /// Process a document end to end.
    pub async fn run(&self, document: &SourceDocument) -> Result<RunReport> {
        self.run_with_progress(document, |_, _| {}).await
    }

    /// Process a document, calling `on_chunk` after each chunk with its report
    /// and the total chunk count.
    #[instrument(skip_all, fields(stem = %document.stem))]
    pub async fn run_with_progress<F>(&self, document: &SourceDocument, mut on_chunk: F) -> Result<RunReport>
    where
        F: FnMut(&ChunkReport, usize) + Send,
    {
        let started_at = Utc::now();

        self.store.ensure_ready().await?;
        let prepared = prepare_chunks(&self.cache, &self.segmenter, document).await?;
        let total = prepared.chunks.len();

        let mut reports = Vec::with_capacity(total);
        for chunk in &prepared.chunks {
            let report = self.process_chunk(&document.stem, chunk, total).await;
            on_chunk(&report, total);
            reports.push(report);
        }

        let report = RunReport {
            stem: document.stem.clone(),
            chunks_from_cache: prepared.from_cache,
            chunks: reports,
            started_at,
            finished_at: Utc::now(),
        };
        info!("{}", report.summary_line());

        Ok(report)
    }

    async fn process_chunk(&self, stem: &str, chunk: &Chunk, total: usize) -> ChunkReport {
        let synthesis = self.synthesize(stem, chunk).await;

        // Only audio created in this run is captioned and delivered.
        let (summary, delivery) = if synthesis.is_completed() {
            let summary = self.summarize(stem, chunk).await;
            let delivery = self.publish(stem, chunk.index, total, &summary.text).await;
            (Some(summary.source), Some(delivery))
        } else {
            (None, None)
        };

        ChunkReport {
            index: chunk.index,
            chars: chunk.char_len(),
            synthesis,
            summary,
            delivery,
        }
    }

    /// Synthesize audio for a chunk unless it already exists.
    #[instrument(skip(self, chunk), fields(chunk = chunk.index))]
    pub async fn synthesize(&self, stem: &str, chunk: &Chunk) -> StageOutcome<()> {
        let key = ArtifactKey::new(ArtifactKind::Audio, stem, chunk.index);
        if self.store.exists(&key).await {
            debug!("Audio already exists: {}", self.store.describe(&key));
            return StageOutcome::Skipped;
        }

        info!("Synthesizing chunk {} ({} chars)", chunk.index, chunk.char_len());
        let audio = match self.synthesizer.synthesize(&chunk.text).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!("Speech synthesis failed for chunk {}: {}", chunk.index, e);
                return StageOutcome::failed(e);
            }
        };

        if let Err(e) = self.store.write(&key, &audio).await {
            warn!("Failed to save audio for chunk {}: {}", chunk.index, e);
            return StageOutcome::failed(e);
        }

        info!("Saved {}", self.store.describe(&key));
        StageOutcome::Completed(())
    }

    /// Return the cached summary for a chunk, or generate and cache one.
    ///
    /// Never fails: a generation error yields a placeholder caption.
    #[instrument(skip(self, chunk), fields(chunk = chunk.index))]
    pub async fn summarize(&self, stem: &str, chunk: &Chunk) -> SummaryOutcome {
        let key = ArtifactKey::new(ArtifactKind::Summary, stem, chunk.index);

        if self.store.exists(&key).await {
            match self.store.read(&key).await.map(String::from_utf8) {
                Ok(Ok(text)) => {
                    return SummaryOutcome {
                        text,
                        source: SummarySource::Cached,
                    }
                }
                _ => warn!("Unreadable summary {}, regenerating", self.store.describe(&key)),
            }
        }

        match self.summarizer.summarize(&chunk.text).await {
            Ok(text) => {
                if let Err(e) = self.store.write(&key, text.as_bytes()).await {
                    warn!("Failed to save summary for chunk {}: {}", chunk.index, e);
                }
                SummaryOutcome {
                    text,
                    source: SummarySource::Generated,
                }
            }
            Err(e) => {
                warn!("Summarization failed for chunk {}: {}", chunk.index, e);
                SummaryOutcome {
                    text: fallback_summary(chunk.index),
                    source: SummarySource::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    /// Send the audio for chunk `index` with its caption.
    #[instrument(skip(self, summary))]
    pub async fn publish(&self, stem: &str, index: usize, total: usize, summary: &str) -> StageOutcome<()> {
        let key = ArtifactKey::new(ArtifactKind::Audio, stem, index);
        let data = match self.store.read(&key).await {
            Ok(data) => data,
            Err(e) => {
                warn!("Cannot read audio for chunk {}: {}", index, e);
                return StageOutcome::failed(e);
            }
        };

        let header = self.caption_header(stem, index, total);
        let caption = build_caption(&header, summary, self.caption_limit);
        let audio = AudioAttachment {
            file_name: key.file_name(),
            title: header,
            data,
        };

        match self.publisher.publish(&audio, &caption).await {
            Ok(()) => {
                info!("Delivered chunk {}", index);
                StageOutcome::Completed(())
            }
            Err(e) => {
                warn!("Delivery failed for chunk {}: {}", index, e);
                StageOutcome::failed(e)
            }
        }
    }

    fn caption_header(&self, stem: &str, index: usize, total: usize) -> String {
        let title = self.title.as_deref().unwrap_or(stem);
        format!("{}, part {} of {}", title, index, total)
    }
}

/// Placeholder caption used when no summary could be generated.
pub fn fallback_summary(index: usize) -> String {
    format!("Audio fragment {}", index)
}
