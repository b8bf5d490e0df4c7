//! Outcomes of pipeline stages and the per-run report.

use chrono::{DateTime, Utc};
use std::fmt;

/// Outcome of one best-effort stage for one chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    /// The stage did its work in this run.
    Completed(T),
    /// The work was already done in an earlier run.
    Skipped,
    /// The stage failed; the pipeline moved on.
    Failed { reason: String },
}

impl<T> StageOutcome<T> {
    pub fn failed(reason: impl fmt::Display) -> Self {
        StageOutcome::Failed {
            reason: reason.to_string(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, StageOutcome::Completed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StageOutcome::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed { .. })
    }

    /// Failure reason, if the stage failed.
    pub fn reason(&self) -> Option<&str> {
        match self {
            StageOutcome::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Where a chunk's caption text came from.
#[derive(Debug, Clone, PartialEq)]
pub enum SummarySource {
    /// Read from an earlier run's summary file.
    Cached,
    /// Generated in this run and persisted.
    Generated,
    /// Generation failed; a placeholder was used and nothing was persisted.
    Fallback { reason: String },
}

/// Caption text for a chunk together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOutcome {
    pub text: String,
    pub source: SummarySource,
}

/// Everything that happened to one chunk during a run.
#[derive(Debug, Clone)]
pub struct ChunkReport {
    /// 1-based chunk index.
    pub index: usize,
    /// Chunk length in characters.
    pub chars: usize,
    /// Synthesis outcome. `Skipped` means the audio already existed.
    pub synthesis: StageOutcome<()>,
    /// Set only when audio was created in this run.
    pub summary: Option<SummarySource>,
    /// Set only when audio was created in this run.
    pub delivery: Option<StageOutcome<()>>,
}

impl ChunkReport {
    /// Whether audio exists for this chunk after the run.
    pub fn audio_available(&self) -> bool {
        self.synthesis.is_completed() || self.synthesis.is_skipped()
    }

    /// Whether a message was sent for this chunk in this run.
    pub fn delivered(&self) -> bool {
        self.delivery.as_ref().is_some_and(StageOutcome::is_completed)
    }
}

/// Summary of one pipeline run over a document.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Document stem.
    pub stem: String,
    /// Whether chunks were reloaded from the cache instead of re-segmented.
    pub chunks_from_cache: bool,
    /// Per-chunk outcomes in index order.
    pub chunks: Vec<ChunkReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn total_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Chunks with audio after this run (new or pre-existing).
    pub fn audio_available(&self) -> usize {
        self.chunks.iter().filter(|c| c.audio_available()).count()
    }

    /// Chunks synthesized in this run.
    pub fn newly_synthesized(&self) -> usize {
        self.chunks.iter().filter(|c| c.synthesis.is_completed()).count()
    }

    pub fn synthesis_failed(&self) -> usize {
        self.chunks.iter().filter(|c| c.synthesis.is_failed()).count()
    }

    pub fn delivery_attempted(&self) -> usize {
        self.chunks.iter().filter(|c| c.delivery.is_some()).count()
    }

    pub fn delivered(&self) -> usize {
        self.chunks.iter().filter(|c| c.delivered()).count()
    }

    /// Chunks whose caption fell back to the placeholder.
    pub fn summary_fallbacks(&self) -> usize {
        self.chunks
            .iter()
            .filter(|c| matches!(c.summary, Some(SummarySource::Fallback { .. })))
            .count()
    }

    /// Every chunk has audio. Another run would do nothing.
    pub fn is_complete(&self) -> bool {
        self.audio_available() == self.total_chunks()
    }

    /// Run duration in seconds.
    pub fn elapsed_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// One-line completion summary.
    pub fn summary_line(&self) -> String {
        format!(
            "Audio available: {}/{} chunks, delivered: {}/{} new messages",
            self.audio_available(),
            self.total_chunks(),
            self.delivered(),
            self.delivery_attempted()
        )
    }
}

/// Completion state of one chunk, read from the artifact store.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkStatus {
    pub index: usize,
    pub chars: usize,
    pub audio: bool,
    pub summary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, synthesis: StageOutcome<()>, delivery: Option<StageOutcome<()>>) -> ChunkReport {
        ChunkReport {
            index,
            chars: 100,
            summary: delivery.as_ref().map(|_| SummarySource::Generated),
            synthesis,
            delivery,
        }
    }

    #[test]
    fn test_report_counters() {
        let now = Utc::now();
        let report = RunReport {
            stem: "book".to_string(),
            chunks_from_cache: false,
            chunks: vec![
                chunk(1, StageOutcome::Skipped, None),
                chunk(2, StageOutcome::Completed(()), Some(StageOutcome::Completed(()))),
                chunk(3, StageOutcome::Completed(()), Some(StageOutcome::failed("429"))),
                chunk(4, StageOutcome::failed("timeout"), None),
            ],
            started_at: now,
            finished_at: now,
        };

        assert_eq!(report.total_chunks(), 4);
        assert_eq!(report.audio_available(), 3);
        assert_eq!(report.newly_synthesized(), 2);
        assert_eq!(report.synthesis_failed(), 1);
        assert_eq!(report.delivery_attempted(), 2);
        assert_eq!(report.delivered(), 1);
        assert!(!report.is_complete());
        assert_eq!(
            report.summary_line(),
            "Audio available: 3/4 chunks, delivered: 1/2 new messages"
        );
    }

    #[test]
    fn test_failed_reason() {
        let outcome: StageOutcome<()> = StageOutcome::failed("quota exceeded");
        assert!(outcome.is_failed());
        assert_eq!(outcome.reason(), Some("quota exceeded"));
        assert_eq!(StageOutcome::<()>::Skipped.reason(), None);
    }
}
