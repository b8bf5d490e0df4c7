//! Run command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::{format_duration, Output};
use crate::config::Settings;
use crate::error::ReciteError;
use crate::orchestrator::{Orchestrator, SourceDocument};
use crate::report::RunReport;
use anyhow::Result;

/// Run the pipeline, re-running up to `passes` times while audio parts are missing.
pub async fn run_pipeline(mut settings: Settings, chat_id: Option<String>, passes: u32) -> Result<()> {
    if let Some(chat_id) = chat_id {
        settings.publish.chat_id = Some(chat_id);
    }

    if let Err(e) = preflight::check(Operation::Run, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'recite doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let document = SourceDocument::read(&settings.input_path()).await?;
    Output::info(&format!("Processing: {}", document.path.display()));

    let orchestrator = Orchestrator::new(settings)?;
    let passes = passes.max(1);

    for pass in 1..=passes {
        if passes > 1 {
            Output::info(&format!("Pass {}/{}", pass, passes));
        }

        let report = match run_once(&orchestrator, &document).await {
            Ok(report) => report,
            Err(ReciteError::EmptyDocument(path)) => {
                Output::error(&format!("Nothing to narrate: {} is empty", path));
                return Err(anyhow::anyhow!("input document is empty"));
            }
            Err(e) => {
                Output::error(&format!("Run failed: {}", e));
                return Err(e.into());
            }
        };

        print_report(&report);

        if report.is_complete() {
            break;
        }
        if pass < passes {
            Output::warning(&format!(
                "{} part(s) still missing, running again",
                report.total_chunks() - report.audio_available()
            ));
        }
    }

    Ok(())
}

async fn run_once(orchestrator: &Orchestrator, document: &SourceDocument) -> crate::Result<RunReport> {
    let mut progress = None;

    let result = orchestrator
        .run_with_progress(document, |chunk, total| {
            let pb = progress.get_or_insert_with(|| Output::progress_bar(total as u64, "parts"));
            pb.inc(1);
            if let Some(reason) = chunk.synthesis.reason() {
                pb.println(format!("  part {} failed: {}", chunk.index, reason));
            }
        })
        .await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    result
}

fn print_report(report: &RunReport) {
    if report.chunks_from_cache {
        Output::kv("Chunks", &format!("{} (cached)", report.total_chunks()));
    } else {
        Output::kv("Chunks", &report.total_chunks().to_string());
    }
    Output::kv("New audio", &report.newly_synthesized().to_string());
    if report.synthesis_failed() > 0 {
        Output::kv("Failed", &report.synthesis_failed().to_string());
    }
    if report.summary_fallbacks() > 0 {
        Output::kv("Placeholder captions", &report.summary_fallbacks().to_string());
    }
    Output::kv("Elapsed", &format_duration(report.elapsed_seconds()));

    let line = report.summary_line();
    if report.is_complete() && report.delivered() == report.delivery_attempted() {
        Output::success(&line);
    } else {
        Output::warning(&line);
    }
}
