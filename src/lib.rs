//! Recite - resumable narration of long texts
//!
//! A CLI tool that turns a long text document into a series of narrated audio
//! parts and posts each new part to a Telegram chat.
//!
//! # Overview
//!
//! A run goes through these stages for one document:
//! - Split the text into chunks that fit a maximum narration length
//! - Cache the chunks so later runs keep the same boundaries
//! - Synthesize each chunk with a text-to-speech model, skipping parts that exist
//! - Describe each new part in one sentence for its caption
//! - Send each new part to the destination chat
//!
//! Every stage output is a file whose presence marks the stage as done, so an
//! interrupted or partially failed run is continued by running it again.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `chunking` - Segmenter and chunk cache
//! - `store` - Artifact storage (filesystem, in-memory)
//! - `speech` - Text-to-speech capability
//! - `summary` - Caption summarization capability
//! - `publish` - Message delivery capability
//! - `orchestrator` - Pipeline coordination
//! - `report` - Stage outcomes and run reports
//!
//! # Example
//!
//! ```rust,no_run
//! use recite::config::Settings;
//! use recite::orchestrator::{Orchestrator, SourceDocument};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let document = SourceDocument::read(&settings.input_path()).await?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let report = orchestrator.run(&document).await?;
//!     println!("{}", report.summary_line());
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod publish;
pub mod report;
pub mod speech;
pub mod store;
pub mod summary;

pub use error::{ReciteError, Result};
