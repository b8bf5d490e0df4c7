//! CLI module for Recite.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{format_duration, Output};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Recite - narrate long texts and post the parts to Telegram
///
/// Splits a document into chunks, synthesizes each chunk with a text-to-speech
/// model and sends every new audio part to a Telegram chat. Runs are resumable:
/// finished parts are skipped on the next run.
#[derive(Parser, Debug)]
#[command(name = "recite")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize missing parts and deliver the new ones
    Run {
        /// Source document (overrides general.input)
        #[arg(short, long, env = "RECITE_INPUT")]
        input: Option<PathBuf>,

        /// Destination chat or channel (overrides publish.chat_id)
        #[arg(long)]
        chat_id: Option<String>,

        /// Re-run the pipeline up to this many times while parts are missing
        #[arg(short, long, default_value = "1")]
        passes: u32,
    },

    /// Split the document into chunks and cache them, without synthesizing
    Split {
        /// Source document (overrides general.input)
        #[arg(short, long, env = "RECITE_INPUT")]
        input: Option<PathBuf>,
    },

    /// Show which parts have audio and summaries
    Status {
        /// Source document (overrides general.input)
        #[arg(short, long, env = "RECITE_INPUT")]
        input: Option<PathBuf>,
    },

    /// Check credentials, input and directories
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "recite", "-vv", "run", "--input", "book.txt", "--chat-id", "@chan", "--passes", "3",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run { input, chat_id, passes } => {
                assert_eq!(input, Some(PathBuf::from("book.txt")));
                assert_eq!(chat_id.as_deref(), Some("@chan"));
                assert_eq!(passes, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_status_with_global_config() {
        let cli = Cli::try_parse_from(["recite", "status", "-c", "/tmp/recite.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/recite.toml"));
        assert!(matches!(cli.command, Commands::Status { .. }));
    }
}
