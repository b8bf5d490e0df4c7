//! Recite CLI entry point.

use anyhow::Result;
use clap::Parser;
use recite::cli::{commands, Cli, Commands};
use recite::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("recite={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let config_path = cli
        .config
        .as_deref()
        .map(Settings::expand_path)
        .unwrap_or_else(Settings::default_config_path);
    let settings = Settings::load_from(Some(&config_path))?;

    match &cli.command {
        Commands::Run {
            input,
            chat_id,
            passes,
        } => {
            let settings = with_input(settings, input.as_ref());
            commands::run_pipeline(settings, chat_id.clone(), *passes).await?;
        }

        Commands::Split { input } => {
            commands::run_split(with_input(settings, input.as_ref())).await?;
        }

        Commands::Status { input } => {
            commands::run_status(with_input(settings, input.as_ref())).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &config_path)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, cli.config.as_deref())?;
        }
    }

    Ok(())
}

fn with_input(settings: Settings, input: Option<&PathBuf>) -> Settings {
    match input {
        Some(path) => settings.with_input(path),
        None => settings,
    }
}
