//! Pre-flight checks before expensive operations.
//!
//! Validates that credentials and input are available before a run starts
//! spending API calls.

use crate::config::Settings;
use crate::error::{ReciteError, Result};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// A full run needs both API credentials, a destination and the input.
    Run,
    /// Splitting and status only need the input document.
    Inspect,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    check_input(&settings.input_path())?;
    match operation {
        Operation::Run => {
            check_env("OPENAI_API_KEY", "sk-...")?;
            check_env("TELEGRAM_BOT_TOKEN", "123456:ABC...")?;
            if settings.chat_id().is_none() {
                return Err(ReciteError::Config(
                    "No destination chat. Set publish.chat_id, TELEGRAM_CHAT_ID or --chat-id."
                        .to_string(),
                ));
            }
        }
        Operation::Inspect => {}
    }
    Ok(())
}

/// Check that a credential environment variable is set and non-empty.
fn check_env(name: &str, example: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(()),
        Ok(_) => Err(ReciteError::Config(format!(
            "{} is empty. Set it with: export {}='{}'",
            name, name, example
        ))),
        Err(_) => Err(ReciteError::Config(format!(
            "{} not set. Set it with: export {}='{}'",
            name, name, example
        ))),
    }
}

/// Check that the input document exists and is a file.
fn check_input(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ReciteError::InvalidInput(format!(
            "Input document not found: {}",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_requires_input_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("book.txt"), "Text.").unwrap();

        let mut settings = Settings::default();
        settings.general.work_dir = dir.path().to_string_lossy().into_owned();
        settings.general.input = "book.txt".to_string();
        assert!(check(Operation::Inspect, &settings).is_ok());

        settings.general.input = "missing.txt".to_string();
        assert!(matches!(
            check(Operation::Inspect, &settings),
            Err(ReciteError::InvalidInput(_))
        ));
    }
}
