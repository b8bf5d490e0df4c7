//! Doctor command - verify credentials, input and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Recite Doctor");
    println!();
    println!("Checking credentials, input and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Credentials").bold());
    let credential_checks = vec![
        check_secret(
            "OPENAI_API_KEY",
            std::env::var("OPENAI_API_KEY").ok(),
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        check_secret(
            "TELEGRAM_BOT_TOKEN",
            std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            "Create a bot with @BotFather, then: export TELEGRAM_BOT_TOKEN='123456:ABC...'",
        ),
        check_chat_id(settings),
    ];
    for check in &credential_checks {
        check.print();
    }
    checks.extend(credential_checks);

    println!();

    println!("{}", style("Input").bold());
    let input_check = check_input(&settings.input_path());
    input_check.print();
    checks.push(input_check);

    println!();

    println!("{}", style("Directories").bold());
    let dir_checks = vec![
        check_directory("Audio", &settings.audio_dir()),
        check_directory("Chunks", &settings.chunks_dir()),
        check_directory("Summaries", &settings.summaries_dir()),
    ];
    for check in &dir_checks {
        check.print();
    }
    checks.extend(dir_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before running Recite.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Recite is ready to run.");
    }

    Ok(())
}

/// Check a secret without printing it in full.
fn check_secret(name: &str, value: Option<String>, hint: &str) -> CheckResult {
    match value {
        Some(v) if v.chars().count() > 12 => {
            let head: String = v.chars().take(4).collect();
            let tail: String = v.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
            CheckResult::ok(name, &format!("configured ({}...{})", head, tail))
        }
        Some(v) if v.is_empty() => CheckResult::error(name, "empty", hint),
        Some(_) => CheckResult::warning(name, "set but looks too short", hint),
        None => CheckResult::error(name, "not set", hint),
    }
}

fn check_chat_id(settings: &Settings) -> CheckResult {
    match settings.chat_id() {
        Some(chat) => CheckResult::ok("Destination chat", &chat),
        None => CheckResult::error(
            "Destination chat",
            "not set",
            "Set publish.chat_id in the config, TELEGRAM_CHAT_ID, or pass --chat-id",
        ),
    }
}

fn check_input(path: &Path) -> CheckResult {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => CheckResult::ok(
            "Input document",
            &format!("{} ({})", path.display(), format_size(meta.len())),
        ),
        Ok(meta) if meta.is_file() => CheckResult::error(
            "Input document",
            &format!("{} is empty", path.display()),
            "Put the text to narrate into the file",
        ),
        Ok(_) => CheckResult::error(
            "Input document",
            &format!("{} is not a file", path.display()),
            "Point general.input or --input at a .txt file",
        ),
        Err(_) => CheckResult::error(
            "Input document",
            &format!("{} not found", path.display()),
            "Point general.input or --input at a .txt file",
        ),
    }
}

fn check_directory(name: &str, path: &Path) -> CheckResult {
    if path.is_dir() {
        let files = std::fs::read_dir(path).map(|d| d.count()).unwrap_or(0);
        CheckResult::ok(name, &format!("{} ({} files)", path.display(), files))
    } else {
        CheckResult::warning(
            name,
            &format!("{} (will be created)", path.display()),
            "Directory will be created on first run",
        )
    }
}

fn check_config_file(path: &Path) -> CheckResult {
    if !path.exists() {
        return CheckResult::ok("Config file", "using defaults (no config file)");
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<Settings>(&content) {
            Ok(_) => CheckResult::ok("Config file", &format!("{}", path.display())),
            Err(e) => CheckResult::error(
                "Config file",
                &format!("parse error: {}", e),
                &format!("Fix syntax in {}", path.display()),
            ),
        },
        Err(e) => CheckResult::error(
            "Config file",
            &format!("read error: {}", e),
            "Check file permissions",
        ),
    }
}

/// Format a byte count for display.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_masked() {
        let check = check_secret("KEY", Some("sk-abcdefghijklmnop".to_string()), "hint");
        assert_eq!(check.status, CheckStatus::Ok);
        assert_eq!(check.message, "configured (sk-a...mnop)");

        assert_eq!(check_secret("KEY", None, "hint").status, CheckStatus::Error);
        assert_eq!(check_secret("KEY", Some(String::new()), "hint").status, CheckStatus::Error);
        assert_eq!(
            check_secret("KEY", Some("short".to_string()), "hint").status,
            CheckStatus::Warning
        );
    }

    #[test]
    fn test_input_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.txt");

        assert_eq!(check_input(&path).status, CheckStatus::Error);
        std::fs::write(&path, "").unwrap();
        assert_eq!(check_input(&path).status, CheckStatus::Error);
        std::fs::write(&path, "Some text.").unwrap();
        assert_eq!(check_input(&path).status, CheckStatus::Ok);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
