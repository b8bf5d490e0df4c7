//! Configuration settings for Recite.

use crate::chunking::ChunkingConfig;
use crate::openai::DEFAULT_API_BASE;
use crate::publish::TELEGRAM_CAPTION_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub chunking: ChunkingSettings,
    pub speech: SpeechSettings,
    pub summary: SummarySettings,
    pub publish: PublishSettings,
    pub prompts: PromptSettings,
}

/// General application settings: input document and working directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Working directory that relative paths below are resolved against.
    pub work_dir: String,
    /// Source document (`<stem>.txt`).
    pub input: String,
    /// Directory for synthesized audio parts.
    pub audio_dir: String,
    /// Directory for cached text chunks.
    pub chunks_dir: String,
    /// Directory for cached chunk summaries.
    pub summaries_dir: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            work_dir: ".".to_string(),
            input: "input.txt".to_string(),
            audio_dir: "output_audio".to_string(),
            chunks_dir: "text_chunks".to_string(),
            summaries_dir: "summaries".to_string(),
        }
    }
}

/// Chunk sizing settings.
///
/// The character budget per chunk is the reading rate times the maximum
/// duration of one audio part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Assumed narration rate in characters per minute.
    pub chars_per_minute: u32,
    /// Maximum duration of one audio part in minutes.
    pub max_minutes: u32,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chars_per_minute: 900,
            max_minutes: 30,
        }
    }
}

impl ChunkingSettings {
    /// Build the segmenter configuration.
    pub fn to_config(&self) -> ChunkingConfig {
        ChunkingConfig {
            chars_per_minute: self.chars_per_minute,
            max_minutes: self.max_minutes,
        }
    }
}

/// Speech synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,
    /// Speech model.
    pub model: String,
    /// Voice identifier.
    pub voice: String,
    /// Style instruction passed with every request.
    pub instructions: String,
    /// Audio container requested from the API.
    pub response_format: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: "gpt-4o-mini-tts".to_string(),
            voice: "onyx".to_string(),
            instructions: "Read like a calm audiobook narrator. Keep an even pace, \
                           pause briefly between paragraphs."
                .to_string(),
            response_format: "mp3".to_string(),
            timeout_seconds: 600,
        }
    }
}

/// Chunk summarization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,
    /// Chat model used for the one-sentence description.
    pub model: String,
    /// Number of leading characters of a chunk sent to the model.
    pub max_input_chars: usize,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: "gpt-4o-mini".to_string(),
            max_input_chars: 3000,
            temperature: 0.3,
        }
    }
}

/// Telegram delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishSettings {
    /// Destination chat or channel (`@name` or numeric id).
    /// Falls back to `TELEGRAM_CHAT_ID` when unset.
    pub chat_id: Option<String>,
    /// Base URL of the Bot API.
    pub api_base: String,
    /// Title used in captions. Defaults to the document stem.
    pub title: Option<String>,
    /// Maximum caption length in characters.
    pub caption_limit: usize,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            chat_id: None,
            api_base: "https://api.telegram.org".to_string(),
            title: None,
            caption_limit: TELEGRAM_CAPTION_LIMIT,
            timeout_seconds: 300,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ReciteError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recite")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded working directory.
    pub fn work_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.work_dir)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let expanded = Self::expand_path(path);
        if expanded.is_absolute() {
            expanded
        } else {
            self.work_dir().join(expanded)
        }
    }

    /// Path of the source document.
    pub fn input_path(&self) -> PathBuf {
        self.resolve(&self.general.input)
    }

    /// Directory holding `<stem>_part_<n>.mp3` files.
    pub fn audio_dir(&self) -> PathBuf {
        self.resolve(&self.general.audio_dir)
    }

    /// Directory holding `<stem>_chunk_<n>.txt` files.
    pub fn chunks_dir(&self) -> PathBuf {
        self.resolve(&self.general.chunks_dir)
    }

    /// Directory holding `<stem>_summary_<n>.txt` files.
    pub fn summaries_dir(&self) -> PathBuf {
        self.resolve(&self.general.summaries_dir)
    }

    /// Override the input document (e.g. from the command line).
    pub fn with_input(mut self, input: &Path) -> Self {
        self.general.input = input.to_string_lossy().into_owned();
        self
    }

    /// Resolve the destination chat: config value first, then `TELEGRAM_CHAT_ID`.
    pub fn chat_id(&self) -> Option<String> {
        self.publish
            .chat_id
            .clone()
            .filter(|c| !c.is_empty())
            .or_else(|| std::env::var("TELEGRAM_CHAT_ID").ok().filter(|c| !c.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.to_config().max_chars(), 27_000);
    }

    #[test]
    fn test_relative_paths_resolve_against_work_dir() {
        let mut settings = Settings::default();
        settings.general.work_dir = "/srv/books".to_string();
        settings.general.input = "novel.txt".to_string();

        assert_eq!(settings.input_path(), PathBuf::from("/srv/books/novel.txt"));
        assert_eq!(settings.audio_dir(), PathBuf::from("/srv/books/output_audio"));

        settings.general.summaries_dir = "/var/summaries".to_string();
        assert_eq!(settings.summaries_dir(), PathBuf::from("/var/summaries"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [publish]
            chat_id = "@my_channel"

            [chunking]
            max_minutes = 10
            "#,
        )
        .unwrap();

        assert_eq!(settings.chat_id().as_deref(), Some("@my_channel"));
        assert_eq!(settings.chunking.chars_per_minute, 900);
        assert_eq!(settings.chunking.to_config().max_chars(), 9_000);
        assert_eq!(settings.publish.caption_limit, TELEGRAM_CAPTION_LIMIT);
        assert_eq!(settings.summary.api_base, settings.speech.api_base);
    }

    #[test]
    fn test_summary_api_base_is_configurable() {
        let settings: Settings = toml::from_str(
            r#"
            [summary]
            api_base = "http://localhost:8080/v1"
            "#,
        )
        .unwrap();

        assert_eq!(settings.summary.api_base, "http://localhost:8080/v1");
        assert_eq!(settings.speech.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.summary.model, "gpt-4o-mini");
    }
}
