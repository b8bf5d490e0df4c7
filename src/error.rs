//! Error types for Recite.

use thiserror::Error;

/// Library-level error type for Recite operations.
#[derive(Error, Debug)]
pub enum ReciteError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input document is empty: {0}")]
    EmptyDocument(String),

    #[error("Chunk store error: {0}")]
    Store(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Summarization failed: {0}")]
    Summary(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Telegram API error: {0}")]
    Telegram(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Recite operations.
pub type Result<T> = std::result::Result<T, ReciteError>;
