//! OpenAI client configuration with sensible defaults.

use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
///
/// Speech synthesis of a full chunk can take several minutes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Base URL of the hosted OpenAI API.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Create an OpenAI client for `api_base` with the default timeout.
pub fn create_client(api_base: &str) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(api_base, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client for `api_base` with a custom timeout.
///
/// Any OpenAI-compatible provider works as long as it serves the same routes.
pub fn create_client_with_timeout(
    api_base: &str,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = http_client(timeout)?;
    let config = OpenAIConfig::default().with_api_base(api_base.trim_end_matches('/'));
    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Build a plain HTTP client with the given timeout.
///
/// Used directly for endpoints `async-openai` does not cover, and for Telegram.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Read the OpenAI API key from the environment.
pub fn api_key() -> Option<String> {
    std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())
}
