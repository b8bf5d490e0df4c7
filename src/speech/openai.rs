//! OpenAI text-to-speech implementation.
//!
//! Talks to `/audio/speech` directly so the style `instructions` field of the
//! newer speech models can be sent.

use super::SpeechSynthesizer;
use crate::chunking::truncate_chars;
use crate::config::SpeechSettings;
use crate::error::{ReciteError, Result};
use crate::openai::{api_key, http_client};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenAI-based speech synthesizer.
pub struct OpenAISpeech {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    voice: String,
    instructions: String,
    response_format: String,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    instructions: &'a str,
    response_format: &'a str,
}

impl OpenAISpeech {
    /// Create a synthesizer from settings, reading `OPENAI_API_KEY`.
    pub fn from_settings(settings: &SpeechSettings) -> Result<Self> {
        let key = api_key().ok_or_else(|| {
            ReciteError::Config(
                "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
            )
        })?;
        Self::with_api_key(settings, &key)
    }

    /// Create a synthesizer with an explicit API key.
    pub fn with_api_key(settings: &SpeechSettings, api_key: &str) -> Result<Self> {
        Ok(Self {
            client: http_client(Duration::from_secs(settings.timeout_seconds))?,
            endpoint: format!("{}/audio/speech", settings.api_base.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: settings.model.clone(),
            voice: settings.voice.clone(),
            instructions: settings.instructions.clone(),
            response_format: settings.response_format.clone(),
        })
    }

    fn request<'a>(&'a self, text: &'a str) -> SpeechRequest<'a> {
        SpeechRequest {
            model: &self.model,
            voice: &self.voice,
            input: text,
            instructions: &self.instructions,
            response_format: &self.response_format,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAISpeech {
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        debug!("Requesting speech from {} ({})", self.model, self.voice);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReciteError::OpenAI(format!(
                "Speech API returned {}: {}",
                status,
                truncate_chars(&body, 500)
            )));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(ReciteError::Synthesis("Empty audio response".to_string()));
        }

        debug!("Received {} bytes of audio", audio.len());
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let mut settings = SpeechSettings::default();
        settings.api_base = "http://localhost:9000/v1/".to_string();
        let speech = OpenAISpeech::with_api_key(&settings, "sk-test").unwrap();

        assert_eq!(speech.endpoint, "http://localhost:9000/v1/audio/speech");

        let body = serde_json::to_value(speech.request("Hello there.")).unwrap();
        assert_eq!(body["input"], "Hello there.");
        assert_eq!(body["voice"], settings.voice.as_str());
        assert_eq!(body["response_format"], "mp3");
        assert!(body.get("instructions").is_some());
    }

    #[test]
    fn test_empty_instructions_omitted() {
        let mut settings = SpeechSettings::default();
        settings.instructions = String::new();
        let speech = OpenAISpeech::with_api_key(&settings, "sk-test").unwrap();

        let body = serde_json::to_value(speech.request("Hi.")).unwrap();
        assert!(body.get("instructions").is_none());
    }
}
