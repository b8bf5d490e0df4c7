//! Telegram Bot API publisher.

use super::{AudioAttachment, Publisher};
use crate::config::PublishSettings;
use crate::error::{ReciteError, Result};
use crate::openai::http_client;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Sends audio parts to a chat or channel with `sendAudio`.
pub struct TelegramPublisher {
    client: reqwest::Client,
    endpoint: Url,
    chat_id: String,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramPublisher {
    /// Create a publisher reading `TELEGRAM_BOT_TOKEN` from the environment.
    pub fn from_env(settings: &PublishSettings, chat_id: &str) -> Result<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ReciteError::Config(
                    "TELEGRAM_BOT_TOKEN not set. Set it with: export TELEGRAM_BOT_TOKEN='123:ABC...'"
                        .to_string(),
                )
            })?;
        Self::new(settings, &token, chat_id)
    }

    /// Create a publisher with an explicit bot token.
    pub fn new(settings: &PublishSettings, token: &str, chat_id: &str) -> Result<Self> {
        Ok(Self {
            client: http_client(Duration::from_secs(settings.timeout_seconds))?,
            endpoint: Self::endpoint(&settings.api_base, token)?,
            chat_id: chat_id.to_string(),
        })
    }

    fn endpoint(api_base: &str, token: &str) -> Result<Url> {
        let mut base = api_base.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        // Tokens contain ':', so the leading "./" keeps it from parsing as a scheme.
        Ok(Url::parse(&base)?.join(&format!("./bot{}/sendAudio", token))?)
    }
}

/// Turn a Bot API reply into an error unless it reports success.
fn check_response(status: StatusCode, body: &str) -> Result<()> {
    let reply: TelegramResponse = serde_json::from_str(body)?;
    if reply.ok {
        Ok(())
    } else {
        Err(ReciteError::Telegram(format!(
            "{} ({})",
            reply
                .description
                .unwrap_or_else(|| "request rejected".to_string()),
            status
        )))
    }
}

#[async_trait]
impl Publisher for TelegramPublisher {
    #[instrument(skip(self, audio, caption), fields(file = %audio.file_name))]
    async fn publish(&self, audio: &AudioAttachment, caption: &str) -> Result<()> {
        let part = Part::bytes(audio.data.clone())
            .file_name(audio.file_name.clone())
            .mime_str("audio/mpeg")?;

        let form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", caption.to_string())
            .text("title", audio.title.clone())
            .part("audio", part);

        // The request URL embeds the bot token; keep it out of error messages.
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ReciteError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ReciteError::Http(e.without_url()))?;
        check_response(status, &body)?;

        debug!("Delivered {} to {}", audio.file_name, self.chat_id);
        Ok(())
    }
}
