//! OpenAI chat-based summarizer.

use super::{clean_summary, Summarizer};
use crate::chunking::truncate_chars;
use crate::config::{Prompts, SummarySettings};
use crate::error::{ReciteError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Summarizer backed by the chat completion API.
pub struct OpenAISummarizer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    max_input_chars: usize,
    temperature: f32,
    prompts: Prompts,
}

impl OpenAISummarizer {
    /// Create a summarizer from settings with default prompts.
    pub fn from_settings(settings: &SummarySettings) -> Result<Self> {
        Ok(Self {
            client: create_client(&settings.api_base)?,
            model: settings.model.clone(),
            max_input_chars: settings.max_input_chars,
            temperature: settings.temperature,
            prompts: Prompts::default(),
        })
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    fn messages(&self, text: &str) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut vars = HashMap::new();
        vars.insert(
            "text".to_string(),
            truncate_chars(text, self.max_input_chars).to_string(),
        );

        let system_message = self.prompts.render_with_custom(&self.prompts.summary.system, &vars);
        let user_message = self.prompts.render_with_custom(&self.prompts.summary.user, &vars);

        Ok(vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_message)
                .build()
                .map_err(|e| ReciteError::Summary(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()
                .map_err(|e| ReciteError::Summary(e.to_string()))?
                .into(),
        ])
    }
}

#[async_trait]
impl Summarizer for OpenAISummarizer {
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn summarize(&self, text: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(self.messages(text)?)
            .temperature(self.temperature)
            .build()
            .map_err(|e| ReciteError::Summary(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            ReciteError::OpenAI(format!("Failed to get summary response: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| ReciteError::Summary("Empty response from LLM".to_string()))?;

        debug!("LLM summary response: {}", truncate_chars(content, 200));

        clean_summary(content)
            .ok_or_else(|| ReciteError::Summary("Blank summary from LLM".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::types::{
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessageContent,
    };

    fn contents(messages: &[ChatCompletionRequestMessage]) -> (String, String) {
        let system = match &messages[0] {
            ChatCompletionRequestMessage::System(m) => match &m.content {
                ChatCompletionRequestSystemMessageContent::Text(t) => t.clone(),
                other => panic!("unexpected system content: {:?}", other),
            },
            other => panic!("expected system message, got {:?}", other),
        };
        let user = match &messages[1] {
            ChatCompletionRequestMessage::User(m) => match &m.content {
                ChatCompletionRequestUserMessageContent::Text(t) => t.clone(),
                other => panic!("unexpected user content: {:?}", other),
            },
            other => panic!("expected user message, got {:?}", other),
        };
        (system, user)
    }

    #[test]
    fn test_only_leading_characters_are_sent() {
        let mut settings = SummarySettings::default();
        settings.max_input_chars = 5;
        let mut prompts = Prompts::default();
        prompts.summary.system = "Describe the episode.".to_string();
        prompts.summary.user = "<{{text}}>".to_string();
        let summarizer = OpenAISummarizer::from_settings(&settings)
            .unwrap()
            .with_prompts(prompts);

        let messages = summarizer.messages("Ёжик в тумане шёл домой.").unwrap();
        assert_eq!(messages.len(), 2);

        let (system, user) = contents(&messages);
        assert_eq!(system, "Describe the episode.");
        assert_eq!(user, "<Ёжик >");
    }

    #[test]
    fn test_short_chunk_is_sent_whole() {
        let summarizer = OpenAISummarizer::from_settings(&SummarySettings::default()).unwrap();

        let (_, user) = contents(&summarizer.messages("A short chunk.").unwrap());
        assert!(user.ends_with("A short chunk."));
        assert!(!user.contains("{{text}}"));
    }
}
