//! Speech synthesis for chunk narration.

mod openai;

pub use openai::OpenAISpeech;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for text-to-speech services.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` and return the encoded audio.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}
