//! One-sentence chunk descriptions used as message captions.

mod openai;

pub use openai::OpenAISummarizer;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for text summarization services.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Describe `text` in one sentence.
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// Reduce a model answer to a single clean line.
///
/// Takes the first non-empty line and strips surrounding quotes.
pub fn clean_summary(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = line
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '«' | '»' | '“' | '”'))
        .trim();
    (!line.is_empty()).then(|| line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_summary() {
        assert_eq!(
            clean_summary("\n  \"The hero leaves home.\"\nSecond line").as_deref(),
            Some("The hero leaves home.")
        );
        assert_eq!(clean_summary("«Буря начинается.»").as_deref(), Some("Буря начинается."));
        assert_eq!(clean_summary("   \n \"\" "), None);
    }
}
