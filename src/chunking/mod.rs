//! Splitting source documents into narration-sized chunks.
//!
//! A chunk is bounded by a character budget derived from an assumed reading
//! rate and the maximum length of one audio part. Boundaries only fall between
//! sentences or lines; a single sentence longer than the budget is kept whole
//! and becomes an oversized chunk of its own.

mod cache;

pub use cache::ChunkCache;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A bounded slice of the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 1-based position in the document.
    pub index: usize,
    /// Trimmed text content.
    pub text: String,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(index: usize, text: String) -> Self {
        Self { index, text }
    }

    /// Length in characters (Unicode scalar values).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Configuration for chunk sizing.
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    /// Assumed narration rate in characters per minute.
    pub chars_per_minute: u32,
    /// Maximum duration of one audio part in minutes.
    pub max_minutes: u32,
}

impl ChunkingConfig {
    /// Character budget per chunk.
    pub fn max_chars(&self) -> usize {
        self.chars_per_minute as usize * self.max_minutes as usize
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chars_per_minute: 900,
            max_minutes: 30,
        }
    }
}

/// Splits text into chunks at sentence and line boundaries.
pub struct Segmenter {
    boundary: Regex,
    max_chars: usize,
}

impl Segmenter {
    /// Create a segmenter for the given configuration.
    pub fn new(config: &ChunkingConfig) -> Self {
        Self::with_max_chars(config.max_chars())
    }

    /// Create a segmenter with an explicit character budget.
    pub fn with_max_chars(max_chars: usize) -> Self {
        // A unit ends after a run of terminators (plus closing quotes or
        // brackets) followed by whitespace, or at a line break.
        let boundary = Regex::new(r#"[.!?…]+["'”’»)\]]*\s+|\n+"#).expect("Invalid regex");
        Self { boundary, max_chars }
    }

    /// Character budget per chunk.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Split text into atomic units, each keeping its trailing separator.
    fn units<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut units = Vec::new();
        let mut start = 0;

        for m in self.boundary.find_iter(text) {
            units.push(&text[start..m.end()]);
            start = m.end();
        }
        if start < text.len() {
            units.push(&text[start..]);
        }

        units
    }

    /// Split a document into chunks numbered from 1.
    ///
    /// Returns an empty vector for empty or whitespace-only text.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for unit in self.units(text) {
            let unit_len = unit.chars().count();

            if current_len > 0 && current_len + unit_len > self.max_chars {
                push_chunk(&mut chunks, &current);
                current.clear();
                current_len = 0;
            }

            current.push_str(unit);
            current_len += unit_len;
        }
        push_chunk(&mut chunks, &current);

        chunks
    }
}

/// Longest prefix of `text` with at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

fn push_chunk(chunks: &mut Vec<Chunk>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        chunks.push(Chunk::new(chunks.len() + 1, text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A sentence of exactly `len` characters including its trailing space.
    fn sentence(len: usize) -> String {
        let mut s = "a".repeat(len - 2);
        s.push_str(". ");
        s
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("привет", 2), "пр");
        assert_eq!(truncate_chars("", 2), "");
    }

    #[test]
    fn test_empty_document() {
        let segmenter = Segmenter::with_max_chars(100);
        assert!(segmenter.split("").is_empty());
        assert!(segmenter.split("  \n\n\t ").is_empty());
    }

    #[test]
    fn test_short_document_is_one_chunk() {
        let segmenter = Segmenter::with_max_chars(100);
        let chunks = segmenter.split("  One. Two!  Three?\n");
        assert_eq!(chunks, vec![Chunk::new(1, "One. Two!  Three?".to_string())]);
    }

    #[test]
    fn test_thirty_thousand_chars_make_two_chunks() {
        let text: String = (0..300).map(|_| sentence(100)).collect();
        assert_eq!(text.chars().count(), 30_000);

        let segmenter = Segmenter::new(&ChunkingConfig::default());
        let chunks = segmenter.split(&text);

        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].char_len() <= 27_000);
        assert_eq!(chunks[0].index, 1);
        assert_eq!(chunks[1].index, 2);
        assert_eq!(chunks[1].char_len(), 2_999);
    }

    #[test]
    fn test_budget_respected() {
        let text: String = (0..57).map(|i| sentence(10 + i % 40)).collect();
        let segmenter = Segmenter::with_max_chars(120);

        let chunks = segmenter.split(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.char_len() <= 120, "chunk {} too long", chunk.index);
        }
        // Indices are contiguous from 1.
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i + 1);
        }
    }

    #[test]
    fn test_oversized_sentence_kept_whole() {
        let long = format!("{}.", "b".repeat(250));
        let text = format!("Short one. {} Short two.", long);
        let segmenter = Segmenter::with_max_chars(100);

        let chunks = segmenter.split(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, "Short one.");
        assert_eq!(chunks[1].text, long);
        assert_eq!(chunks[2].text, "Short two.");
    }

    #[test]
    fn test_splits_at_line_breaks() {
        let text = "first line without stop\nsecond line without stop\n";
        let segmenter = Segmenter::with_max_chars(30);

        let chunks = segmenter.split(text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "first line without stop");
        assert_eq!(chunks[1].text, "second line without stop");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 20 Cyrillic characters per sentence, 40 bytes.
        let sentence = "Привет мир и всё т. ";
        assert_eq!(sentence.chars().count(), 20);
        let text = sentence.repeat(5);
        let segmenter = Segmenter::with_max_chars(60);

        let chunks = segmenter.split(&text);
        assert!(chunks.iter().all(|c| c.char_len() <= 60));
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        let text: String = (0..80).map(|i| sentence(20 + i % 13)).collect();
        let segmenter = Segmenter::with_max_chars(200);
        assert_eq!(segmenter.split(&text), segmenter.split(&text));
    }
}
