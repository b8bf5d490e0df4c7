//! Delivery of finished audio parts to the destination channel.

mod telegram;

pub use telegram::TelegramPublisher;

use crate::chunking::truncate_chars;
use crate::error::Result;
use async_trait::async_trait;

/// Telegram's maximum caption length for media messages.
pub const TELEGRAM_CAPTION_LIMIT: usize = 1024;

/// An audio file ready to be sent.
#[derive(Debug, Clone)]
pub struct AudioAttachment {
    /// File name shown to recipients.
    pub file_name: String,
    /// Track title shown by players.
    pub title: String,
    /// Encoded audio.
    pub data: Vec<u8>,
}

/// Trait for message delivery services.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Send `audio` with `caption` to the configured destination.
    async fn publish(&self, audio: &AudioAttachment, caption: &str) -> Result<()>;
}

/// Join a header and a summary, shortening the summary so the caption fits in
/// `limit` characters.
pub fn build_caption(header: &str, summary: &str, limit: usize) -> String {
    const SEPARATOR: &str = "\n\n";

    let header = truncate_chars(header, limit);
    let summary = summary.trim();
    if summary.is_empty() {
        return header.to_string();
    }

    let used = header.chars().count() + SEPARATOR.chars().count();
    let available = limit.saturating_sub(used);
    if available == 0 {
        return header.to_string();
    }

    if summary.chars().count() <= available {
        format!("{}{}{}", header, SEPARATOR, summary)
    } else {
        let shortened = truncate_chars(summary, available - 1).trim_end();
        format!("{}{}{}…", header, SEPARATOR, shortened)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_fits() {
        let caption = build_caption("Book, part 1 of 3", "A quiet start.", TELEGRAM_CAPTION_LIMIT);
        assert_eq!(caption, "Book, part 1 of 3\n\nA quiet start.");
    }

    #[test]
    fn test_caption_truncates_summary() {
        let summary = "word ".repeat(400);
        let caption = build_caption("Header", &summary, TELEGRAM_CAPTION_LIMIT);

        assert!(caption.chars().count() <= TELEGRAM_CAPTION_LIMIT);
        assert!(caption.starts_with("Header\n\n"));
        assert!(caption.ends_with('…'));
    }

    #[test]
    fn test_caption_without_room_for_summary() {
        assert_eq!(build_caption("Header", "Summary", 7), "Header");
        assert_eq!(build_caption("Header", "", 100), "Header");
        assert_eq!(build_caption("Long header", "Summary", 4), "Long");
    }
}
