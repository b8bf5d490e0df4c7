//! Configuration module for Recite.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, SummaryPrompts};
pub use settings::{
    ChunkingSettings, GeneralSettings, PromptSettings, PublishSettings, Settings,
    SpeechSettings, SummarySettings,
};
