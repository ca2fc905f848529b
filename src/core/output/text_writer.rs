//! Plain-text transcript writer.

use std::fs;

use chrono::Local;

use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::event::ConversationEvent;
use crate::transcript::format_at;

/// Writes the transcript to a file (UTF-8, no trailing newline).
pub fn write_text(events: &[ConversationEvent], output_path: &str, config: &OutputConfig) -> Result<()> {
    let text = to_text(events, config)?;
    fs::write(output_path, text)?;
    Ok(())
}

/// Renders the transcript as a string.
pub fn to_text(events: &[ConversationEvent], config: &OutputConfig) -> Result<String> {
    let selected: Vec<ConversationEvent> = config.select(events).into_iter().cloned().collect();
    let at = config
        .generated_at
        .unwrap_or_else(|| Local::now().naive_local());
    Ok(format_at(&selected, &config.labels, at))
}
