//! JSON Lines output writer.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::event::ConversationEvent;

/// Writes events to a JSONL file, one event per line.
pub fn write_jsonl(events: &[ConversationEvent], output_path: &str, config: &OutputConfig) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    for event in config.select(events) {
        let line = serde_json::to_string(event)?;
        writeln!(writer, "{line}")?;
    }

    writer.flush()?;
    Ok(())
}

/// Converts events to a JSONL string (each line newline-terminated).
pub fn to_jsonl(events: &[ConversationEvent], config: &OutputConfig) -> Result<String> {
    let mut out = String::new();
    for event in config.select(events) {
        out.push_str(&serde_json::to_string(event)?);
        out.push('\n');
    }
    Ok(out)
}
