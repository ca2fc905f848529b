//! JSON output writer.

use std::fs::File;
use std::io::Write;

use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::event::ConversationEvent;

/// Writes events to a JSON file as an array.
///
/// # Format
/// ```json
/// [
///   {"type": "dateMarker", "label": "2024-01-01"},
///   {"type": "message", "speaker": "Me", "isSelf": true, "time": "09:00", "body": "hi"}
/// ]
/// ```
pub fn write_json(events: &[ConversationEvent], output_path: &str, config: &OutputConfig) -> Result<()> {
    let json = to_json(events, config)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts events to a pretty-printed JSON array.
///
/// Same format as `write_json`, but returns a String instead of writing to file.
pub fn to_json(events: &[ConversationEvent], config: &OutputConfig) -> Result<String> {
    let selected = config.select(events);
    Ok(serde_json::to_string_pretty(&selected)?)
}
