//! CSV output writer.

use std::fs::File;
use std::io::Write;

use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::event::ConversationEvent;

const HEADER: [&str; 5] = ["Type", "Speaker", "Self", "Time", "Body"];

/// Writes events to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `Type`, `Speaker`, `Self`, `Time`, `Body`
/// - Date markers and notices put their label/text in `Body` and leave the
///   message columns empty
/// - Encoding: UTF-8
pub fn write_csv(events: &[ConversationEvent], output_path: &str, config: &OutputConfig) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(events, config, file)
}

/// Converts events to a CSV string.
pub fn to_csv(events: &[ConversationEvent], config: &OutputConfig) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(events, config, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| {
        crate::error::TalkpackError::invalid_format("output", format!("CSV is not UTF-8: {e}"))
    })
}

fn write_records<W: Write>(events: &[ConversationEvent], config: &OutputConfig, sink: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(sink);

    writer.write_record(HEADER)?;
    for event in config.select(events) {
        writer.write_record(build_record(event))?;
    }

    writer.flush()?;
    Ok(())
}

fn build_record(event: &ConversationEvent) -> [String; 5] {
    match event {
        ConversationEvent::DateMarker { label } => {
            ["date".into(), String::new(), String::new(), String::new(), label.clone()]
        }
        ConversationEvent::SystemNotice { text } => {
            ["system".into(), String::new(), String::new(), String::new(), text.clone()]
        }
        ConversationEvent::Message(msg) => [
            "message".into(),
            msg.speaker.clone(),
            msg.is_self.to_string(),
            msg.time.clone(),
            msg.body.clone(),
        ],
    }
}
