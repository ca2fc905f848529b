//! Plain-text transcript formatting.
//!
//! The text layout is the on-disk contract of an export:
//!
//! ```text
//! LINE WORKS Talk History
//! Exported: 2024-01-01 12:00:00
//! ==================================================
//!
//! ---------------- 2024-01-01 ----------------
//!
//! [System] Alex joined.
//!
//! Me (09:00):
//! 「hi」
//! ```
//!
//! [`Labels`] localizes the words, never the layout. Apart from the
//! generation timestamp the output is a pure function of the events.

use chrono::{Local, NaiveDateTime};

use crate::config::Labels;
use crate::error::{Result, TalkpackError};
use crate::event::{ConversationEvent, MessageEvent};

/// Width of the line under the header.
pub const SEPARATOR_WIDTH: usize = 50;

const DATE_RULE: &str = "----------------";
const QUOTE_OPEN: char = '「';
const QUOTE_CLOSE: char = '」';

/// Formats `events` with the current local time in the header.
pub fn format(events: &[ConversationEvent], labels: &Labels) -> String {
    format_at(events, labels, Local::now().naive_local())
}

/// Formats `events` with an explicit generation timestamp.
///
/// ```rust
/// use chrono::NaiveDate;
/// use talkpack::transcript::format_at;
/// use talkpack::{ConversationEvent, Labels};
///
/// let at = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let text = format_at(&[ConversationEvent::message("Me", true, "09:00", "hi")], &Labels::default(), at);
/// assert!(text.ends_with("Me (09:00):\n「hi」"));
/// ```
pub fn format_at(events: &[ConversationEvent], labels: &Labels, at: NaiveDateTime) -> String {
    let mut out = header(labels, at);
    let paragraphs: Vec<String> = events.iter().map(|e| paragraph(e, labels)).collect();
    out.push_str(&paragraphs.join("\n\n"));
    out
}

/// Formats one day: the date marker at `start` and everything up to the next
/// date marker.
pub fn format_range(events: &[ConversationEvent], start: usize, labels: &Labels) -> Result<String> {
    format_range_at(events, start, labels, Local::now().naive_local())
}

pub fn format_range_at(
    events: &[ConversationEvent],
    start: usize,
    labels: &Labels,
    at: NaiveDateTime,
) -> Result<String> {
    let day = day_slice(events, start)?;
    Ok(format_at(day, labels, at))
}

/// The run of events belonging to the date marker at `start`.
pub fn day_slice(events: &[ConversationEvent], start: usize) -> Result<&[ConversationEvent]> {
    let first = events.get(start).ok_or_else(|| {
        TalkpackError::invalid_range(start, format!("sequence has {} events", events.len()))
    })?;
    if !first.is_date_marker() {
        return Err(TalkpackError::invalid_range(start, "event is not a date marker"));
    }

    let end = events[start + 1..]
        .iter()
        .position(ConversationEvent::is_date_marker)
        .map_or(events.len(), |offset| start + 1 + offset);
    Ok(&events[start..end])
}

/// Single-message snippet, same layout as a message paragraph.
pub fn format_message(message: &MessageEvent) -> String {
    let time = if message.time.is_empty() {
        String::new()
    } else {
        format!(" ({})", message.time)
    };
    format!(
        "{}{}:\n{}{}{}",
        message.speaker, time, QUOTE_OPEN, message.body, QUOTE_CLOSE
    )
}

/// Suggested file name for an export generated at `at`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use talkpack::transcript::export_file_name;
/// use talkpack::Labels;
///
/// let at = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(7, 8, 9).unwrap();
/// assert_eq!(export_file_name(&Labels::default(), at), "line_works_talk_2024-03-05T07-08-09.txt");
/// ```
pub fn export_file_name(labels: &Labels, at: NaiveDateTime) -> String {
    format!("{}_{}.txt", labels.file_stem, at.format("%Y-%m-%dT%H-%M-%S"))
}

fn header(labels: &Labels, at: NaiveDateTime) -> String {
    format!(
        "{}\n{}: {}\n{}\n\n",
        labels.title,
        labels.generated,
        at.format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(SEPARATOR_WIDTH)
    )
}

fn paragraph(event: &ConversationEvent, labels: &Labels) -> String {
    match event {
        ConversationEvent::DateMarker { label } => format!("{DATE_RULE} {label} {DATE_RULE}"),
        ConversationEvent::SystemNotice { text } => format!("{} {}", labels.system, text),
        ConversationEvent::Message(message) => format_message(message),
    }
}
