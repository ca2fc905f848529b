//! Editing operations on an extracted sequence.
//!
//! Extraction is never re-run to fix a transcript. Instead the event list is
//! edited in place: speakers are renamed in bulk and events are moved. Both
//! operations leave every other field untouched.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{Result, TalkpackError};
use crate::event::{ConversationEvent, EventKind};

/// Renames every message whose speaker is exactly `from`. Returns how many
/// messages changed.
///
/// # Example
/// Input:  [("Counterpart", "hi"), ("Me", "yo"), ("Counterpart", "bye")]
/// Rename "Counterpart" -> "Alex" changes 2 messages.
pub fn rename_speaker(events: &mut [ConversationEvent], from: &str, to: &str) -> usize {
    let mut renamed = 0;
    for msg in events.iter_mut().filter_map(ConversationEvent::as_message_mut) {
        if msg.speaker == from {
            msg.speaker = to.to_string();
            renamed += 1;
        }
    }
    renamed
}

/// Moves the event at `from` so it ends up at index `to`.
///
/// Everything between shifts by one; nothing else changes.
pub fn move_event(events: &mut Vec<ConversationEvent>, from: usize, to: usize) -> Result<()> {
    let len = events.len();
    if from >= len || to >= len {
        return Err(TalkpackError::InvalidMove { from, to, len });
    }
    let event = events.remove(from);
    events.insert(to, event);
    Ok(())
}

/// One day of a transcript, as offered for partial export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRange {
    /// Index of the date marker
    pub index: usize,
    pub label: String,
    /// Events in the day, marker included
    pub len: usize,
}

/// Lists the date-marker runs of a sequence.
///
/// Events before the first marker belong to no day and are not listed.
pub fn day_ranges(events: &[ConversationEvent]) -> Vec<DayRange> {
    let mut ranges: Vec<DayRange> = Vec::new();

    for (index, event) in events.iter().enumerate() {
        if let Some(label) = event.date_label() {
            ranges.push(DayRange {
                index,
                label: label.to_string(),
                len: 1,
            });
        } else if let Some(current) = ranges.last_mut() {
            current.len += 1;
        }
    }

    ranges
}

/// Statistics about an extracted sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    pub date_markers: usize,
    pub system_notices: usize,
    pub messages: usize,
    pub self_messages: usize,
    /// Distinct speakers, sorted
    pub speakers: BTreeSet<String>,
}

impl ExtractionStats {
    pub fn from_events(events: &[ConversationEvent]) -> Self {
        let mut stats = Self::default();
        for event in events {
            match event.kind() {
                EventKind::DateMarker => stats.date_markers += 1,
                EventKind::SystemNotice => stats.system_notices += 1,
                EventKind::Message => stats.messages += 1,
            }
            if let Some(msg) = event.as_message() {
                if msg.is_self {
                    stats.self_messages += 1;
                }
                stats.speakers.insert(msg.speaker.clone());
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.date_markers + self.system_notices + self.messages
    }

    /// Share of messages written by the transcript owner, in percent.
    pub fn self_ratio(&self) -> f64 {
        if self.messages == 0 {
            return 0.0;
        }
        self.self_messages as f64 / self.messages as f64 * 100.0
    }
}
