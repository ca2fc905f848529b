//! Conversation events produced by extraction.
//!
//! A transcript is an ordered `Vec<ConversationEvent>`. Order always matches the
//! top-to-bottom order of the talk view the events were extracted from, and the
//! editing operations in [`core::processor`](crate::core::processor) only ever
//! move whole events or rewrite the `speaker` field.
//!
//! # Examples
//!
//! ```
//! use talkpack::ConversationEvent;
//!
//! let events = vec![
//!     ConversationEvent::date_marker("2024-01-01"),
//!     ConversationEvent::message("Me", true, "09:00", "hi"),
//! ];
//!
//! assert!(events[0].is_date_marker());
//! assert_eq!(events[1].as_message().unwrap().body, "hi");
//! ```
//!
//! ## Serialization
//!
//! Events use the camelCase wire form expected by the dispatch boundary:
//!
//! ```
//! use talkpack::ConversationEvent;
//!
//! let json = serde_json::to_string(&ConversationEvent::message("Alex", false, "", "hey"))?;
//! assert_eq!(
//!     json,
//!     r#"{"type":"message","speaker":"Alex","isSelf":false,"time":"","body":"hey"}"#
//! );
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Serialize};

/// One entry of an extracted transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConversationEvent {
    /// Day separator shown between messages, e.g. `2024. 1. 1 (Mon)`.
    DateMarker {
        /// Label text, trimmed.
        label: String,
    },

    /// Notice rendered by the service itself (joins, leaves, renames).
    SystemNotice {
        /// Notice text, trimmed.
        text: String,
    },

    /// A message posted by a participant.
    Message(MessageEvent),
}

/// A resolved user message.
///
/// `time` is `HH:MM` when the view exposed one, otherwise empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    /// Display name of the author, or the self label for own messages.
    pub speaker: String,

    /// Whether the transcript owner wrote this message.
    pub is_self: bool,

    /// Time of day as shown in the view; may be empty.
    #[serde(default)]
    pub time: String,

    /// Cleaned message text or an attachment placeholder.
    pub body: String,
}

impl MessageEvent {
    /// Creates a message event.
    pub fn new(
        speaker: impl Into<String>,
        is_self: bool,
        time: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            speaker: speaker.into(),
            is_self,
            time: time.into(),
            body: body.into(),
        }
    }

    /// Returns `true` if a time of day is attached.
    pub fn has_time(&self) -> bool {
        !self.time.is_empty()
    }
}

/// Discriminant of a [`ConversationEvent`], handy for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DateMarker,
    SystemNotice,
    Message,
}

impl ConversationEvent {
    /// Creates a date marker.
    pub fn date_marker(label: impl Into<String>) -> Self {
        ConversationEvent::DateMarker {
            label: label.into(),
        }
    }

    /// Creates a system notice.
    pub fn system_notice(text: impl Into<String>) -> Self {
        ConversationEvent::SystemNotice { text: text.into() }
    }

    /// Creates a message event.
    pub fn message(
        speaker: impl Into<String>,
        is_self: bool,
        time: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        ConversationEvent::Message(MessageEvent::new(speaker, is_self, time, body))
    }

    /// Returns the kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            ConversationEvent::DateMarker { .. } => EventKind::DateMarker,
            ConversationEvent::SystemNotice { .. } => EventKind::SystemNotice,
            ConversationEvent::Message(_) => EventKind::Message,
        }
    }

    /// Returns `true` for date markers.
    pub fn is_date_marker(&self) -> bool {
        matches!(self, ConversationEvent::DateMarker { .. })
    }

    /// Returns the date label if this is a date marker.
    pub fn date_label(&self) -> Option<&str> {
        match self {
            ConversationEvent::DateMarker { label } => Some(label),
            _ => None,
        }
    }

    /// Returns the message payload if this is a message.
    pub fn as_message(&self) -> Option<&MessageEvent> {
        match self {
            ConversationEvent::Message(msg) => Some(msg),
            _ => None,
        }
    }

    /// Returns the message payload mutably if this is a message.
    pub fn as_message_mut(&mut self) -> Option<&mut MessageEvent> {
        match self {
            ConversationEvent::Message(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<MessageEvent> for ConversationEvent {
    fn from(msg: MessageEvent) -> Self {
        ConversationEvent::Message(msg)
    }
}
