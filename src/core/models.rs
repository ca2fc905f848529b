//! Output configuration shared by all writers.

use chrono::NaiveDateTime;

use crate::config::Labels;
use crate::event::ConversationEvent;

/// Controls which events reach the output and how text output is labeled.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Keep date markers (default: true)
    pub include_dates: bool,
    /// Keep system notices (default: true)
    pub include_notices: bool,
    /// Words used by the text transcript
    pub labels: Labels,
    /// Timestamp for the transcript header; `None` means "now"
    pub generated_at: Option<NaiveDateTime>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include_dates: true,
            include_notices: true,
            labels: Labels::default(),
            generated_at: None,
        }
    }
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_dates(mut self) -> Self {
        self.include_dates = false;
        self
    }

    pub fn without_notices(mut self) -> Self {
        self.include_notices = false;
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Fixes the header timestamp, making text output fully deterministic.
    pub fn with_generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Returns `true` if `event` should be written.
    pub fn includes(&self, event: &ConversationEvent) -> bool {
        match event {
            ConversationEvent::DateMarker { .. } => self.include_dates,
            ConversationEvent::SystemNotice { .. } => self.include_notices,
            ConversationEvent::Message(_) => true,
        }
    }

    /// Events that pass the include flags, in order.
    pub fn select<'a>(&self, events: &'a [ConversationEvent]) -> Vec<&'a ConversationEvent> {
        events.iter().filter(|e| self.includes(e)).collect()
    }
}
