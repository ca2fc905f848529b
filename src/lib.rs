//! # Talkpack
//!
//! A Rust library for turning a rendered LINE WORKS talk view into an ordered
//! list of conversation events and a plain-text transcript.
//!
//! ## Overview
//!
//! The talk view is only available as a rendered page. Talkpack reads a
//! captured copy of that page and works out, item by item:
//! - **where** the transcript is (named containers first, then a layout scan)
//! - **what** each item is (date separator, system notice or message)
//! - **who** wrote a message and when (metadata, alignment, headers, continuation)
//! - **what** it says (text, or a placeholder for stickers, files and media)
//!
//! Captures come in two forms:
//! - **Snapshot** — a JSON node table with real geometry, produced inside the page
//! - **HTML** — a saved page, parsed with `scraper` (feature `html`)
//!
//! ## Quick Start
//!
//! ```rust
//! use talkpack::prelude::*;
//! use talkpack::dom::snapshot::Snapshot;
//!
//! fn main() -> Result<()> {
//!     let snapshot = Snapshot::from_json(r#"{"nodes": [
//!         {"tag": "body", "children": [1]},
//!         {"tag": "ul", "attrs": {"class": "chat_view"}, "children": [2, 4]},
//!         {"tag": "li", "attrs": {"class": "msg_rgt"}, "children": [3]},
//!         {"tag": "p", "attrs": {"class": "msg"}, "children": ["On my way"]},
//!         {"tag": "li", "attrs": {"class": "inform_msg"}, "children": ["Alex left."]}
//!     ]}"#)?;
//!
//!     let extractor = Extractor::new(ExtractConfig::default())?;
//!     let events = extractor.extract_document(&snapshot);
//!
//!     assert_eq!(events[0], ConversationEvent::message("Me", true, "", "On my way"));
//!     assert_eq!(events[1], ConversationEvent::system_notice("Alex left."));
//!
//!     let text = to_text(&events, &OutputConfig::new())?;
//!     assert!(text.ends_with("[System] Alex left."));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`dom`] — Read-only node capability and its two backends
//!   - [`TreeNode`](dom::TreeNode), [`Document`](dom::Document), [`Pattern`](dom::Pattern)
//! - [`extract`] — The extraction pass ([`Extractor`], [`extract()`])
//! - [`event`] — [`ConversationEvent`], [`MessageEvent`]
//! - [`transcript`] — Plain-text transcript layout and day ranges
//! - [`core`] — Editing ([`rename_speaker`](core::rename_speaker),
//!   [`move_event`](core::move_event)), statistics and output writers
//! - [`dispatch`] — Request/response boundary for triggering extraction
//! - [`input`] — Loading captures from disk
//! - [`config`] — [`ExtractConfig`], [`Markers`], [`Labels`], [`Locale`]
//! - [`format`] — Output format enum and dispatch to writers
//! - [`cli`] — CLI argument types (feature `cli`)
//! - [`error`] — Unified error types ([`TalkpackError`], [`Result`])
//! - [`prelude`] — Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod event;
pub mod extract;
pub mod format;
pub mod input;
pub mod transcript;

// Re-export the main types at the crate root for convenience
pub use config::{ExtractConfig, Labels, Locale, Markers};
pub use core::models::OutputConfig;
pub use error::{Result, TalkpackError};
pub use event::{ConversationEvent, EventKind, MessageEvent};
pub use extract::{Extractor, extract};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use talkpack::prelude::*;
/// ```
pub mod prelude {
    // Events
    pub use crate::event::{ConversationEvent, EventKind, MessageEvent};

    // Error types
    pub use crate::error::{Result, TalkpackError};

    // Extraction
    pub use crate::config::{ExtractConfig, Labels, Locale, Markers};
    pub use crate::dom::{Document, TreeNode};
    pub use crate::extract::Extractor;
    pub use crate::input::{Input, InputKind};

    // Editing and statistics
    pub use crate::core::processor::{
        DayRange, ExtractionStats, day_ranges, move_event, rename_speaker,
    };

    // Output
    pub use crate::core::models::OutputConfig;
    pub use crate::core::output::{to_text, write_text};
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};
    pub use crate::format::OutputFormat;
    pub use crate::transcript::{format_at, format_range_at};
}
