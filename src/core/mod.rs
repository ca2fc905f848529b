//! Post-extraction processing for talkpack.
//!
//! This module contains:
//! - [`models`] - Output configuration
//! - [`processor`] - Speaker renaming, reordering, day ranges and statistics
//! - [`output`] - Format writers (text, CSV, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! use talkpack::core::{ExtractionStats, OutputConfig, day_ranges, rename_speaker, to_text};
//! use talkpack::ConversationEvent;
//!
//! let mut events = vec![
//!     ConversationEvent::date_marker("2024-01-01"),
//!     ConversationEvent::message("Counterpart", false, "", "hey"),
//! ];
//! rename_speaker(&mut events, "Counterpart", "Alex");
//!
//! assert_eq!(day_ranges(&events)[0].len, 2);
//! assert_eq!(ExtractionStats::from_events(&events).messages, 1);
//! assert!(to_text(&events, &OutputConfig::new())?.contains("Alex:"));
//! # Ok::<(), talkpack::TalkpackError>(())
//! ```

pub mod models;
pub mod output;
pub mod processor;

pub use models::OutputConfig;

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
pub use output::{to_text, write_text};

pub use processor::{DayRange, ExtractionStats, day_ranges, move_event, rename_speaker};
