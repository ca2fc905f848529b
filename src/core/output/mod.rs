//! Output format writers.
//!
//! This module provides writers for different output formats:
//! - [`write_text`] / [`to_text`] - the plain-text transcript (always available)
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON array of events - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines, one event per line - requires `json-output` feature
//!
//! # Choosing a Format
//!
//! | Format | Use Case |
//! |--------|----------|
//! | Text | Reading, archiving, pasting into a mail |
//! | CSV | Spreadsheets |
//! | JSON | Re-importing, editing tools |
//! | JSONL | Streaming into other pipelines |
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> talkpack::Result<()> {
//! use talkpack::core::output::{write_csv, write_json, write_text, to_jsonl};
//! use talkpack::core::models::OutputConfig;
//! use talkpack::ConversationEvent;
//!
//! let events = vec![
//!     ConversationEvent::date_marker("2024-01-01"),
//!     ConversationEvent::message("Me", true, "09:00", "hi"),
//! ];
//!
//! let config = OutputConfig::new();
//!
//! write_text(&events, "talk.txt", &config)?;
//! write_csv(&events, "talk.csv", &config)?;
//! write_json(&events, "talk.json", &config)?;
//!
//! let jsonl = to_jsonl(&events, &config)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;
mod text_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};
pub use text_writer::{to_text, write_text};
