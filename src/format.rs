//! Output format types for the talkpack library.
//!
//! This module provides library-first format types that don't depend on CLI
//! frameworks.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> talkpack::Result<()> {
//! use talkpack::format::{OutputFormat, write_to_format};
//! use talkpack::core::models::OutputConfig;
//! use talkpack::ConversationEvent;
//!
//! let events = vec![ConversationEvent::message("Me", true, "09:00", "hi")];
//!
//! // Write using format enum
//! write_to_format(&events, "talk.csv", OutputFormat::Csv, &OutputConfig::new())?;
//!
//! // Or use format detection from extension
//! let format = OutputFormat::from_path("talk.jsonl")?;
//! assert_eq!(format, OutputFormat::Jsonl);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::core::models::OutputConfig;
use crate::error::TalkpackError;
use crate::event::ConversationEvent;

/// Output format for talk exports.
///
/// - [`Text`](OutputFormat::Text) - the plain-text transcript (default)
/// - [`Csv`](OutputFormat::Csv) - one row per event, semicolon-delimited
/// - [`Json`](OutputFormat::Json) - array of events in the dispatch wire form
/// - [`Jsonl`](OutputFormat::Jsonl) - one event per line
///
/// # Example
///
/// ```rust
/// use talkpack::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("jsonl").unwrap();
/// assert_eq!(format, OutputFormat::Jsonl);
/// assert_eq!(format.extension(), "jsonl");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Plain-text transcript
    #[default]
    Text,

    /// CSV with semicolon delimiter
    Csv,

    /// JSON array of events
    Json,

    /// JSON Lines - one JSON object per line
    Jsonl,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    ///
    /// # Example
    ///
    /// ```rust
    /// use talkpack::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Text.extension(), "txt");
    /// assert_eq!(OutputFormat::Jsonl.extension(), "jsonl");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["text", "txt", "csv", "json", "jsonl", "ndjson"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::Text,
            OutputFormat::Csv,
            OutputFormat::Json,
            OutputFormat::Jsonl,
        ]
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text/plain",
            OutputFormat::Csv => "text/csv",
            OutputFormat::Json => "application/json",
            OutputFormat::Jsonl => "application/x-ndjson",
        }
    }

    /// Detects format from a file path based on extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use talkpack::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("talk.txt").unwrap(), OutputFormat::Text);
    /// assert!(OutputFormat::from_path("talk.pdf").is_err());
    /// ```
    pub fn from_path(path: &str) -> Result<Self, TalkpackError> {
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();

        match ext.as_str() {
            "txt" | "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(TalkpackError::invalid_format(
                "output",
                format!(
                    "Unknown file extension: '.{}'. Expected one of: txt, csv, json, jsonl",
                    ext
                ),
            )),
        }
    }

    #[allow(dead_code)]
    fn required_feature(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Text => None,
            OutputFormat::Csv => Some("csv-output"),
            OutputFormat::Json | OutputFormat::Jsonl => Some("json-output"),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "Text"),
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

#[allow(dead_code)]
fn feature_missing(format: OutputFormat) -> TalkpackError {
    TalkpackError::invalid_format(
        "output",
        format!(
            "Output format {:?} requires the '{}' feature to be enabled",
            format,
            format.required_feature().unwrap_or("default")
        ),
    )
}

/// Writes events to a file in the specified format.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
#[allow(unused_variables)]
pub fn write_to_format(
    events: &[ConversationEvent],
    path: &str,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<(), TalkpackError> {
    match format {
        OutputFormat::Text => crate::core::output::write_text(events, path, config),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(events, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(events, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(events, path, config),
        #[allow(unreachable_patterns)]
        _ => Err(feature_missing(format)),
    }
}

/// Converts events to a string in the specified format.
///
/// # Example
///
/// ```rust
/// use talkpack::format::{OutputFormat, to_format_string};
/// use talkpack::core::models::OutputConfig;
/// use talkpack::ConversationEvent;
///
/// let events = vec![ConversationEvent::message("Me", true, "", "hi")];
/// let text = to_format_string(&events, OutputFormat::Text, &OutputConfig::new())?;
/// assert!(text.ends_with("Me:\n「hi」"));
/// # Ok::<(), talkpack::TalkpackError>(())
/// ```
#[allow(unused_variables)]
pub fn to_format_string(
    events: &[ConversationEvent],
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<String, TalkpackError> {
    match format {
        OutputFormat::Text => crate::core::output::to_text(events, config),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(events, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(events, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(events, config),
        #[allow(unreachable_patterns)]
        _ => Err(feature_missing(format)),
    }
}
