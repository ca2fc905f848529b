//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`] - Output format options
//! - [`Rename`] / [`Move`] - edit operations applied after extraction
//!
//! # Example
//!
//! ```rust
//! use clap::Parser;
//! use talkpack::cli::{Args, OutputFormat};
//!
//! let args = Args::parse_from(["talkpack", "talk.html", "-f", "json", "--rename", "Counterpart=Alex"]);
//! assert_eq!(args.format, OutputFormat::Json);
//! assert_eq!(args.rename[0].to, "Alex");
//! ```

use std::str::FromStr;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::Locale;
use crate::input::InputKind;

/// Turn a saved LINE WORKS talk view into a plain-text transcript
/// (or CSV / JSON / JSONL).
#[derive(Parser, Debug, Clone)]
#[command(name = "talkpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    talkpack talk.html
    talkpack capture.json -o talk.txt --locale ja
    talkpack talk.html --title Alex --rename Counterpart=Alex
    talkpack talk.html --list-days
    talkpack talk.html --day \"2024. 1. 1 (Mon)\" -f json
    talkpack capture.json --response")]
pub struct Args {
    /// Path to the captured page (.html or snapshot .json)
    pub input: String,

    /// Path to output file ("-" for stdout). Defaults to a timestamped name
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Input kind (detected from extension or content when omitted)
    #[arg(long, value_enum)]
    pub input_kind: Option<InputKind>,

    /// Language of labels and placeholders
    #[arg(long, value_enum, default_value = "en")]
    pub locale: Locale,

    /// Name of the other party in a one-to-one talk
    #[arg(long, value_name = "NAME")]
    pub title: Option<String>,

    /// Viewport width the page was rendered at, if the capture lacks one
    #[arg(long, value_name = "PX")]
    pub viewport_width: Option<f64>,

    /// Offset for metadata timestamps in minutes east of UTC (default: local time)
    #[arg(long, value_name = "MINUTES", allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,

    /// Export only the day with this date label
    #[arg(long, value_name = "LABEL")]
    pub day: Option<String>,

    /// Rename a speaker (repeatable)
    #[arg(long, value_name = "OLD=NEW")]
    pub rename: Vec<Rename>,

    /// Move an event from one index to another (repeatable, applied in order)
    #[arg(long = "move", value_name = "FROM:TO")]
    pub moves: Vec<Move>,

    /// Drop date markers from the output
    #[arg(long)]
    pub no_dates: bool,

    /// Drop system notices from the output
    #[arg(long)]
    pub no_notices: bool,

    /// List the days found in the capture and exit
    #[arg(long)]
    pub list_days: bool,

    /// Print the dispatch response object as JSON instead of writing a file
    #[arg(long)]
    pub response: bool,

    /// Verbose logging (same as RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

/// `OLD=NEW` speaker rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

impl FromStr for Rename {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((from, to)) if !from.is_empty() => Ok(Rename {
                from: from.to_string(),
                to: to.to_string(),
            }),
            _ => Err(format!("Expected OLD=NEW, got '{}'", s)),
        }
    }
}

/// `FROM:TO` event move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

impl FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s
            .split_once(':')
            .and_then(|(from, to)| Some((from.trim().parse().ok()?, to.trim().parse().ok()?)));
        match parsed {
            Some((from, to)) => Ok(Move { from, to }),
            None => Err(format!("Expected FROM:TO with two indices, got '{}'", s)),
        }
    }
}

/// Output format options.
///
/// - [`Text`](OutputFormat::Text) - plain-text transcript (default)
/// - [`Csv`](OutputFormat::Csv) - one row per event
/// - [`Json`](OutputFormat::Json) - structured array of events
/// - [`Jsonl`](OutputFormat::Jsonl) - one event per line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain-text transcript
    #[default]
    #[value(alias = "txt")]
    Text,

    /// CSV with semicolon delimiter
    Csv,

    /// JSON array of events
    Json,

    /// JSON Lines - one JSON object per line
    #[value(alias = "ndjson")]
    Jsonl,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        crate::format::OutputFormat::from(*self).extension()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::OutputFormat::from(*self))
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match crate::format::OutputFormat::from_str(s)? {
            crate::format::OutputFormat::Text => Ok(OutputFormat::Text),
            crate::format::OutputFormat::Csv => Ok(OutputFormat::Csv),
            crate::format::OutputFormat::Json => Ok(OutputFormat::Json),
            crate::format::OutputFormat::Jsonl => Ok(OutputFormat::Jsonl),
        }
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Text => crate::format::OutputFormat::Text,
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}
