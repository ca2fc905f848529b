//! Configuration types for extraction and output.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`ExtractConfig`] - thresholds, markers and labels for one extractor
//! - [`Markers`] - the structural patterns that identify parts of the talk view
//! - [`Labels`] - fixed words written into events and transcripts, per [`Locale`]
//!
//! # Example
//!
//! ```rust
//! use talkpack::config::{ExtractConfig, Locale};
//!
//! let config = ExtractConfig::new()
//!     .with_locale(Locale::Ja)
//!     .with_viewport_width(1440.0)
//!     .with_conversation_title("Alex");
//!
//! assert_eq!(config.labels.self_name, "自分");
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for one extraction pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Structural patterns of the talk view (default: LINE WORKS web)
    pub markers: Markers,

    /// Words used for placeholders and fallback identities
    pub labels: Labels,

    /// Viewport width used when the captured document doesn't carry one (default: 1280)
    pub viewport_width: f64,

    /// Fraction of the viewport width beyond which a message box counts as
    /// right-aligned, i.e. written by the transcript owner (default: 0.3)
    pub self_threshold: f64,

    /// Widest footprint of the conversation list side panel, in pixels (default: 300)
    pub side_panel_max_width: f64,

    /// Offset applied to metadata timestamps, in minutes east of UTC
    /// (default: `None`, the machine's local offset)
    pub utc_offset_minutes: Option<i32>,

    /// Name used for the other party instead of the one read from the header
    pub conversation_title: Option<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            labels: Labels::default(),
            viewport_width: 1280.0,
            self_threshold: 0.3,
            side_panel_max_width: 300.0,
            utc_offset_minutes: None,
            conversation_title: None,
        }
    }
}

impl ExtractConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the labels with the preset for `locale`.
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.labels = Labels::for_locale(locale);
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    #[must_use]
    pub fn with_viewport_width(mut self, width: f64) -> Self {
        self.viewport_width = width;
        self
    }

    #[must_use]
    pub fn with_self_threshold(mut self, fraction: f64) -> Self {
        self.self_threshold = fraction;
        self
    }

    #[must_use]
    pub fn with_side_panel_max_width(mut self, width: f64) -> Self {
        self.side_panel_max_width = width;
        self
    }

    /// Pins metadata timestamps to a fixed offset instead of local time.
    #[must_use]
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = Some(minutes);
        self
    }

    /// Overrides the other party's name read from the view header.
    #[must_use]
    pub fn with_conversation_title(mut self, title: impl Into<String>) -> Self {
        self.conversation_title = Some(title.into());
        self
    }
}

/// How a transcript container is located by a ranked rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "pattern", rename_all = "snake_case")]
pub enum LocatorRule {
    /// The first node matching the pattern is the container.
    Node(String),
    /// The matched node wraps the container: use its first child element,
    /// or the node itself when it has none.
    FirstChildOf(String),
}

impl LocatorRule {
    pub fn pattern(&self) -> &str {
        match self {
            LocatorRule::Node(pattern) | LocatorRule::FirstChildOf(pattern) => pattern,
        }
    }
}

/// Structural patterns of the talk view.
///
/// Every field is a pattern string (see [`Pattern`](crate::dom::Pattern));
/// comma-separated alternatives are allowed everywhere. Defaults describe the
/// LINE WORKS web client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Ranked rules for finding the transcript container
    pub locators: Vec<LocatorRule>,
    /// Header nodes holding the conversation title, tried in order
    pub title: Vec<String>,
    /// Item that separates days
    pub date_marker: String,
    /// Label inside a date marker
    pub date_label: String,
    /// Item rendered by the service (joins, leaves, ...)
    pub system_notice: String,
    /// Item holding a user message
    pub message: String,
    /// Class markers on a message item meaning "written by me"
    pub self_item: String,
    /// Icon meaning "written by me" (ignored inside quoted regions)
    pub self_icon: String,
    /// Attribute carrying the serialized metadata record
    pub metadata_attribute: String,
    /// Box wrapping the message content; also the node measured for alignment
    pub content_box: String,
    /// Replied-to / forwarded content nested in a message
    pub quoted_region: String,
    /// Header element that may carry the author's name
    pub name_header: String,
    /// Name label inside a header element
    pub name_label: String,
    /// Time label of a message
    pub time_label: String,
    /// Text content of a message
    pub text_body: String,
    /// Sub-regions removed from the text content
    pub body_exclusions: Vec<String>,
    /// Sticker attachment
    pub sticker: String,
    /// File attachment name
    pub file_name: String,
    /// Image or other media attachment
    pub media: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            locators: vec![
                LocatorRule::Node(".chat_view".into()),
                LocatorRule::FirstChildOf("#chat_room_scroll".into()),
                LocatorRule::Node("#messageList".into()),
            ],
            title: vec![
                ".section_head .info_box .name".into(),
                ".header .title".into(),
                "header .tit".into(),
                "#header .name".into(),
            ],
            date_marker: ".inform_date".into(),
            date_label: ".date".into(),
            system_notice: ".inform_msg".into(),
            message: ".msg_wrap, .msg_rgt, .msg_lft".into(),
            self_item: ".msg_rgt, .my".into(),
            self_icon: ".ico_my".into(),
            metadata_attribute: "data-for-copy".into(),
            content_box: ".msg_box".into(),
            quoted_region: ".reply_box, .reply_msg, .reply_area, .quote_area, .src_message, .reply-source"
                .into(),
            name_header: "dt".into(),
            name_label: ".name".into(),
            time_label: ".date".into(),
            text_body: ".msg".into(),
            body_exclusions: vec![
                ".tit_note".into(),
                ".reply_area".into(),
                ".quote_area".into(),
                ".src_message".into(),
                ".reply-source".into(),
                ".forward-header".into(),
                ".connect".into(),
                ".desc".into(),
            ],
            sticker: ".sticker_box".into(),
            file_name: ".file_name".into(),
            media: ".thmb, img".into(),
        }
    }
}

/// Language of the fixed words written into events and transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Ja => write!(f, "ja"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "ja" | "jp" | "japanese" => Ok(Locale::Ja),
            _ => Err(format!("Unknown locale: '{}'. Expected one of: en, ja", s)),
        }
    }
}

/// Fixed words used by the extractor and the transcript formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Speaker of the transcript owner's messages
    pub self_name: String,
    /// Other party when the header carries no title
    pub counterpart: String,
    pub sticker: String,
    /// Word before the file name in `(file: report.pdf)`
    pub file: String,
    pub media: String,
    /// Tag in front of system notices
    pub system: String,
    /// First line of a transcript
    pub title: String,
    /// Caption of the generation timestamp line
    pub generated: String,
    /// Stem of suggested export file names
    pub file_stem: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self::for_locale(Locale::En)
    }
}

impl Labels {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self {
                self_name: "Me".into(),
                counterpart: "Counterpart".into(),
                sticker: "(sticker)".into(),
                file: "file".into(),
                media: "(image/media)".into(),
                system: "[System]".into(),
                title: "LINE WORKS Talk History".into(),
                generated: "Exported".into(),
                file_stem: "line_works_talk".into(),
            },
            Locale::Ja => Self {
                self_name: "自分".into(),
                counterpart: "相手".into(),
                sticker: "(スタンプ)".into(),
                file: "ファイル".into(),
                media: "(画像/メディア)".into(),
                system: "[システム]".into(),
                title: "LINE WORKS トーク履歴".into(),
                generated: "出力日時".into(),
                file_stem: "line_works_talk".into(),
            },
        }
    }

    /// Placeholder body for a file attachment.
    pub fn file_placeholder(&self, file_name: &str) -> String {
        format!("({}: {})", self.file, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_config_default() {
        let config = ExtractConfig::default();
        assert_eq!(config.viewport_width, 1280.0);
        assert_eq!(config.self_threshold, 0.3);
        assert_eq!(config.side_panel_max_width, 300.0);
        assert!(config.utc_offset_minutes.is_none());
        assert_eq!(config.labels.self_name, "Me");
    }

    #[test]
    fn test_extract_config_builder() {
        let config = ExtractConfig::new()
            .with_viewport_width(1000.0)
            .with_self_threshold(0.5)
            .with_side_panel_max_width(280.0)
            .with_utc_offset_minutes(540)
            .with_conversation_title("Alex");

        assert_eq!(config.viewport_width, 1000.0);
        assert_eq!(config.self_threshold, 0.5);
        assert_eq!(config.side_panel_max_width, 280.0);
        assert_eq!(config.utc_offset_minutes, Some(540));
        assert_eq!(config.conversation_title.as_deref(), Some("Alex"));
    }

    #[test]
    fn test_labels_locales() {
        let en = Labels::for_locale(Locale::En);
        assert_eq!(en.file_placeholder("report.pdf"), "(file: report.pdf)");
        assert_eq!(en.sticker, "(sticker)");

        let ja = Labels::for_locale(Locale::Ja);
        assert_eq!(ja.file_placeholder("資料.xlsx"), "(ファイル: 資料.xlsx)");
        assert_eq!(ja.counterpart, "相手");
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("ja".parse::<Locale>().unwrap(), Locale::Ja);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_config_partial_deserialize() {
        let config: ExtractConfig =
            serde_json::from_str(r#"{"viewport_width": 900, "markers": {"message": ".bubble"}}"#)
                .unwrap();
        assert_eq!(config.viewport_width, 900.0);
        assert_eq!(config.markers.message, ".bubble");
        assert_eq!(config.markers.text_body, ".msg");
        assert_eq!(config.self_threshold, 0.3);
    }

    #[test]
    fn test_locator_rule_serde() {
        let rule = LocatorRule::FirstChildOf("#chat_room_scroll".into());
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(json, r##"{"rule":"first_child_of","pattern":"#chat_room_scroll"}"##);
        assert_eq!(rule.pattern(), "#chat_room_scroll");
    }
}
