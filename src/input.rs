//! Loading captured pages from disk.
//!
//! Two capture forms are accepted:
//!
//! - a saved HTML page (`.html`, `.htm`), feature `html`
//! - a JSON snapshot (`.json`), see [`dom::snapshot`](crate::dom::snapshot)
//!
//! [`Input`] hides which one was loaded so callers can run extraction the
//! same way for both.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "html")]
use crate::dom::html::HtmlDocument;
use crate::dom::snapshot::Snapshot;
use crate::dom::{Document, Viewport};
use crate::error::{Result, TalkpackError};
use crate::event::ConversationEvent;
use crate::extract::Extractor;

/// Form of a captured page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Saved HTML page
    Html,
    /// JSON node table with geometry
    Snapshot,
}

impl InputKind {
    /// Detects the kind from a file extension.
    ///
    /// ```rust
    /// use talkpack::input::InputKind;
    ///
    /// assert_eq!(InputKind::from_path("talk.HTML").unwrap(), InputKind::Html);
    /// assert_eq!(InputKind::from_path("capture.json").unwrap(), InputKind::Snapshot);
    /// assert!(InputKind::from_path("talk.pdf").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "html" | "htm" | "xhtml" => Ok(InputKind::Html),
            "json" => Ok(InputKind::Snapshot),
            _ => Err(TalkpackError::invalid_format(
                "input",
                format!("Unknown file extension: '.{}'. Expected one of: html, htm, json", ext),
            )),
        }
    }

    /// Guesses the kind from content: a JSON object is a snapshot.
    pub fn sniff(content: &str) -> Self {
        if content.trim_start().starts_with('{') {
            InputKind::Snapshot
        } else {
            InputKind::Html
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Html => write!(f, "html"),
            InputKind::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// A loaded capture of either kind.
pub enum Input {
    #[cfg(feature = "html")]
    Html(HtmlDocument),
    Snapshot(Snapshot),
}

impl Input {
    /// Loads `path`; `kind` defaults to detection by extension, then content.
    pub fn load(path: impl AsRef<Path>, kind: Option<InputKind>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let kind = kind
            .or_else(|| InputKind::from_path(path).ok())
            .unwrap_or_else(|| InputKind::sniff(&content));
        debug!(path = %path.display(), %kind, "Loading capture");
        Self::parse_str(&content, kind)
    }

    /// Parses already-read content.
    pub fn parse_str(content: &str, kind: InputKind) -> Result<Self> {
        match kind {
            #[cfg(feature = "html")]
            InputKind::Html => Ok(Input::Html(HtmlDocument::parse(content))),
            #[cfg(not(feature = "html"))]
            InputKind::Html => Err(TalkpackError::invalid_format(
                "input",
                "HTML input requires the 'html' feature to be enabled",
            )),
            InputKind::Snapshot => Ok(Input::Snapshot(Snapshot::from_json(content)?)),
        }
    }

    pub fn kind(&self) -> InputKind {
        match self {
            #[cfg(feature = "html")]
            Input::Html(_) => InputKind::Html,
            Input::Snapshot(_) => InputKind::Snapshot,
        }
    }

    /// Viewport recorded by the capture, if any.
    pub fn viewport(&self) -> Option<Viewport> {
        match self {
            #[cfg(feature = "html")]
            Input::Html(doc) => doc.viewport(),
            Input::Snapshot(snap) => snap.viewport(),
        }
    }

    /// Runs one extraction pass over the capture.
    pub fn extract(&self, extractor: &Extractor) -> Vec<ConversationEvent> {
        match self {
            #[cfg(feature = "html")]
            Input::Html(doc) => extractor.extract_document(doc),
            Input::Snapshot(snap) => extractor.extract_document(snap),
        }
    }
}

/// A loaded capture that an [`Extractor`] can run over.
pub trait Capture {
    fn extract_with(&self, extractor: &Extractor) -> Vec<ConversationEvent>;
}

impl Capture for Snapshot {
    fn extract_with(&self, extractor: &Extractor) -> Vec<ConversationEvent> {
        extractor.extract_document(self)
    }
}

#[cfg(feature = "html")]
impl Capture for HtmlDocument {
    fn extract_with(&self, extractor: &Extractor) -> Vec<ConversationEvent> {
        extractor.extract_document(self)
    }
}

impl Capture for Input {
    fn extract_with(&self, extractor: &Extractor) -> Vec<ConversationEvent> {
        self.extract(extractor)
    }
}
