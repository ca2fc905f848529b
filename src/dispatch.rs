//! Request/response boundary for triggering extraction.
//!
//! Whatever transport carries it (a browser message, a pipe, the CLI's
//! `--response` flag), an extraction request gets exactly one response object:
//!
//! ```json
//! {"success": true, "events": [...], "formattedText": "...", "count": 3}
//! {"success": false, "error": "Invalid snapshot: node table is empty"}
//! ```
//!
//! A page without a transcript is a success with `count: 0`. Faults while
//! building the extractor or loading the capture become `success: false`, and
//! no partial event list is ever returned alongside an error.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ExtractConfig;
use crate::error::Result;
use crate::event::ConversationEvent;
use crate::extract::Extractor;
use crate::input::Capture;
use crate::transcript;

/// The only action understood by [`handle`].
pub const EXTRACT_ACTION: &str = "extractTalk";

/// Incoming request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    pub action: String,
    /// Also render the plain-text transcript into `formattedText`
    #[serde(default)]
    pub include_text: bool,
}

impl ExtractRequest {
    pub fn new(include_text: bool) -> Self {
        Self {
            action: EXTRACT_ACTION.to_string(),
            include_text,
        }
    }
}

/// Outgoing response; absent fields are omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<ConversationEvent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractResponse {
    pub fn success(events: Vec<ConversationEvent>, formatted_text: Option<String>) -> Self {
        Self {
            success: true,
            count: Some(events.len()),
            events: Some(events),
            formatted_text,
            error: None,
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            events: None,
            formatted_text: None,
            count: None,
            error: Some(error.to_string()),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Runs one extraction pass for `request`.
///
/// `load` is called only after the request and configuration were accepted.
///
/// ```rust
/// use talkpack::dispatch::{handle, ExtractRequest};
/// use talkpack::dom::snapshot::Snapshot;
/// use talkpack::ExtractConfig;
///
/// let response = handle(&ExtractRequest::new(false), ExtractConfig::default(), || {
///     Snapshot::from_json(r#"{"nodes": [{"tag": "body"}]}"#)
/// });
/// assert!(response.success);
/// assert_eq!(response.count, Some(0));
/// ```
pub fn handle<D, F>(request: &ExtractRequest, config: ExtractConfig, load: F) -> ExtractResponse
where
    D: Capture,
    F: FnOnce() -> Result<D>,
{
    if request.action != EXTRACT_ACTION {
        warn!(action = %request.action, "Unknown action");
        return ExtractResponse::failure(format!("Unknown action: '{}'", request.action));
    }

    let labels = config.labels.clone();
    let extractor = match Extractor::new(config) {
        Ok(extractor) => extractor,
        Err(err) => return ExtractResponse::failure(err),
    };
    let document = match load() {
        Ok(document) => document,
        Err(err) => return ExtractResponse::failure(err),
    };

    let events = document.extract_with(&extractor);
    info!(count = events.len(), "Extraction finished");

    let text = request
        .include_text
        .then(|| transcript::format(&events, &labels));
    ExtractResponse::success(events, text)
}
