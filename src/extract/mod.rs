//! Extraction engine: captured talk view in, ordered events out.
//!
//! One pass runs the stages in order:
//!
//! 1. [`locator`] finds the container whose children are transcript items
//! 2. [`classifier`] tags each child as date marker, system notice, message or noise
//! 3. [`speaker`] resolves author, alignment and time, threading an
//!    [`ExtractionState`] from one message to the next
//! 4. [`body`] extracts the cleaned text or an attachment placeholder
//!
//! Missing structural signals never fail a pass. A page without a recognizable
//! container yields an empty sequence.
//!
//! # Example
//!
//! ```rust
//! use talkpack::dom::snapshot::Snapshot;
//! use talkpack::extract::Extractor;
//! use talkpack::ExtractConfig;
//!
//! let snapshot = Snapshot::from_json(r#"{"nodes": [
//!     {"tag": "body", "children": [1]},
//!     {"tag": "div", "attrs": {"class": "chat_view"}, "children": [2]},
//!     {"tag": "div", "attrs": {"class": "inform_date"}, "children": [3]},
//!     {"tag": "span", "attrs": {"class": "date"}, "children": ["2024-01-01"]}
//! ]}"#)?;
//!
//! let extractor = Extractor::new(ExtractConfig::default())?;
//! let events = extractor.extract_document(&snapshot);
//! assert_eq!(events[0].date_label(), Some("2024-01-01"));
//! # Ok::<(), talkpack::TalkpackError>(())
//! ```

pub mod body;
pub mod classifier;
pub mod locator;
pub mod speaker;

pub use classifier::ItemKind;
pub use locator::Located;
pub use speaker::{ExtractionState, Resolution, SpeakerSignal};

use chrono::FixedOffset;
use tracing::{debug, info, warn};

use crate::config::{ExtractConfig, Labels, LocatorRule};
use crate::dom::{Document, Pattern, TreeNode, Viewport};
use crate::error::{Result, TalkpackError};
use crate::event::{ConversationEvent, MessageEvent};

/// Marker patterns compiled from [`Markers`](crate::config::Markers).
#[derive(Debug, Clone)]
pub(crate) struct CompiledMarkers {
    pub locators: Vec<(LocatorRule, Pattern)>,
    pub title: Vec<Pattern>,
    pub date_marker: Pattern,
    pub date_label: Pattern,
    pub system_notice: Pattern,
    pub message: Pattern,
    /// Union of the three item patterns, used by the geometric container scan
    pub item_like: Pattern,
    pub self_item: Pattern,
    pub self_icon: Pattern,
    pub metadata_attribute: String,
    pub content_box: Pattern,
    pub quoted_region: Pattern,
    /// Regions whose name headers belong to someone else (content box + quoted)
    pub foreign_header: Pattern,
    pub name_header: Pattern,
    pub name_label: Pattern,
    pub time_label: Pattern,
    pub text_body: Pattern,
    pub body_exclusions: Pattern,
    pub sticker: Pattern,
    pub file_name: Pattern,
    pub media: Pattern,
}

impl CompiledMarkers {
    fn compile(config: &ExtractConfig) -> Result<Self> {
        let m = &config.markers;

        let locators = m
            .locators
            .iter()
            .map(|rule| Ok((rule.clone(), Pattern::parse(rule.pattern())?)))
            .collect::<Result<Vec<_>>>()?;
        let title = m
            .title
            .iter()
            .map(|source| Pattern::parse(source))
            .collect::<Result<Vec<_>>>()?;
        let quoted_region = Pattern::parse(&m.quoted_region)?;

        Ok(Self {
            locators,
            title,
            date_marker: Pattern::parse(&m.date_marker)?,
            date_label: Pattern::parse(&m.date_label)?,
            system_notice: Pattern::parse(&m.system_notice)?,
            message: Pattern::parse(&m.message)?,
            item_like: Pattern::from_list(&[&m.date_marker, &m.system_notice, &m.message])?,
            self_item: Pattern::parse(&m.self_item)?,
            self_icon: Pattern::parse(&m.self_icon)?,
            metadata_attribute: m.metadata_attribute.clone(),
            content_box: Pattern::parse(&m.content_box)?,
            // Quoted content never belongs to the body, whichever list names it
            body_exclusions: Pattern::from_list(&m.body_exclusions)?.union(&quoted_region),
            quoted_region,
            foreign_header: Pattern::from_list(&[&m.content_box, &m.quoted_region])?,
            name_header: Pattern::parse(&m.name_header)?,
            name_label: Pattern::parse(&m.name_label)?,
            time_label: Pattern::parse(&m.time_label)?,
            text_body: Pattern::parse(&m.text_body)?,
            sticker: Pattern::parse(&m.sticker)?,
            file_name: Pattern::parse(&m.file_name)?,
            media: Pattern::parse(&m.media)?,
        })
    }
}

/// Everything a single pass needs besides the tree and the carried state.
pub(crate) struct PassContext<'a> {
    pub markers: &'a CompiledMarkers,
    pub labels: &'a Labels,
    pub viewport_width: f64,
    pub self_threshold: f64,
    pub side_panel_max_width: f64,
    pub offset: Option<FixedOffset>,
}

/// A configured, reusable extractor.
///
/// Building one compiles every marker pattern; a bad pattern fails here, not
/// in the middle of a page. Each call to [`extract`](Self::extract) is an
/// independent pass with fresh state.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractConfig,
    markers: CompiledMarkers,
    offset: Option<FixedOffset>,
}

impl Extractor {
    /// Compiles the configuration into an extractor.
    pub fn new(config: ExtractConfig) -> Result<Self> {
        let markers = CompiledMarkers::compile(&config)?;
        let offset = config.utc_offset_minutes.map(fixed_offset).transpose()?;
        Ok(Self {
            config,
            markers,
            offset,
        })
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extracts events from a captured document, using its recorded viewport
    /// when there is one.
    pub fn extract_document<D: Document>(&self, document: &D) -> Vec<ConversationEvent> {
        self.extract_with_viewport(&document.root(), document.viewport())
    }

    /// Extracts events below `root` assuming the configured viewport width.
    pub fn extract<N: TreeNode>(&self, root: &N) -> Vec<ConversationEvent> {
        self.extract_with_viewport(root, None)
    }

    /// Extracts events below `root`; `viewport` overrides the configured width.
    pub fn extract_with_viewport<N: TreeNode>(
        &self,
        root: &N,
        viewport: Option<Viewport>,
    ) -> Vec<ConversationEvent> {
        let ctx = self.context(viewport);

        let Some(located) = locator::locate(root, &ctx) else {
            warn!("No transcript container found");
            return Vec::new();
        };
        info!(via = %located.via, "Transcript container found");

        let title = self.conversation_title(root);
        let mut state = ExtractionState::new(title);
        let mut events = Vec::new();

        for item in located.container.children() {
            match classifier::classify(&item, ctx.markers) {
                ItemKind::DateMarker(label) => events.push(ConversationEvent::DateMarker { label }),
                ItemKind::SystemNotice(text) => {
                    events.push(ConversationEvent::SystemNotice { text });
                }
                ItemKind::Message => {
                    let (resolution, next) = speaker::resolve(&item, &state, &ctx);
                    state = next;
                    match body::extract_body(&item, &resolution, &ctx) {
                        Some(body) => events.push(ConversationEvent::Message(MessageEvent {
                            speaker: resolution.speaker,
                            is_self: resolution.is_self,
                            time: resolution.time,
                            body,
                        })),
                        None => debug!("Dropping message item without content"),
                    }
                }
                ItemKind::Skip => {}
            }
        }

        debug!(count = events.len(), "Extraction pass finished");
        events
    }

    /// Resolves the other party's name for a one-to-one conversation.
    ///
    /// The configured override wins, then the first header pattern with
    /// non-empty text, then the counterpart label.
    pub fn conversation_title<N: TreeNode>(&self, root: &N) -> String {
        if let Some(title) = &self.config.conversation_title {
            return title.clone();
        }

        let found = self.markers.title.iter().find_map(|pattern| {
            let text = root.select_first(pattern)?.text();
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        });

        match found {
            Some(title) => {
                info!(title = %title, "Conversation title found");
                title
            }
            None => self.config.labels.counterpart.clone(),
        }
    }

    fn context(&self, viewport: Option<Viewport>) -> PassContext<'_> {
        let viewport_width = viewport
            .map(|v| v.width)
            .filter(|width| *width > 0.0)
            .unwrap_or(self.config.viewport_width);

        PassContext {
            markers: &self.markers,
            labels: &self.config.labels,
            viewport_width,
            self_threshold: self.config.self_threshold,
            side_panel_max_width: self.config.side_panel_max_width,
            offset: self.offset,
        }
    }
}

/// Offsets must stay strictly within a day either side of UTC.
fn fixed_offset(minutes: i32) -> Result<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            TalkpackError::invalid_format(
                "UTC offset",
                format!("{} minutes is not within 24 hours of UTC", minutes),
            )
        })
}

/// Extracts events with the default configuration.
///
/// ```rust
/// use talkpack::dom::snapshot::Snapshot;
/// use talkpack::dom::Document;
///
/// let snapshot = Snapshot::from_json(r#"{"nodes": [{"tag": "body"}]}"#)?;
/// assert!(talkpack::extract(&snapshot.root())?.is_empty());
/// # Ok::<(), talkpack::TalkpackError>(())
/// ```
pub fn extract<N: TreeNode>(root: &N) -> Result<Vec<ConversationEvent>> {
    Ok(Extractor::new(ExtractConfig::default())?.extract(root))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::dom::snapshot::Snapshot;

    /// Builds a snapshot from `(tag, class, rect, children)` style JSON.
    pub fn snapshot(json: &str) -> Snapshot {
        Snapshot::from_json(json).unwrap()
    }

    pub fn default_markers() -> CompiledMarkers {
        CompiledMarkers::compile(&ExtractConfig::default()).unwrap()
    }

    pub fn context<'a>(markers: &'a CompiledMarkers, labels: &'a Labels) -> PassContext<'a> {
        PassContext {
            markers,
            labels,
            viewport_width: 1280.0,
            self_threshold: 0.3,
            side_panel_max_width: 300.0,
            offset: FixedOffset::east_opt(0),
        }
    }
}
