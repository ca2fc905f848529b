//! Speaker, alignment and time resolution for message items.
//!
//! Each field is resolved by its own ordered list of tiers; the first tier that
//! yields a value wins and later tiers are not consulted.
//!
//! | Field | Tiers |
//! |-------|-------|
//! | self flag | metadata `isMine`/`isMe` → item class markers → self icon outside quoted content → content box position |
//! | speaker | self label when self → metadata name → name header outside quoted content → continuation |
//! | time | metadata `messageTime` → time label outside quoted content → empty |
//!
//! Continuation covers the two ways the web client omits names: in a
//! one-to-one talk the other party is never named (use the conversation
//! title), and in a group only the first message of a run carries a header
//! (reuse the previous speaker).
//!
//! [`resolve`] is a pure function of the item and the incoming
//! [`ExtractionState`]; it returns the state for the next message instead of
//! mutating anything.

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::PassContext;
use crate::dom::TreeNode;

/// Context carried from one message to the next within a single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionState {
    /// Speaker of the previous message, `None` before the first one.
    pub last_speaker: Option<String>,
    pub last_is_self: bool,
    /// Fallback identity of the other party in a one-to-one talk.
    pub conversation_title: String,
}

impl ExtractionState {
    pub fn new(conversation_title: impl Into<String>) -> Self {
        Self {
            last_speaker: None,
            last_is_self: false,
            conversation_title: conversation_title.into(),
        }
    }

    /// State after `resolution`. Always overwrites, even for continuation
    /// results, so runs of unnamed messages can't drift.
    #[must_use]
    pub fn advance(&self, resolution: &Resolution) -> Self {
        Self {
            last_speaker: Some(resolution.speaker.clone()),
            last_is_self: resolution.is_self,
            conversation_title: self.conversation_title.clone(),
        }
    }

    /// Speaker to use when the item itself names nobody.
    pub fn continuation_speaker(&self) -> &str {
        match &self.last_speaker {
            Some(last) if !self.last_is_self => last,
            _ => &self.conversation_title,
        }
    }
}

/// What decided a message's speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakerSignal {
    /// Name from the metadata payload.
    MetadataName(String),
    /// Self flag from the metadata payload.
    MetadataSelf,
    /// Self inferred from class markers, the self icon or position.
    AlignedSelf,
    /// Name read from a header inside the item.
    HeaderName(String),
    /// Nothing in the item; continuation fallback applied.
    None,
}

/// Resolved identity and time of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub speaker: String,
    pub is_self: bool,
    /// `HH:MM` or empty.
    pub time: String,
    pub signal: SpeakerSignal,
}

/// Serialized record some message items carry (`data-for-copy`).
///
/// Only the fields the resolver reads are declared; the rest is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyPayload {
    #[serde(default)]
    pub message_time: Option<Value>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub writer_name: Option<String>,
    #[serde(default)]
    pub is_mine: Option<bool>,
    #[serde(default)]
    pub is_me: Option<bool>,
}

impl CopyPayload {
    /// Parses the attribute value, decoding `&quot;` entities first.
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        let decoded = raw.replace("&quot;", "\"").replace("&#34;", "\"");
        serde_json::from_str(&decoded)
    }

    /// First non-empty name field.
    pub fn name(&self) -> Option<&str> {
        [&self.sender_name, &self.user_name, &self.writer_name]
            .into_iter()
            .flatten()
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
    }

    pub fn is_self(&self) -> Option<bool> {
        self.is_mine.or(self.is_me)
    }

    /// `messageTime` as `HH:MM` in `offset`, or in local time when `None`.
    ///
    /// Accepts epoch milliseconds (number or digit string) and RFC 3339.
    pub fn time(&self, offset: Option<FixedOffset>) -> Option<String> {
        let instant = match self.message_time.as_ref()? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|f| f as i64))
                .and_then(DateTime::<Utc>::from_timestamp_millis)?,
            Value::String(text) => parse_time_string(text.trim())?,
            _ => return None,
        };
        Some(format_clock(instant, offset))
    }
}

fn parse_time_string(text: &str) -> Option<DateTime<Utc>> {
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse().ok().and_then(DateTime::<Utc>::from_timestamp_millis);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn format_clock(instant: DateTime<Utc>, offset: Option<FixedOffset>) -> String {
    match offset {
        Some(offset) => instant.with_timezone(&offset).format("%H:%M").to_string(),
        None => instant.with_timezone(&Local).format("%H:%M").to_string(),
    }
}

/// Resolves one message item against the incoming state.
pub(crate) fn resolve<N: TreeNode>(
    item: &N,
    state: &ExtractionState,
    ctx: &PassContext<'_>,
) -> (Resolution, ExtractionState) {
    let payload = read_payload(item, ctx);

    let metadata_self = payload.as_ref().and_then(CopyPayload::is_self);
    let (is_self, self_signal) = match metadata_self {
        Some(flag) => (flag, SpeakerSignal::MetadataSelf),
        None => (aligned_self(item, ctx), SpeakerSignal::AlignedSelf),
    };

    let (speaker, signal) = if is_self {
        (ctx.labels.self_name.clone(), self_signal)
    } else {
        payload
            .as_ref()
            .and_then(CopyPayload::name)
            .map(|name| (name.to_string(), SpeakerSignal::MetadataName(name.to_string())))
            .or_else(|| header_name(item, ctx).map(|name| (name.clone(), SpeakerSignal::HeaderName(name))))
            .unwrap_or_else(|| (state.continuation_speaker().to_string(), SpeakerSignal::None))
    };

    let time = payload
        .as_ref()
        .and_then(|p| p.time(ctx.offset))
        .or_else(|| time_label(item, ctx))
        .unwrap_or_default();

    let resolution = Resolution {
        speaker,
        is_self,
        time,
        signal,
    };
    let next = state.advance(&resolution);
    (resolution, next)
}

fn read_payload<N: TreeNode>(item: &N, ctx: &PassContext<'_>) -> Option<CopyPayload> {
    let raw = item.attribute(&ctx.markers.metadata_attribute)?;
    match CopyPayload::parse(raw) {
        Ok(payload) => Some(payload),
        Err(err) => {
            debug!(error = %err, "Ignoring malformed metadata payload");
            None
        }
    }
}

/// Structural and geometric self tiers (metadata is handled by the caller).
pub(crate) fn aligned_self<N: TreeNode>(item: &N, ctx: &PassContext<'_>) -> bool {
    self_by_class(item, ctx)
        .or_else(|| self_by_icon(item, ctx))
        .or_else(|| self_by_position(item, ctx))
        .unwrap_or(false)
}

pub(crate) fn self_by_class<N: TreeNode>(item: &N, ctx: &PassContext<'_>) -> Option<bool> {
    item.matches(&ctx.markers.self_item).then_some(true)
}

pub(crate) fn self_by_icon<N: TreeNode>(item: &N, ctx: &PassContext<'_>) -> Option<bool> {
    item.select_all(&ctx.markers.self_icon)
        .iter()
        .any(|icon| !icon.has_ancestor_within(&ctx.markers.quoted_region, item))
        .then_some(true)
}

/// Right-aligned content box means self. Unknown geometry says nothing.
pub(crate) fn self_by_position<N: TreeNode>(item: &N, ctx: &PassContext<'_>) -> Option<bool> {
    let content = item
        .select_first(&ctx.markers.content_box)
        .unwrap_or_else(|| item.clone());
    let rect = content.bounding_box()?;
    Some(rect.left > ctx.viewport_width * ctx.self_threshold)
}

/// Name from a header owned by this item, never one inside quoted content.
pub(crate) fn header_name<N: TreeNode>(item: &N, ctx: &PassContext<'_>) -> Option<String> {
    let markers = ctx.markers;
    item.select_all(&markers.name_header)
        .into_iter()
        .filter(|header| {
            !header.matches(&markers.foreign_header)
                && !header.has_ancestor_within(&markers.foreign_header, item)
        })
        .find_map(|header| {
            let name = header.select_first(&markers.name_label)?.text();
            let name = name.trim();
            (!name.is_empty()).then(|| name.to_string())
        })
}

pub(crate) fn time_label<N: TreeNode>(item: &N, ctx: &PassContext<'_>) -> Option<String> {
    let markers = ctx.markers;
    item.select_all(&markers.time_label)
        .into_iter()
        .filter(|label| !label.has_ancestor_within(&markers.quoted_region, item))
        .find_map(|label| {
            let text = label.text();
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
}
