//! Tags each container child by its structural markers.
//!
//! Priority is fixed: date marker, then system notice, then message. Anything
//! else (spacers, "load more" buttons, unread dividers) is skipped.

use super::CompiledMarkers;
use crate::dom::TreeNode;

/// Classification of one container child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// Day separator with its trimmed label.
    DateMarker(String),
    /// Service notice with its trimmed text.
    SystemNotice(String),
    /// Candidate user message; resolution and body extraction follow.
    Message,
    Skip,
}

pub(crate) fn classify<N: TreeNode>(item: &N, markers: &CompiledMarkers) -> ItemKind {
    if !item.is_visible() {
        return ItemKind::Skip;
    }

    if item.matches(&markers.date_marker) {
        // A marker without a readable label carries nothing worth keeping.
        return match item.select_first(&markers.date_label).map(|l| l.text()) {
            Some(label) if !label.trim().is_empty() => ItemKind::DateMarker(label.trim().to_string()),
            _ => ItemKind::Skip,
        };
    }

    if item.matches(&markers.system_notice) {
        let text = item.text();
        let text = text.trim();
        return if text.is_empty() {
            ItemKind::Skip
        } else {
            ItemKind::SystemNotice(text.to_string())
        };
    }

    if item.matches(&markers.message) {
        return ItemKind::Message;
    }

    ItemKind::Skip
}
