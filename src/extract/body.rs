//! Message body extraction.
//!
//! Tiers, first non-empty wins:
//!
//! 1. text content with quoted, forwarded and link-card regions removed
//! 2. sticker placeholder
//! 3. file placeholder carrying the file name
//! 4. image/media placeholder
//! 5. the item's own visible text (quoted regions removed) minus the resolved
//!    speaker and time
//!
//! Markers inside a quoted region belong to the quoted message, so every tier
//! looks only at the item's own nodes. An item where every tier comes up empty
//! has no content and is dropped.

use tracing::debug;

use super::PassContext;
use super::speaker::Resolution;
use crate::dom::{Pattern, TreeNode};
use crate::dom::text::visible_text;

pub(crate) fn extract_body<N: TreeNode>(
    item: &N,
    resolution: &Resolution,
    ctx: &PassContext<'_>,
) -> Option<String> {
    text_content(item, ctx)
        .or_else(|| sticker(item, ctx))
        .or_else(|| file(item, ctx))
        .or_else(|| media(item, ctx))
        .or_else(|| {
            debug!("No body marker found, using the item's own text");
            whole_item(item, resolution, ctx)
        })
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// First descendant of `item` matching `pattern` outside its quoted regions.
fn own_first<N: TreeNode>(item: &N, pattern: &Pattern, ctx: &PassContext<'_>) -> Option<N> {
    let quoted = &ctx.markers.quoted_region;
    item.select_all(pattern)
        .into_iter()
        .find(|node| !node.matches(quoted) && !node.has_ancestor_within(quoted, item))
}

fn text_content<N: TreeNode>(item: &N, ctx: &PassContext<'_>) -> Option<String> {
    let node = own_first(item, &ctx.markers.text_body, ctx)?;
    non_empty(visible_text(&node, Some(&ctx.markers.body_exclusions)))
}

fn sticker<N: TreeNode>(item: &N, ctx: &PassContext<'_>) -> Option<String> {
    own_first(item, &ctx.markers.sticker, ctx).map(|_| ctx.labels.sticker.clone())
}

fn file<N: TreeNode>(item: &N, ctx: &PassContext<'_>) -> Option<String> {
    let name = non_empty(own_first(item, &ctx.markers.file_name, ctx)?.text())?;
    Some(ctx.labels.file_placeholder(&name))
}

fn media<N: TreeNode>(item: &N, ctx: &PassContext<'_>) -> Option<String> {
    own_first(item, &ctx.markers.media, ctx).map(|_| ctx.labels.media.clone())
}

fn whole_item<N: TreeNode>(
    item: &N,
    resolution: &Resolution,
    ctx: &PassContext<'_>,
) -> Option<String> {
    let mut text = visible_text(item, Some(&ctx.markers.quoted_region));
    for part in [&resolution.speaker, &resolution.time] {
        if !part.is_empty() {
            text = text.replacen(part.as_str(), "", 1);
        }
    }
    non_empty(text)
}

#[cfg(test)]
mod tests {
    use super::super::speaker::SpeakerSignal;
    use super::super::test_support::{context, default_markers, snapshot};
    use super::*;
    use crate::config::{Labels, Locale};
    use crate::dom::Document;

    fn resolution(speaker: &str, time: &str) -> Resolution {
        Resolution {
            speaker: speaker.into(),
            is_self: false,
            time: time.into(),
            signal: SpeakerSignal::None,
        }
    }

    fn body_of(json: &str, labels: &Labels, resolved: &Resolution) -> Option<String> {
        let snap = snapshot(json);
        let markers = default_markers();
        let ctx = context(&markers, labels);
        let item = snap.root().first_child().unwrap();
        extract_body(&item, resolved, &ctx)
    }

    fn body(json: &str) -> Option<String> {
        body_of(json, &Labels::default(), &resolution("Alex", ""))
    }

    #[test]
    fn test_text_strips_quoted_regions() {
        let got = body(
            r#"{"nodes": [
                {"tag": "ul", "children": [1]},
                {"tag": "li", "attrs": {"class": "msg_lft"}, "children": [2]},
                {"tag": "div", "attrs": {"class": "msg"}, "children": [3, "Sounds good", 4, "see you"]},
                {"tag": "div", "attrs": {"class": "reply_area"}, "children": ["Kim: original text"]},
                {"tag": "br"}
            ]}"#,
        );
        assert_eq!(got.as_deref(), Some("Sounds good\nsee you"));
    }

    #[test]
    fn test_file_placeholder() {
        let got = body(
            r#"{"nodes": [
                {"tag": "ul", "children": [1]},
                {"tag": "li", "attrs": {"class": "msg_lft"}, "children": [2]},
                {"tag": "div", "attrs": {"class": "file_box"}, "children": [3, 4]},
                {"tag": "span", "attrs": {"class": "file_name"}, "children": [" report.pdf "]},
                {"tag": "span", "attrs": {"class": "size"}, "children": ["1.2MB"]}
            ]}"#,
        );
        assert_eq!(got.as_deref(), Some("(file: report.pdf)"));
    }

    #[test]
    fn test_placeholder_priority() {
        let got = body(
            r#"{"nodes": [
                {"tag": "ul", "children": [1]},
                {"tag": "li", "attrs": {"class": "msg_lft"}, "children": [2, 3]},
                {"tag": "img", "attrs": {"src": "a.png"}},
                {"tag": "div", "attrs": {"class": "sticker_box"}}
            ]}"#,
        );
        assert_eq!(got.as_deref(), Some("(sticker)"));

        let media = body(
            r#"{"nodes": [
                {"tag": "ul", "children": [1]},
                {"tag": "li", "attrs": {"class": "msg_lft"}, "children": [2]},
                {"tag": "div", "attrs": {"class": "thmb"}}
            ]}"#,
        );
        assert_eq!(media.as_deref(), Some("(image/media)"));
    }

    #[test]
    fn test_localized_placeholders() {
        let labels = Labels::for_locale(Locale::Ja);
        let got = body_of(
            r#"{"nodes": [
                {"tag": "ul", "children": [1]},
                {"tag": "li", "attrs": {"class": "msg_lft"}, "children": [2]},
                {"tag": "span", "attrs": {"class": "file_name"}, "children": ["資料.xlsx"]}
            ]}"#,
            &labels,
            &resolution("相手", ""),
        );
        assert_eq!(got.as_deref(), Some("(ファイル: 資料.xlsx)"));
    }

    #[test]
    fn test_empty_text_falls_through_to_attachment() {
        let got = body(
            r#"{"nodes": [
                {"tag": "ul", "children": [1]},
                {"tag": "li", "attrs": {"class": "msg_lft"}, "children": [2, 4]},
                {"tag": "div", "attrs": {"class": "msg"}, "children": [3]},
                {"tag": "div", "attrs": {"class": "quote_area"}, "children": ["only quoted"]},
                {"tag": "div", "attrs": {"class": "sticker_box"}}
            ]}"#,
        );
        assert_eq!(got.as_deref(), Some("(sticker)"));
    }

    #[test]
    fn test_whole_item_fallback_removes_speaker_and_time() {
        let got = body_of(
            r#"{"nodes": [
                {"tag": "ul", "children": [1]},
                {"tag": "li", "attrs": {"class": "msg_lft"}, "children": [2, 3, 4]},
                {"tag": "span", "children": ["Kim"]},
                {"tag": "span", "children": [" called you, Kim "]},
                {"tag": "span", "children": ["10:30"]}
            ]}"#,
            &Labels::default(),
            &resolution("Kim", "10:30"),
        );
        assert_eq!(got.as_deref(), Some("called you, Kim"));
    }

    #[test]
    fn test_no_content_drops_message() {
        let got = body_of(
            r#"{"nodes": [
                {"tag": "ul", "children": [1]},
                {"tag": "li", "attrs": {"class": "msg_lft"}, "children": [2, 3]},
                {"tag": "span", "children": ["Kim"]},
                {"tag": "div", "attrs": {"class": "reply_box"}, "children": ["quoted only"]}
            ]}"#,
            &Labels::default(),
            &resolution("Kim", ""),
        );
        assert_eq!(got, None);
    }

    #[test]
    fn test_reply_box_inside_text_is_excluded() {
        let got = body(
            r#"{"nodes": [
                {"tag": "ul", "children": [1]},
                {"tag": "li", "attrs": {"class": "msg_lft"}, "children": [2]},
                {"tag": "div", "attrs": {"class": "msg"}, "children": [3, "my reply"]},
                {"tag": "div", "attrs": {"class": "reply_box"}, "children": ["QUOTED TEXT"]}
            ]}"#,
        );
        assert_eq!(got.as_deref(), Some("my reply"));
    }

    #[test]
    fn test_quoted_text_body_is_not_the_body() {
        let got = body(
            r#"{"nodes": [
                {"tag": "ul", "children": [1]},
                {"tag": "li", "attrs": {"class": "msg_lft"}, "children": [2, 4]},
                {"tag": "div", "attrs": {"class": "reply_msg"}, "children": [3]},
                {"tag": "p", "attrs": {"class": "msg"}, "children": ["QUOTED TEXT"]},
                {"tag": "p", "attrs": {"class": "msg"}, "children": ["my reply"]}
            ]}"#,
        );
        assert_eq!(got.as_deref(), Some("my reply"));
    }

    #[test]
    fn test_quoted_attachment_is_not_the_body() {
        let got = body(
            r#"{"nodes": [
                {"tag": "ul", "children": [1]},
                {"tag": "li", "attrs": {"class": "msg_lft"}, "children": [2, 4]},
                {"tag": "div", "attrs": {"class": "reply_box"}, "children": [3]},
                {"tag": "div", "attrs": {"class": "sticker_box"}},
                {"tag": "div", "attrs": {"class": "thmb"}}
            ]}"#,
        );
        assert_eq!(got.as_deref(), Some("(image/media)"));
    }
}
