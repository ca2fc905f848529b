//! Visible text extraction.
//!
//! Mirrors what a browser's `innerText` gives for the markup found in talk
//! views: hidden subtrees are skipped, `<br>` and block boundaries become line
//! breaks, and whitespace inside a line collapses to single spaces.
//!
//! Passing an `exclude` pattern drops every matching descendant subtree from
//! the result. This is how quoted and forwarded content is removed from a
//! message body without mutating the captured tree.

use std::sync::LazyLock;

use regex::Regex;

use super::{NodeContent, Pattern, TreeNode};

static INLINE_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\n\x0C]+").unwrap());

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Collects the visible text of `node`, skipping descendants matching `exclude`.
///
/// The node itself is never excluded, only its descendants.
pub fn visible_text<N: TreeNode>(node: &N, exclude: Option<&Pattern>) -> String {
    let mut raw = String::new();
    collect(node, exclude, &mut raw);
    normalize_lines(&raw)
}

enum Step<N> {
    Content(NodeContent<N>),
    BlockEnd,
}

// Explicit stack: captured pages may nest far deeper than the call stack allows.
fn collect<N: TreeNode>(node: &N, exclude: Option<&Pattern>, out: &mut String) {
    let mut stack = Vec::new();
    push_contents(&mut stack, node);

    while let Some(step) = stack.pop() {
        let child = match step {
            Step::BlockEnd => {
                break_line(out);
                continue;
            }
            Step::Content(NodeContent::Text(text)) => {
                out.push_str(&INLINE_WS.replace_all(&text, " "));
                continue;
            }
            Step::Content(NodeContent::Element(child)) => child,
        };

        if !child.is_visible() || exclude.is_some_and(|pattern| pattern.matches(&child)) {
            continue;
        }
        if child.tag().eq_ignore_ascii_case("br") {
            out.push('\n');
            continue;
        }
        if is_block(child.tag()) {
            break_line(out);
            stack.push(Step::BlockEnd);
        }
        push_contents(&mut stack, &child);
    }
}

fn push_contents<N: TreeNode>(stack: &mut Vec<Step<N>>, node: &N) {
    stack.extend(node.contents().into_iter().rev().map(Step::Content));
}

fn is_block(tag: &str) -> bool {
    BLOCK_TAGS.iter().any(|block| tag.eq_ignore_ascii_case(block))
}

fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Collapses whitespace within lines, trims every line, keeps at most one
/// blank line between paragraphs and drops leading/trailing blank lines.
///
/// ```rust
/// use talkpack::dom::text::normalize_lines;
///
/// assert_eq!(normalize_lines("  hello   world \n\n\n\n second "), "hello world\n\nsecond");
/// ```
pub fn normalize_lines(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut pending_blank = false;

    for line in raw.lines() {
        let line = INLINE_WS.replace_all(line, " ");
        let line = line.trim();
        if line.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }
        if pending_blank {
            lines.push(String::new());
            pending_blank = false;
        }
        lines.push(line.to_string());
    }

    lines.join("\n")
}
