//! Read-only view over a captured talk page.
//!
//! Extraction never touches a concrete markup library directly. It is written
//! against [`TreeNode`], a minimal capability over one element: tag, attributes,
//! ordered mixed content, parent, geometry and visibility. Everything else
//! (class tests, pattern queries, visible text) is derived from those
//! primitives by provided methods.
//!
//! Two backends implement the capability:
//!
//! - [`snapshot`] - a flat JSON node table carrying real geometry, as produced
//!   by a capture script running inside the page (always available)
//! - [`html`] - a saved page parsed with `scraper`; geometry is read from
//!   `data-rect` attributes when the capture step stamped them (feature `html`)
//!
//! # Example
//!
//! ```rust
//! use talkpack::dom::{Document, Pattern, TreeNode};
//! use talkpack::dom::snapshot::Snapshot;
//!
//! let snapshot = Snapshot::from_json(r#"{
//!   "nodes": [
//!     {"tag": "body", "children": [1]},
//!     {"tag": "div", "attrs": {"class": "chat_view"}, "children": ["hello"]}
//!   ]
//! }"#)?;
//!
//! let view = snapshot.root().select_first(&Pattern::parse(".chat_view")?).unwrap();
//! assert_eq!(view.text(), "hello");
//! # Ok::<(), talkpack::TalkpackError>(())
//! ```

#[cfg(feature = "html")]
pub mod html;
pub mod pattern;
pub mod snapshot;
pub mod text;

pub use pattern::Pattern;

use selectors::OpaqueElement;
use serde::{Deserialize, Serialize};

/// Layout box of an element in CSS pixels, relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    #[serde(alias = "x")]
    pub left: f64,
    #[serde(alias = "y")]
    pub top: f64,
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Parses `left,top,width,height` (commas or whitespace). Height may be omitted.
    ///
    /// ```rust
    /// use talkpack::dom::Rect;
    ///
    /// let rect = Rect::parse_list("250, 0, 600, 900").unwrap();
    /// assert_eq!(rect.right(), 850.0);
    /// assert!(Rect::parse_list("wide").is_none());
    /// ```
    pub fn parse_list(value: &str) -> Option<Self> {
        let numbers: Vec<f64> = value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.trim_end_matches("px").parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;

        match numbers.as_slice() {
            [left, top, width] => Some(Self::new(*left, *top, *width, 0.0)),
            [left, top, width, height] => Some(Self::new(*left, *top, *width, *height)),
            _ => None,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Size of the window the page was rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// One item of an element's ordered content.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent<N> {
    Text(String),
    Element(N),
}

/// Minimal capability over one element of a captured page.
///
/// Implementors provide the primitives; queries are derived. Nodes are cheap
/// handles (`Clone`) into a document that outlives them, and equality means
/// "same element of the same document".
pub trait TreeNode: Clone + PartialEq {
    /// Lowercase tag name.
    fn tag(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Text runs and child elements in document order.
    fn contents(&self) -> Vec<NodeContent<Self>>;

    fn parent(&self) -> Option<Self>;

    /// Rendered box, if the capture recorded geometry for this element.
    fn bounding_box(&self) -> Option<Rect>;

    /// Whether the element itself is rendered (ancestors are not consulted).
    fn is_visible(&self) -> bool;

    /// Identity of the underlying element, stable across handle copies.
    fn opaque(&self) -> OpaqueElement;

    /// Child elements in document order.
    fn children(&self) -> Vec<Self> {
        self.contents()
            .into_iter()
            .filter_map(|content| match content {
                NodeContent::Element(child) => Some(child),
                NodeContent::Text(_) => None,
            })
            .collect()
    }

    fn first_child(&self) -> Option<Self> {
        self.children().into_iter().next()
    }

    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Visible text, laid out the way a browser's `innerText` would be.
    fn text(&self) -> String {
        text::visible_text(self, None)
    }

    fn matches(&self, pattern: &Pattern) -> bool {
        pattern.matches(self)
    }

    /// The node itself or its nearest ancestor matching `pattern`.
    fn closest(&self, pattern: &Pattern) -> Option<Self> {
        if self.matches(pattern) {
            return Some(self.clone());
        }
        self.closest_ancestor_matching(pattern)
    }

    /// Nearest strict ancestor matching `pattern`.
    fn closest_ancestor_matching(&self, pattern: &Pattern) -> Option<Self> {
        let mut current = self.parent();
        while let Some(node) = current {
            if node.matches(pattern) {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    /// Whether a strict ancestor strictly below `boundary` matches `pattern`.
    ///
    /// Used to ask "is this inside a quoted region of *this* message" without
    /// being fooled by regions enclosing the whole message.
    fn has_ancestor_within(&self, pattern: &Pattern, boundary: &Self) -> bool {
        let mut current = self.parent();
        while let Some(node) = current {
            if &node == boundary {
                return false;
            }
            if node.matches(pattern) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// All descendant elements in pre-order, excluding the node itself.
    fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack: Vec<Self> = self.children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.children().into_iter().rev());
            out.push(node);
        }
        out
    }

    /// First descendant matching `pattern` (`querySelector` semantics).
    fn select_first(&self, pattern: &Pattern) -> Option<Self> {
        self.descendants().into_iter().find(|node| node.matches(pattern))
    }

    /// All descendants matching `pattern`, in document order.
    fn select_all(&self, pattern: &Pattern) -> Vec<Self> {
        self.descendants()
            .into_iter()
            .filter(|node| node.matches(pattern))
            .collect()
    }
}

/// A captured page: a root element plus the viewport it was rendered in.
pub trait Document {
    type Node<'a>: TreeNode
    where
        Self: 'a;

    fn root(&self) -> Self::Node<'_>;

    fn viewport(&self) -> Option<Viewport> {
        None
    }
}

/// Returns `true` if an inline `style` attribute hides the element.
pub(crate) fn style_hides(style: &str) -> bool {
    style.split(';').any(|declaration| {
        let Some((property, value)) = declaration.split_once(':') else {
            return false;
        };
        let value = value.trim().to_ascii_lowercase();
        match property.trim().to_ascii_lowercase().as_str() {
            "display" => value.starts_with("none"),
            "visibility" => value.starts_with("hidden") || value.starts_with("collapse"),
            _ => false,
        }
    })
}
