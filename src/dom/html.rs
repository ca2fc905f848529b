//! Saved-page backend built on `scraper`.
//!
//! A page saved from the browser keeps the structure and classes of the talk
//! view but loses layout. Geometry is therefore read from attributes a capture
//! step may stamp on elements before saving:
//!
//! - `data-rect="left,top,width,height"` on any element
//! - `data-viewport-width` (and optionally `data-viewport-height`) on `<html>` or `<body>`
//!
//! Without them the geometric fallbacks simply have nothing to say and the
//! structural markers decide alone.

use std::fs;
use std::path::Path;

use scraper::node::Node;
use scraper::{ElementRef, Html};
use selectors::OpaqueElement;

use super::{Document, NodeContent, Rect, TreeNode, Viewport, style_hides};
use crate::error::Result;

/// Attribute holding an element's captured layout box.
pub const RECT_ATTRIBUTE: &str = "data-rect";

const NON_RENDERED_TAGS: &[&str] = &["head", "script", "style", "template", "noscript", "title"];

/// A parsed HTML page.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses a complete HTML document.
    pub fn parse(content: &str) -> Self {
        Self {
            html: Html::parse_document(content),
        }
    }

    /// Reads and parses an HTML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }
}

impl Document for HtmlDocument {
    type Node<'a> = HtmlNode<'a>;

    fn root(&self) -> HtmlNode<'_> {
        HtmlNode(self.html.root_element())
    }

    fn viewport(&self) -> Option<Viewport> {
        let root = self.root();
        let body = root.children().into_iter().find(|node| node.tag() == "body");

        std::iter::once(root).chain(body).find_map(|node| {
            let width = node.attribute("data-viewport-width")?.trim().parse().ok()?;
            let height = node
                .attribute("data-viewport-height")
                .and_then(|h| h.trim().parse().ok())
                .unwrap_or(0.0);
            Some(Viewport { width, height })
        })
    }
}

/// Handle to one element of an [`HtmlDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlNode<'a>(ElementRef<'a>);

impl<'a> HtmlNode<'a> {
    /// Wraps a `scraper` element.
    pub fn new(element: ElementRef<'a>) -> Self {
        Self(element)
    }

    /// Returns the underlying `scraper` element.
    pub fn element(&self) -> ElementRef<'a> {
        self.0
    }
}

impl TreeNode for HtmlNode<'_> {
    fn tag(&self) -> &str {
        self.0.value().name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.0.value().attr(name)
    }

    fn contents(&self) -> Vec<NodeContent<Self>> {
        self.0
            .children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(NodeContent::Text(String::from(&**text))),
                Node::Element(_) => ElementRef::wrap(child).map(|e| NodeContent::Element(HtmlNode(e))),
                _ => None,
            })
            .collect()
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent().and_then(ElementRef::wrap).map(HtmlNode)
    }

    fn bounding_box(&self) -> Option<Rect> {
        self.attribute(RECT_ATTRIBUTE).and_then(Rect::parse_list)
    }

    fn is_visible(&self) -> bool {
        let element = self.0.value();
        if NON_RENDERED_TAGS.contains(&element.name()) || element.attr("hidden").is_some() {
            return false;
        }
        !element.attr("style").is_some_and(style_hides)
    }

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.0.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Pattern;

    #[test]
    fn test_parse_and_query() {
        let doc = HtmlDocument::parse(
            r#"<html><body><div class="chat_view"><p>Hello <b>there</b></p></div></body></html>"#,
        );
        let view = doc
            .root()
            .select_first(&Pattern::parse(".chat_view").unwrap())
            .unwrap();
        assert_eq!(view.tag(), "div");
        assert_eq!(view.text(), "Hello there");
        assert_eq!(view.parent().unwrap().tag(), "body");
    }

    #[test]
    fn test_root_has_no_parent() {
        let doc = HtmlDocument::parse("<p>x</p>");
        assert_eq!(doc.root().tag(), "html");
        assert!(doc.root().parent().is_none());
    }

    #[test]
    fn test_geometry_from_attributes() {
        let doc = HtmlDocument::parse(
            r#"<html data-viewport-width="1280"><body>
                <div id="a" data-rect="250,0,600,900"></div>
                <div id="b"></div>
            </body></html>"#,
        );
        assert_eq!(doc.viewport().unwrap().width, 1280.0);

        let a = doc.root().select_first(&Pattern::parse("#a").unwrap()).unwrap();
        let b = doc.root().select_first(&Pattern::parse("#b").unwrap()).unwrap();
        assert_eq!(a.bounding_box(), Some(Rect::new(250.0, 0.0, 600.0, 900.0)));
        assert!(b.bounding_box().is_none());
    }

    #[test]
    fn test_viewport_on_body() {
        let doc = HtmlDocument::parse(
            r#"<html><body data-viewport-width="900" data-viewport-height="700"></body></html>"#,
        );
        let viewport = doc.viewport().unwrap();
        assert_eq!(viewport.width, 900.0);
        assert_eq!(viewport.height, 700.0);
        assert!(HtmlDocument::parse("<p></p>").viewport().is_none());
    }

    #[test]
    fn test_visibility_rules() {
        let doc = HtmlDocument::parse(
            r#"<html><body>
                <div class="v">shown</div>
                <div class="v" style="display:none">styled</div>
                <div class="v" hidden>attr</div>
                <script class="v">var x;</script>
            </body></html>"#,
        );
        let nodes = doc.root().select_all(&Pattern::parse(".v").unwrap());
        let visible: Vec<bool> = nodes.iter().map(|n| n.is_visible()).collect();
        assert_eq!(visible, vec![true, false, false, false]);
        assert_eq!(doc.root().text(), "shown");
    }
}
