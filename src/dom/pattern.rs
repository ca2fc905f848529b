//! Structural patterns used to recognize parts of the talk view.
//!
//! A [`Pattern`] is a CSS selector list, parsed by `selectors` with the same
//! dialect `scraper` uses. Every marker the extractor relies on is a plain
//! selector:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `div`, `*` | tag name / any element |
//! | `.msg_box` | has class |
//! | `#header` | has id |
//! | `[data-for-copy]` | has attribute |
//! | `[role=row]`, `[class*=msg]`, `[class~=my]` | attribute equals / contains / has word |
//! | `a b`, `a > b` | descendant / child |
//! | `a, b` | either |
//!
//! Matching runs against any [`TreeNode`], so the saved-page and snapshot
//! backends share one matcher.
//!
//! Patterns are compiled once, when an extractor is built, so a typo in a
//! marker surfaces as [`TalkpackError::InvalidPattern`] instead of a silent
//! non-match halfway through a page.
//!
//! ```rust
//! use talkpack::dom::Pattern;
//!
//! let pattern = Pattern::parse(".section_head .info_box > .name, #header .name")?;
//! assert_eq!(pattern.as_str(), ".section_head .info_box > .name, #header .name");
//! assert!(Pattern::parse(".a >").is_err());
//! # Ok::<(), talkpack::TalkpackError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use cssparser::ParserInput;
use scraper::error::SelectorErrorKind;
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, PseudoElement, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{
    self, ElementSelectorFlags, IgnoreNthChildForInvalidation, MatchingContext, MatchingMode,
    NeedsSelectorFlags, QuirksMode,
};
use selectors::parser::{ParseRelative, Selector, SelectorImpl};
use selectors::{Element, NthIndexCache, OpaqueElement, SelectorList};

use super::{NodeContent, TreeNode};
use crate::error::{Result, TalkpackError};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A compiled structural pattern (selector list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    selectors: Vec<Selector<Simple>>,
}

impl Pattern {
    /// Compiles a pattern.
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self {
            source: source.trim().to_string(),
            selectors: compile(source)?,
        })
    }

    /// Compiles a list of patterns into one pattern matching any of them.
    ///
    /// An empty list compiles to a pattern that never matches.
    pub fn from_list<S: AsRef<str>>(sources: &[S]) -> Result<Self> {
        let mut selectors = Vec::new();
        let mut joined = Vec::with_capacity(sources.len());
        for source in sources {
            let source = source.as_ref();
            selectors.extend(compile(source)?);
            joined.push(source.trim());
        }
        Ok(Self {
            source: joined.join(", "),
            selectors,
        })
    }

    /// Returns a pattern matching anything `self` or `other` matches.
    pub fn union(&self, other: &Pattern) -> Pattern {
        let source = match (self.is_empty(), other.is_empty()) {
            (true, _) => other.source.clone(),
            (_, true) => self.source.clone(),
            _ => format!("{}, {}", self.source, other.source),
        };
        Pattern {
            source,
            selectors: self.selectors.iter().chain(&other.selectors).cloned().collect(),
        }
    }

    /// Returns the pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the pattern can never match (compiled from an empty list).
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Tests `node` against every alternative of the pattern.
    pub fn matches<N: TreeNode>(&self, node: &N) -> bool {
        if self.selectors.is_empty() {
            return false;
        }
        let element = MatchNode(node.clone());
        let mut nth_index_cache = NthIndexCache::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut nth_index_cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );
        self.selectors
            .iter()
            .any(|selector| matching::matches_selector(selector, 0, None, &element, &mut context))
    }
}

fn compile(source: &str) -> Result<Vec<Selector<Simple>>> {
    let mut input = ParserInput::new(source);
    let mut parser = cssparser::Parser::new(&mut input);
    SelectorList::parse(&scraper::selector::Parser, &mut parser, ParseRelative::No)
        .map(|list| list.0.into_vec())
        .map_err(|e| TalkpackError::invalid_pattern(source, SelectorErrorKind::from(e).to_string()))
}

impl FromStr for Pattern {
    type Err = TalkpackError;

    fn from_str(s: &str) -> Result<Self> {
        Pattern::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ============================================================================
// Matcher adapter
// ============================================================================

/// Presents any [`TreeNode`] to the `selectors` matcher.
#[derive(Clone)]
struct MatchNode<N>(N);

impl<N: TreeNode> fmt::Debug for MatchNode<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MatchNode").field(&self.0.tag()).finish()
    }
}

impl<N: TreeNode> MatchNode<N> {
    fn sibling(&self, offset: isize) -> Option<Self> {
        let siblings = self.0.parent()?.children();
        let position = siblings.iter().position(|node| *node == self.0)?;
        let index = position.checked_add_signed(offset)?;
        siblings.into_iter().nth(index).map(MatchNode)
    }
}

impl<N: TreeNode> Element for MatchNode<N> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        self.0.opaque()
    }

    fn parent_element(&self) -> Option<Self> {
        self.0.parent().map(MatchNode)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.sibling(-1)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.sibling(1)
    }

    fn first_element_child(&self) -> Option<Self> {
        self.0.first_child().map(MatchNode)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.0.tag() == &*name.0
    }

    fn has_namespace(&self, ns: &<Simple as SelectorImpl>::BorrowedNamespaceUrl) -> bool {
        ns.is_empty() || &**ns == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.0.tag() == other.0.tag()
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&<Simple as SelectorImpl>::NamespaceUrl>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        // Attributes of a captured page carry no namespace
        if let NamespaceConstraint::Specific(url) = ns {
            if !url.is_empty() {
                return false;
            }
        }
        self.0
            .attribute(&local_name.0)
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        self.0.tag() == "link"
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.0
            .attribute("id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.0.attribute("class").is_some_and(|classes| {
            classes
                .split_whitespace()
                .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
        })
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.0.contents().iter().all(|content| match content {
            NodeContent::Text(text) => text.is_empty(),
            NodeContent::Element(_) => false,
        })
    }

    fn is_root(&self) -> bool {
        self.0.parent().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::snapshot::Snapshot;
    use crate::dom::Document;

    fn fixture() -> Snapshot {
        Snapshot::from_json(
            r#"{"nodes": [
                {"tag": "body", "children": [1, 4]},
                {"tag": "div", "attrs": {"class": "section_head", "id": "header"}, "children": [2]},
                {"tag": "div", "attrs": {"class": "info_box"}, "children": [3]},
                {"tag": "span", "attrs": {"class": "name strong", "data-role": "title"}, "children": ["Alex"]},
                {"tag": "ul", "attrs": {"class": "chat_view"}, "children": [5]},
                {"tag": "li", "attrs": {"class": "msg_wrap msg_lft", "data-for-copy": "{}"}, "children": ["hi"]}
            ]}"#,
        )
        .unwrap()
    }

    fn count(snapshot: &Snapshot, pattern: &str) -> usize {
        let pattern = Pattern::parse(pattern).unwrap();
        snapshot.root().select_all(&pattern).len()
    }

    #[test]
    fn test_simple_selectors() {
        let snap = fixture();
        assert_eq!(count(&snap, "span"), 1);
        assert_eq!(count(&snap, "SPAN"), 1);
        assert_eq!(count(&snap, ".name"), 1);
        assert_eq!(count(&snap, ".name.strong"), 1);
        assert_eq!(count(&snap, ".name.weak"), 0);
        assert_eq!(count(&snap, "#header"), 1);
        assert_eq!(count(&snap, "*"), 5);
    }

    #[test]
    fn test_attribute_selectors() {
        let snap = fixture();
        assert_eq!(count(&snap, "[data-for-copy]"), 1);
        assert_eq!(count(&snap, "[data-role=title]"), 1);
        assert_eq!(count(&snap, "[data-role=\"title\"]"), 1);
        assert_eq!(count(&snap, "[class*=msg]"), 1);
        assert_eq!(count(&snap, "[class~=msg]"), 0);
        assert_eq!(count(&snap, "[class~=msg_lft]"), 1);
    }

    #[test]
    fn test_combinators() {
        let snap = fixture();
        assert_eq!(count(&snap, ".section_head .name"), 1);
        assert_eq!(count(&snap, ".section_head > .name"), 0);
        assert_eq!(count(&snap, ".section_head > .info_box > .name"), 1);
        assert_eq!(count(&snap, "body .section_head .info_box .name"), 1);
        assert_eq!(count(&snap, ".chat_view .name"), 0);
    }

    #[test]
    fn test_selector_list() {
        let snap = fixture();
        assert_eq!(count(&snap, ".msg_wrap, .msg_rgt, .msg_lft"), 1);
        assert_eq!(count(&snap, ".name, .chat_view"), 2);
    }

    #[test]
    fn test_from_list() {
        let snap = fixture();
        let pattern = Pattern::from_list(&[".name", "ul"]).unwrap();
        assert_eq!(pattern.as_str(), ".name, ul");
        assert_eq!(snap.root().select_all(&pattern).len(), 2);

        let empty = Pattern::from_list::<&str>(&[]).unwrap();
        assert!(empty.is_empty());
        assert!(snap.root().select_first(&empty).is_none());
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", ".", "#", ".a >", "> .a", ".a,", "[x=]", "a ! b"] {
            let err = Pattern::parse(bad).unwrap_err();
            assert!(err.is_invalid_pattern(), "expected error for {bad:?}");
        }
    }

    #[test]
    fn test_structural_selectors() {
        let snap = fixture();
        assert_eq!(count(&snap, ".section_head + .chat_view"), 1);
        assert_eq!(count(&snap, ".chat_view ~ .section_head"), 0);
        assert_eq!(count(&snap, "li:first-child"), 1);
        assert_eq!(count(&snap, "div:not(.info_box)"), 1);
    }

    #[test]
    fn test_union() {
        let snap = fixture();
        let names = Pattern::parse(".name").unwrap();
        let lists = Pattern::parse("ul").unwrap();
        let both = names.union(&lists);
        assert_eq!(both.as_str(), ".name, ul");
        assert_eq!(snap.root().select_all(&both).len(), 2);

        let empty = Pattern::from_list::<&str>(&[]).unwrap();
        assert_eq!(empty.union(&names).as_str(), ".name");
        assert_eq!(names.union(&empty), names);
    }

    #[test]
    fn test_display_round_trip() {
        let pattern: Pattern = "  .a  .b ".parse().unwrap();
        assert_eq!(pattern.to_string(), ".a  .b");
    }
}
