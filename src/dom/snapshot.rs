//! JSON snapshot backend.
//!
//! A capture script running inside the page walks the DOM once and emits a
//! flat node table. Unlike a saved HTML file, the snapshot records what only a
//! live page knows: element boxes and computed visibility.
//!
//! ```json
//! {
//!   "viewport": {"width": 1280, "height": 800},
//!   "nodes": [
//!     {"tag": "body", "children": [1]},
//!     {"tag": "div", "attrs": {"class": "chat_view"},
//!      "rect": {"left": 250, "top": 0, "width": 600, "height": 900},
//!      "children": [2, "plain text run"]},
//!     {"tag": "div", "visible": false}
//!   ]
//! }
//! ```
//!
//! Node `0` is the root. `children` lists node indices and text runs in
//! document order. The table is flat so arbitrarily deep pages load without
//! hitting JSON nesting limits.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use selectors::OpaqueElement;
use serde::Deserialize;

use super::{Document, NodeContent, Rect, TreeNode, Viewport, style_hides};
use crate::error::{Result, TalkpackError};

/// A loaded, validated snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    viewport: Option<Viewport>,
    nodes: Vec<ElementData>,
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    attrs: HashMap<String, String>,
    rect: Option<Rect>,
    visible: bool,
    parent: Option<usize>,
    contents: Vec<Slot>,
}

#[derive(Debug, Clone)]
enum Slot {
    Text(String),
    Element(usize),
}

// Wire structures

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    viewport: Option<Viewport>,
    nodes: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    tag: String,
    #[serde(default)]
    attrs: HashMap<String, String>,
    #[serde(default)]
    rect: Option<Rect>,
    #[serde(default = "default_visible")]
    visible: bool,
    #[serde(default)]
    children: Vec<RawSlot>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSlot {
    Element(usize),
    Text(String),
}

fn default_visible() -> bool {
    true
}

impl Snapshot {
    /// Parses and validates a snapshot.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(content)?;
        Self::from_raw(raw)
    }

    /// Reads a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn from_raw(raw: RawSnapshot) -> Result<Self> {
        if raw.nodes.is_empty() {
            return Err(TalkpackError::invalid_snapshot("node table is empty"));
        }

        let len = raw.nodes.len();
        let mut parents: Vec<Option<usize>> = vec![None; len];

        for (index, node) in raw.nodes.iter().enumerate() {
            for slot in &node.children {
                let RawSlot::Element(child) = slot else {
                    continue;
                };
                let child = *child;
                if child >= len {
                    return Err(TalkpackError::invalid_snapshot(format!(
                        "node {index} references missing node {child}"
                    )));
                }
                if child == 0 {
                    return Err(TalkpackError::invalid_snapshot(format!(
                        "node {index} lists the root as a child"
                    )));
                }
                if parents[child].replace(index).is_some() {
                    return Err(TalkpackError::invalid_snapshot(format!(
                        "node {child} has two parents"
                    )));
                }
            }
        }

        // Every node must reach the root; anything else sits on a cycle or is detached.
        let mut reaches_root = vec![false; len];
        reaches_root[0] = true;
        let mut path = Vec::new();
        for start in 1..len {
            let mut current = start;
            while !reaches_root[current] {
                path.push(current);
                match parents[current] {
                    Some(parent) if path.len() <= len => current = parent,
                    _ => {
                        return Err(TalkpackError::invalid_snapshot(format!(
                            "node {start} is not connected to the root"
                        )));
                    }
                }
            }
            for node in path.drain(..) {
                reaches_root[node] = true;
            }
        }

        let nodes = raw
            .nodes
            .into_iter()
            .zip(parents)
            .map(|(node, parent)| ElementData {
                tag: node.tag.to_ascii_lowercase(),
                attrs: node.attrs,
                rect: node.rect,
                visible: node.visible,
                parent,
                contents: node
                    .children
                    .into_iter()
                    .map(|slot| match slot {
                        RawSlot::Element(index) => Slot::Element(index),
                        RawSlot::Text(text) => Slot::Text(text),
                    })
                    .collect(),
            })
            .collect();

        Ok(Self {
            viewport: raw.viewport,
            nodes,
        })
    }

    /// Number of elements in the snapshot.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, index: usize) -> SnapshotNode<'_> {
        SnapshotNode {
            snapshot: self,
            index,
        }
    }
}

impl Document for Snapshot {
    type Node<'a> = SnapshotNode<'a>;

    fn root(&self) -> SnapshotNode<'_> {
        self.node(0)
    }

    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}

/// Handle to one element of a [`Snapshot`].
#[derive(Debug, Clone, Copy)]
pub struct SnapshotNode<'a> {
    snapshot: &'a Snapshot,
    index: usize,
}

impl SnapshotNode<'_> {
    /// Position of this element in the node table.
    pub fn index(&self) -> usize {
        self.index
    }

    fn data(&self) -> &ElementData {
        &self.snapshot.nodes[self.index]
    }
}

impl PartialEq for SnapshotNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.snapshot, other.snapshot) && self.index == other.index
    }
}

impl TreeNode for SnapshotNode<'_> {
    fn tag(&self) -> &str {
        &self.data().tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.data().attrs.get(name).map(String::as_str)
    }

    fn contents(&self) -> Vec<NodeContent<Self>> {
        self.data()
            .contents
            .iter()
            .map(|slot| match slot {
                Slot::Text(text) => NodeContent::Text(text.clone()),
                Slot::Element(index) => NodeContent::Element(self.snapshot.node(*index)),
            })
            .collect()
    }

    fn parent(&self) -> Option<Self> {
        self.data().parent.map(|index| self.snapshot.node(index))
    }

    fn bounding_box(&self) -> Option<Rect> {
        self.data().rect
    }

    fn is_visible(&self) -> bool {
        let data = self.data();
        data.visible && !data.attrs.get("style").is_some_and(|style| style_hides(style))
    }

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_minimal() {
        let snap = Snapshot::from_json(r#"{"nodes": [{"tag": "BODY"}]}"#).unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.root().tag(), "body");
        assert!(snap.viewport().is_none());
        assert!(snap.root().parent().is_none());
    }

    #[test]
    fn test_structure_and_geometry() {
        let snap = Snapshot::from_json(
            r#"{
                "viewport": {"width": 1280, "height": 800},
                "nodes": [
                    {"tag": "body", "children": [1, "tail"]},
                    {"tag": "div", "attrs": {"class": "a b"},
                     "rect": {"left": 10, "top": 0, "width": 600, "height": 50},
                     "children": ["x"]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(snap.viewport().unwrap().width, 1280.0);
        let root = snap.root();
        let child = root.first_child().unwrap();
        assert!(child.has_class("b"));
        assert_eq!(child.bounding_box().unwrap().right(), 610.0);
        assert_eq!(child.parent().unwrap(), root);
        assert_eq!(child.index(), 1);
        assert_eq!(root.contents().len(), 2);
    }

    #[test]
    fn test_visibility() {
        let snap = Snapshot::from_json(
            r#"{"nodes": [
                {"tag": "body", "children": [1, 2, 3]},
                {"tag": "div", "visible": false},
                {"tag": "div", "attrs": {"style": "display: none"}},
                {"tag": "div"}
            ]}"#,
        )
        .unwrap();
        let visible: Vec<bool> = snap.root().children().iter().map(|n| n.is_visible()).collect();
        assert_eq!(visible, vec![false, false, true]);
    }

    #[test]
    fn test_rejects_missing_child() {
        let err = Snapshot::from_json(r#"{"nodes": [{"tag": "body", "children": [4]}]}"#)
            .unwrap_err();
        assert!(err.is_invalid_snapshot());
        assert!(err.to_string().contains("missing node 4"));
    }

    #[test]
    fn test_rejects_two_parents() {
        let err = Snapshot::from_json(
            r#"{"nodes": [
                {"tag": "body", "children": [1, 2]},
                {"tag": "div", "children": [2]},
                {"tag": "div"}
            ]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("two parents"));
    }

    #[test]
    fn test_rejects_cycle_and_detached() {
        let cycle = Snapshot::from_json(
            r#"{"nodes": [
                {"tag": "body"},
                {"tag": "div", "children": [2]},
                {"tag": "div", "children": [1]}
            ]}"#,
        )
        .unwrap_err();
        assert!(cycle.is_invalid_snapshot());

        let detached =
            Snapshot::from_json(r#"{"nodes": [{"tag": "body"}, {"tag": "div"}]}"#).unwrap_err();
        assert!(detached.to_string().contains("not connected"));
    }

    #[test]
    fn test_rejects_root_as_child_and_empty() {
        assert!(
            Snapshot::from_json(r#"{"nodes": [{"tag": "body", "children": [0]}]}"#)
                .unwrap_err()
                .is_invalid_snapshot()
        );
        assert!(
            Snapshot::from_json(r#"{"nodes": []}"#)
                .unwrap_err()
                .is_invalid_snapshot()
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = Snapshot::from_json("{").unwrap_err();
        assert!(matches!(err, TalkpackError::Json(_)));
    }
}
