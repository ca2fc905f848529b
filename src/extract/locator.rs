//! Transcript container lookup.
//!
//! Ranked structural rules are tried first and the first hit wins. When none
//! of them match (the web client renamed its classes, or the page was captured
//! from a different layout), every element is scanned geometrically: the
//! container is the wide, right-of-sidebar element with the most item-like
//! children. The conversation list sidebar is never eligible. If nothing
//! qualifies the caller gets `None`, never an arbitrary root.

use std::fmt;

use tracing::debug;

use super::PassContext;
use crate::config::LocatorRule;
use crate::dom::TreeNode;

/// How a container was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatedVia {
    /// A ranked rule matched; carries the rule's pattern.
    Rule(String),
    /// The geometric scan picked the node.
    Geometry,
}

impl fmt::Display for LocatedVia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocatedVia::Rule(pattern) => write!(f, "rule '{pattern}'"),
            LocatedVia::Geometry => write!(f, "geometry"),
        }
    }
}

/// The container holding transcript items.
#[derive(Debug, Clone)]
pub struct Located<N> {
    pub container: N,
    pub via: LocatedVia,
}

pub(crate) fn locate<N: TreeNode>(root: &N, ctx: &PassContext<'_>) -> Option<Located<N>> {
    by_rules(root, ctx).or_else(|| by_geometry(root, ctx))
}

fn by_rules<N: TreeNode>(root: &N, ctx: &PassContext<'_>) -> Option<Located<N>> {
    ctx.markers.locators.iter().find_map(|(rule, pattern)| {
        let found = if root.matches(pattern) {
            root.clone()
        } else {
            root.select_first(pattern)?
        };

        let container = match rule {
            LocatorRule::Node(_) => found,
            LocatorRule::FirstChildOf(_) => found.first_child().unwrap_or(found),
        };
        Some(Located {
            container,
            via: LocatedVia::Rule(pattern.as_str().to_string()),
        })
    })
}

fn by_geometry<N: TreeNode>(root: &N, ctx: &PassContext<'_>) -> Option<Located<N>> {
    let band = ctx.side_panel_max_width;
    let mut best: Option<(N, usize, f64)> = None;

    for node in std::iter::once(root.clone()).chain(root.descendants()) {
        let Some(rect) = node.bounding_box() else {
            continue;
        };
        // Too narrow, or entirely inside the sidebar band.
        if rect.width <= band || rect.right() <= band {
            continue;
        }

        let items = node
            .children()
            .iter()
            .filter(|child| child.matches(&ctx.markers.item_like))
            .count();
        if items == 0 {
            continue;
        }

        let better = match &best {
            None => true,
            Some((_, best_items, best_area)) => {
                items > *best_items || (items == *best_items && rect.area() > *best_area)
            }
        };
        if better {
            best = Some((node, items, rect.area()));
        }
    }

    best.map(|(container, items, _)| {
        debug!(items, "Container chosen by geometric scan");
        Located {
            container,
            via: LocatedVia::Geometry,
        }
    })
}
