//! Terse projection of tree nodes
//!
//! Leaves collapse into their bare value. Anything with children, and any node
//! above the deepest declared mandatory depth, keeps a `(value, children)` pair.

use crate::options::BuildOptions;
use crate::tree::node::{DisplayValue, Node};
use serde::Serialize;
use std::fmt;

/// A node in the simple projection.
///
/// Serializes untagged: a leaf is just its value, a branch is `[value, [children]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Simple<T> {
    Leaf(Option<T>),
    Branch(Option<T>, Vec<Simple<T>>),
}

impl<T> Simple<T> {
    /// Build the value transform for [`build_tree`](crate::build_tree) that
    /// projects nodes the way `options` asks for.
    pub fn projector(options: &BuildOptions) -> impl Fn(Node<T, Vec<Simple<T>>>) -> Simple<T> {
        let max_mandatory = options.max_mandatory_depth();
        move |node| Simple::project(node, max_mandatory)
    }

    /// Collapse `node` unless it has children or sits above `max_mandatory`.
    pub fn project(node: Node<T, Vec<Simple<T>>>, max_mandatory: Option<i64>) -> Simple<T> {
        let keeps_pair = max_mandatory.is_some_and(|max| node.depth < max);
        if node.children.is_empty() && !keeps_pair {
            Simple::Leaf(node.value)
        } else {
            Simple::Branch(node.value, node.children)
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Simple::Leaf(value) | Simple::Branch(value, _) => value.as_ref(),
        }
    }

    pub fn children(&self) -> &[Simple<T>] {
        match self {
            Simple::Leaf(_) => &[],
            Simple::Branch(_, children) => children.as_slice(),
        }
    }
}

impl<T: fmt::Display> Simple<T> {
    /// Same layout as [`Tree::as_text`](crate::Tree::as_text), without depths.
    pub fn as_text(&self, indent: &str) -> String {
        let mut out = String::new();
        self.write_text(&mut out, indent, 0);
        out
    }

    fn write_text(&self, out: &mut String, indent: &str, nesting: usize) {
        let value = match self {
            Simple::Leaf(value) | Simple::Branch(value, _) => value,
        };
        out.push_str(&indent.repeat(nesting));
        out.push_str(&DisplayValue(value).to_string());
        for child in self.children() {
            out.push('\n');
            child.write_text(out, indent, nesting + 1);
        }
    }
}
