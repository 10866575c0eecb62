//! Tree nodes
//!
//! [`Node`] is what the value transform receives: a value, its depth, and
//! whatever the aggregator made of its children. [`Tree`] is the fully
//! materialized form produced by [`build_outline`](crate::build_outline).

use serde::Serialize;
use std::fmt;

/// A node handed to the value transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node<T, C> {
    pub depth: i64,
    /// `None` for placeholder nodes at mandatory depths
    pub value: Option<T>,
    pub children: C,
}

impl<T, C> Node<T, C> {
    pub fn new(depth: i64, value: Option<T>, children: C) -> Self {
        Node {
            depth,
            value,
            children,
        }
    }

    pub fn is_gap(&self) -> bool {
        self.value.is_none()
    }
}

/// A materialized tree node with owned children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tree<T> {
    pub depth: i64,
    pub value: Option<T>,
    pub children: Vec<Tree<T>>,
}

impl<T> From<Node<T, Vec<Tree<T>>>> for Tree<T> {
    fn from(node: Node<T, Vec<Tree<T>>>) -> Self {
        Tree {
            depth: node.depth,
            value: node.value,
            children: node.children,
        }
    }
}

impl<T> Tree<T> {
    pub fn leaf(value: T, depth: i64) -> Self {
        Tree {
            depth,
            value: Some(value),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// `(value, depth)` pairs in document order.
    pub fn preorder(&self) -> Vec<(Option<&T>, i64)> {
        let mut out = Vec::new();
        self.collect_preorder(&mut out);
        out
    }

    fn collect_preorder<'a>(&'a self, out: &mut Vec<(Option<&'a T>, i64)>) {
        out.push((self.value.as_ref(), self.depth));
        for child in &self.children {
            child.collect_preorder(out);
        }
    }
}

impl<T: fmt::Display> Tree<T> {
    /// Diagnostic rendering: one line per node, `[depth] value`, with one
    /// `indent` per nesting step. Placeholder values render as `~`.
    pub fn as_text(&self, indent: &str) -> String {
        let mut out = String::new();
        self.write_text(&mut out, indent, 0);
        out
    }

    fn write_text(&self, out: &mut String, indent: &str, nesting: usize) {
        out.push_str(&indent.repeat(nesting));
        out.push_str(&format!("[{}] {}", self.depth, DisplayValue(&self.value)));
        for child in &self.children {
            out.push('\n');
            child.write_text(out, indent, nesting + 1);
        }
    }
}

impl<T: fmt::Display> fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text("."))
    }
}

pub(crate) struct DisplayValue<'a, T>(pub(crate) &'a Option<T>);

impl<T: fmt::Display> fmt::Display for DisplayValue<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str("~"),
        }
    }
}
