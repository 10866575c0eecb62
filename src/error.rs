//! Errors raised while building a tree

use thiserror::Error;

/// Errors surfaced by [`build_tree`](crate::build_tree) and [`Group::advance`](crate::Group::advance)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError<T> {
    /// An element dropped below the current group's depth without landing on an
    /// enclosing group's depth.
    #[error("unexpected depth {depth} for {value:?} (current {current}, parent {parent:?})")]
    UnexpectedDepth {
        value: Option<T>,
        depth: i64,
        current: i64,
        parent: Option<i64>,
    },

    /// A group was advanced while another group owned the stream.
    #[error("group expired: a nested group owns the stream")]
    Expired,
}

impl<T> TreeError<T> {
    /// Value of the offending element, for depth errors
    pub fn value(&self) -> Option<&T> {
        match self {
            TreeError::UnexpectedDepth { value, .. } => value.as_ref(),
            TreeError::Expired => None,
        }
    }

    /// Depth of the offending element, for depth errors
    pub fn depth(&self) -> Option<i64> {
        match self {
            TreeError::UnexpectedDepth { depth, .. } => Some(*depth),
            TreeError::Expired => None,
        }
    }
}
