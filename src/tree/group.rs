//! Lazy sibling groups
//!
//! A [`Group`] is the lazy sequence of sibling nodes at one depth under one
//! parent. The aggregator receives one for every node that has children, and
//! pulling from it pulls from the shared stream.
//!
//! # Protocol
//!
//! Only one group may pull from the stream at a time: the one holding the
//! active token. When a group meets a node with deeper children it opens a
//! child group, which takes the token. The parent stays expired until that child
//! has been drained, whether or not the aggregator consumed every child; the
//! parent then takes the token back and hands out the finished node.
//!
//! Advancing a group that doesn't hold the token is a protocol violation and
//! yields [`TreeError::Expired`]. A group that ran out of siblings while
//! holding the token keeps reporting the end of its sequence.

use crate::error::TreeError;
use crate::tree::node::Node;
use crate::tree::stream::{GroupId, Shared};
use std::rc::Rc;
use tracing::{debug, warn};

/// Lazy sequence of sibling nodes. See the module docs for the protocol.
///
/// Iterating yields transformed nodes and stops at the end of the group or at
/// the first error; errors are kept and returned by
/// [`build_tree`](crate::build_tree). Use [`advance`](Group::advance) to see
/// them directly.
///
/// `'a` is how long the build's records and closures live.
pub struct Group<'a, T, V, C> {
    cursor: Option<Cursor<'a, T, V, C>>,
}

struct Cursor<'a, T, V, C> {
    shared: Rc<Shared<'a, T, V, C>>,
    id: GroupId,
    depth: i64,
    parent: Option<i64>,
}

enum Step<V> {
    End,
    /// A node was consumed; carries it unless consuming only
    Node(Option<V>),
}

impl<T, V, C> Clone for Group<'_, T, V, C> {
    fn clone(&self) -> Self {
        Group {
            cursor: self.cursor.as_ref().map(|cursor| Cursor {
                shared: cursor.shared.clone(),
                id: cursor.id,
                depth: cursor.depth,
                parent: cursor.parent,
            }),
        }
    }
}

impl<'a, T, V, C> Group<'a, T, V, C> {
    /// A group with no siblings at all.
    pub fn empty() -> Self {
        Group { cursor: None }
    }

    /// Open a group at the depth of the next element and make it active.
    ///
    /// With nothing left in the stream this is an empty group.
    pub(crate) fn open(shared: &Rc<Shared<'a, T, V, C>>, parent: Option<i64>) -> Self {
        let mut stream = shared.stream.borrow_mut();
        let Some(depth) = stream.peek_depth() else {
            return Group::empty();
        };
        let id = stream.claim();
        drop(stream);

        Group {
            cursor: Some(Cursor {
                shared: Rc::clone(shared),
                id,
                depth,
                parent,
            }),
        }
    }

    /// Depth shared by the siblings of this group; `None` for an empty group.
    pub fn depth(&self) -> Option<i64> {
        self.cursor.as_ref().map(|cursor| cursor.depth)
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_none()
    }
}

impl<T: Clone, V, C: Clone> Group<'_, T, V, C> {
    /// Produce the next sibling, or `None` once the group has ended.
    pub fn advance(&mut self) -> Result<Option<V>, TreeError<T>> {
        let Some(cursor) = &self.cursor else {
            return Ok(None);
        };
        match cursor.step(true) {
            Ok(Step::End) => Ok(None),
            Ok(Step::Node(node)) => Ok(node),
            Err(err) => {
                cursor.shared.stream.borrow_mut().record_failure(&err);
                Err(err)
            }
        }
    }

    /// Consume the remaining siblings without producing them.
    fn drain(&self) -> Result<usize, TreeError<T>> {
        let Some(cursor) = &self.cursor else {
            return Ok(0);
        };
        let mut drained = 0;
        while let Step::Node(_) = cursor.step(false)? {
            drained += 1;
        }
        if drained > 0 {
            debug!(depth = cursor.depth, drained, "drained unconsumed siblings");
        }
        Ok(drained)
    }
}

impl<T: Clone, V, C: Clone> Cursor<'_, T, V, C> {
    fn step(&self, produce: bool) -> Result<Step<V>, TreeError<T>> {
        let (value, depth, has_children) = {
            let mut stream = self.shared.stream.borrow_mut();
            if let Some(failure) = stream.failure() {
                return Err(failure.clone());
            }
            if !stream.is_active(self.id) {
                warn!(depth = self.depth, "group advanced while expired");
                return Err(TreeError::Expired);
            }

            let Some(next) = stream.peek() else {
                return Ok(Step::End);
            };
            if next.depth < self.depth {
                if self.parent.map_or(true, |parent| next.depth > parent) {
                    warn!(
                        depth = next.depth,
                        current = self.depth,
                        parent = ?self.parent,
                        "unexpected depth"
                    );
                    return Err(TreeError::UnexpectedDepth {
                        value: next.value.clone(),
                        depth: next.depth,
                        current: self.depth,
                        parent: self.parent,
                    });
                }
                return Ok(Step::End);
            }
            debug_assert_eq!(
                next.depth, self.depth,
                "deeper elements are consumed by child groups"
            );

            let Some(element) = stream.next() else {
                return Ok(Step::End);
            };
            let has_children = stream.peek_depth().is_some_and(|d| d > self.depth);
            (element.value, element.depth, has_children)
        };

        let shared = &self.shared;
        if !has_children {
            if !produce {
                return Ok(Step::Node(None));
            }
            let node = Node::new(depth, value, shared.no_children.clone());
            return Ok(Step::Node(Some((shared.transform)(node))));
        }

        let children = Group::open(shared, Some(self.depth));
        debug!(
            parent = self.depth,
            depth = ?children.depth(),
            "opened nested group"
        );
        let produced = if produce {
            let aggregated = (shared.aggregate)(children.clone());
            Some((shared.transform)(Node::new(depth, value, aggregated)))
        } else {
            None
        };

        children.drain()?;
        shared.stream.borrow_mut().restore(self.id);
        Ok(Step::Node(produced))
    }
}

impl<T: Clone, V, C: Clone> Iterator for Group<'_, T, V, C> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        // Failures are recorded on the stream by `advance`
        self.advance().unwrap_or(None)
    }
}
