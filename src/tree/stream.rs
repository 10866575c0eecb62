//! Shared stream context
//!
//! One context exists per [`build_tree`](crate::build_tree) call and every
//! [`Group`] of that call points at it. It owns:
//!
//! - the lookahead cursor over normalized elements
//! - the value transform and the children aggregator
//! - the aggregation of no children, computed once up front
//! - the active-group token: only the group holding it may pull elements
//! - the first failure any group ran into

use crate::error::TreeError;
use crate::levels::Leveled;
use crate::tree::group::Group;
use crate::tree::node::Node;
use std::cell::RefCell;
use std::iter::{Fuse, Peekable};
use std::rc::Rc;
use tracing::warn;

pub(crate) type GroupId = u64;

pub(crate) type Elements<'a, T> = Box<dyn Iterator<Item = Leveled<T>> + 'a>;
pub(crate) type Transform<'a, T, V, C> = Box<dyn Fn(Node<T, C>) -> V + 'a>;
pub(crate) type Aggregate<'a, T, V, C> = Box<dyn Fn(Group<'a, T, V, C>) -> C + 'a>;

/// Mutable half of the context
pub(crate) struct Stream<'a, T> {
    elements: Peekable<Fuse<Elements<'a, T>>>,
    active: Option<GroupId>,
    next_id: GroupId,
    failure: Option<TreeError<T>>,
}

impl<'a, T> Stream<'a, T> {
    fn new(elements: Elements<'a, T>) -> Self {
        Stream {
            elements: elements.fuse().peekable(),
            active: None,
            next_id: 0,
            failure: None,
        }
    }

    pub(crate) fn peek(&mut self) -> Option<&Leveled<T>> {
        self.elements.peek()
    }

    pub(crate) fn peek_depth(&mut self) -> Option<i64> {
        self.elements.peek().map(|element| element.depth)
    }

    pub(crate) fn next(&mut self) -> Option<Leveled<T>> {
        self.elements.next()
    }

    /// Hand the active token to a fresh group id.
    pub(crate) fn claim(&mut self) -> GroupId {
        let id = self.next_id;
        self.next_id += 1;
        self.active = Some(id);
        id
    }

    pub(crate) fn restore(&mut self, id: GroupId) {
        self.active = Some(id);
    }

    pub(crate) fn is_active(&self, id: GroupId) -> bool {
        self.active == Some(id)
    }

    pub(crate) fn failure(&self) -> Option<&TreeError<T>> {
        self.failure.as_ref()
    }

    /// Keep the first failure; later ones are consequences of it.
    pub(crate) fn record_failure(&mut self, err: &TreeError<T>)
    where
        T: Clone,
    {
        if self.failure.is_none() {
            if let TreeError::Expired = err {
                warn!("advance on an expired group");
            }
            self.failure = Some(err.clone());
        }
    }
}

/// The context shared by all groups of one build
pub(crate) struct Shared<'a, T, V, C> {
    pub(crate) stream: RefCell<Stream<'a, T>>,
    pub(crate) transform: Transform<'a, T, V, C>,
    pub(crate) aggregate: Aggregate<'a, T, V, C>,
    pub(crate) no_children: C,
}

impl<'a, T, V, C> Shared<'a, T, V, C> {
    pub(crate) fn new(
        elements: Elements<'a, T>,
        transform: Transform<'a, T, V, C>,
        aggregate: Aggregate<'a, T, V, C>,
    ) -> Rc<Self> {
        let no_children = aggregate(Group::empty());
        Rc::new(Shared {
            stream: RefCell::new(Stream::new(elements)),
            transform,
            aggregate,
            no_children,
        })
    }

    pub(crate) fn failure(&self) -> Option<TreeError<T>>
    where
        T: Clone,
    {
        self.stream.borrow().failure().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(depths: &[i64]) -> Stream<'static, &'static str> {
        let elements: Vec<_> = depths.iter().map(|&d| Leveled::new("x", d)).collect();
        Stream::new(Box::new(elements.into_iter()))
    }

    #[test]
    fn claim_moves_the_token() {
        let mut stream = stream(&[]);
        let first = stream.claim();
        let second = stream.claim();
        assert_ne!(first, second);
        assert!(stream.is_active(second));
        assert!(!stream.is_active(first));
        stream.restore(first);
        assert!(stream.is_active(first));
    }

    #[test]
    fn peek_does_not_consume() {
        let mut stream = stream(&[2, 3]);
        assert_eq!(stream.peek_depth(), Some(2));
        assert_eq!(stream.peek_depth(), Some(2));
        assert_eq!(stream.next().map(|e| e.depth), Some(2));
        assert_eq!(stream.peek_depth(), Some(3));
        stream.next();
        assert_eq!(stream.peek_depth(), None);
        assert!(stream.peek().is_none());
    }

    #[test]
    fn first_failure_wins() {
        let mut stream = stream(&[]);
        stream.record_failure(&TreeError::UnexpectedDepth {
            value: Some("x"),
            depth: 1,
            current: 2,
            parent: None,
        });
        stream.record_failure(&TreeError::Expired);
        assert_eq!(stream.failure().and_then(|e| e.depth()), Some(1));
    }

    #[test]
    fn no_children_is_aggregated_once() {
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        let shared: Rc<Shared<'_, &str, (), usize>> = Shared::new(
            Box::new(std::iter::empty()),
            Box::new(|_: Node<&str, usize>| ()),
            Box::new(move |group: Group<'_, &str, (), usize>| {
                *counter.borrow_mut() += 1;
                group.count()
            }),
        );
        assert_eq!(shared.no_children, 0);
        assert_eq!(*calls.borrow(), 1);
    }
}
