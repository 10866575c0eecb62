//! The single-active-group protocol, seen from an aggregator

use leveltree::{build_tree, BuildOptions, Group, Node, Record, TreeError};
use std::cell::RefCell;
use std::rc::Rc;

type Handle = Group<'static, &'static str, &'static str, Vec<&'static str>>;

fn records(depths: &[(&'static str, i64)]) -> Vec<Record<&'static str>> {
    depths.iter().map(|&(v, d)| Record::at(v, d)).collect()
}

fn value_of(node: Node<&'static str, Vec<&'static str>>) -> &'static str {
    node.value.unwrap_or("~")
}

#[test]
fn advancing_a_superseded_parent_fails_the_build() {
    let root: Rc<RefCell<Option<Handle>>> = Rc::default();
    let seen: Rc<RefCell<Vec<Result<Option<&str>, TreeError<&str>>>>> = Rc::default();
    let (root_slot, seen_log) = (root.clone(), seen.clone());

    let result = build_tree(
        records(&[("a", 0), ("b", 1), ("c", 0)]),
        value_of,
        move |group: Handle| {
            match group.depth() {
                Some(0) => *root_slot.borrow_mut() = Some(group.clone()),
                Some(_) => {
                    // The nested group owns the stream; the parent must refuse.
                    let mut parent = root_slot.borrow().clone().expect("root seen first");
                    seen_log.borrow_mut().push(parent.advance());
                }
                None => {}
            }
            group.collect()
        },
        &BuildOptions::new(),
    );

    assert_eq!(result, Err(TreeError::Expired));
    assert_eq!(*seen.borrow(), vec![Err(TreeError::Expired)]);
}

#[test]
fn aggregator_may_stop_early() {
    let result = build_tree(
        records(&[("a", 0), ("b", 1), ("c", 1), ("d", 2), ("e", 1), ("f", 0)]),
        value_of,
        |group: Handle| group.take(1).collect(),
        &BuildOptions::new(),
    );
    assert_eq!(result, Ok(vec!["a"]));
}

#[test]
fn drained_siblings_are_still_checked() {
    // "x" would break the group under "a" even though nobody looks at it
    let result = build_tree(
        records(&[("a", 0), ("b", 2), ("c", 2), ("x", 1), ("d", 0)]),
        value_of,
        |group: Handle| group.take(1).collect(),
        &BuildOptions::new(),
    );
    assert_eq!(
        result,
        Err(TreeError::UnexpectedDepth {
            value: Some("x"),
            depth: 1,
            current: 2,
            parent: Some(0),
        })
    );
}

#[test]
fn errors_stop_iteration() {
    let pulled = Rc::new(RefCell::new(Vec::new()));
    let log = pulled.clone();
    let result = build_tree(
        records(&[("a", 1), ("b", 0), ("c", 1)]),
        value_of,
        move |group: Handle| {
            let values: Vec<&str> = group.collect();
            log.borrow_mut().extend(values.iter().copied());
            values
        },
        &BuildOptions::new(),
    );
    assert_eq!(result.unwrap_err().value(), Some(&"b"));
    assert_eq!(*pulled.borrow(), vec!["a"]);
}

#[test]
fn advance_reports_failure_after_error() {
    let attempts = Rc::new(RefCell::new(Vec::new()));
    let log = attempts.clone();
    let _ = build_tree(
        records(&[("a", 1), ("b", 0)]),
        value_of,
        move |mut group: Handle| {
            let mut out = Vec::new();
            for _ in 0..3 {
                let step = group.advance();
                log.borrow_mut().push(step.clone());
                if let Ok(Some(value)) = step {
                    out.push(value);
                }
            }
            out
        },
        &BuildOptions::new(),
    );

    let attempts = attempts.borrow();
    // no-children aggregation first, then the root
    assert!(attempts[..3].iter().all(|step| *step == Ok(None)));
    assert_eq!(attempts[3], Ok(Some("a")));
    assert_eq!(attempts[4].as_ref().unwrap_err().depth(), Some(0));
    assert_eq!(attempts[5], attempts[4]);
}
