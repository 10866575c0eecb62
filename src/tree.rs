//! Lazy tree reconstruction
//!
//! Entry points that turn records into trees. [`build_tree`] is the general one:
//! the caller chooses how a node is transformed and how a group of children is
//! aggregated. [`build_outline`] and [`build_simple`] are the two common setups.
//!
//! # Example
//!
//! ```ignore
//! let records = vec![Record::at("a", 0), Record::at("b", 1), Record::at("c", 2)];
//! let outline = build_outline(records, &BuildOptions::new())?;
//! assert_eq!(outline[0].as_text("."), "[0] a\n.[1] b\n..[2] c");
//! ```

pub mod group;
pub mod node;
pub mod simple;
pub(crate) mod stream;

use crate::error::TreeError;
use crate::levels::levels;
use crate::options::BuildOptions;
use crate::record::Record;
use group::Group;
use node::{Node, Tree};
use simple::Simple;
use stream::Shared;
use tracing::debug;

/// Build a tree from `records`.
///
/// `transform` is applied to every node once its children are aggregated, and
/// `aggregate` turns a lazy [`Group`] of transformed siblings into the children
/// value. The root group is aggregated too, and that is the result. Empty input
/// gives the aggregation of an empty group.
///
/// The aggregator doesn't have to consume its group: whatever it leaves behind
/// is drained before the parent node is handed out.
///
/// Records, values and both closures only need to outlive the build, so they
/// may borrow from the caller (e.g. `Record<&str>` over the lines of a text).
///
/// Every nesting level recurses through `aggregate` and the group cursor, so
/// the depth of the input is bounded by the stack: a few KB per level in debug
/// builds. A few hundred levels fit a default 2 MB test thread; run deeper
/// inputs on a thread with a larger stack.
pub fn build_tree<'a, T, V, C, I, M, R>(
    records: I,
    transform: M,
    aggregate: R,
    options: &BuildOptions,
) -> Result<C, TreeError<T>>
where
    I: IntoIterator<Item = Record<T>>,
    I::IntoIter: 'a,
    T: Clone + 'a,
    C: Clone,
    M: Fn(Node<T, C>) -> V + 'a,
    R: Fn(Group<'a, T, V, C>) -> C + 'a,
{
    debug!(
        starting_depth = options.starting_depth,
        mandatory = ?options.mandatory_depths,
        all = options.mandatory_depths_all,
        "building tree"
    );
    let shared = Shared::new(
        Box::new(levels(records, options)),
        Box::new(transform),
        Box::new(aggregate),
    );
    let root = Group::open(&shared, None);
    let result = (shared.aggregate)(root);

    match shared.failure() {
        Some(err) => Err(err),
        None => Ok(result),
    }
}

/// The default aggregator: collect the group in order.
pub fn collect_children<T: Clone, V, C: Clone>(group: Group<'_, T, V, C>) -> Vec<V> {
    group.collect()
}

/// Build fully materialized [`Tree`]s.
pub fn build_outline<'a, T, I>(
    records: I,
    options: &BuildOptions,
) -> Result<Vec<Tree<T>>, TreeError<T>>
where
    I: IntoIterator<Item = Record<T>>,
    I::IntoIter: 'a,
    T: Clone + 'a,
{
    build_tree(
        records,
        |node: Node<T, Vec<Tree<T>>>| Tree::from(node),
        collect_children,
        options,
    )
}

/// Build the terse [`Simple`] projection.
pub fn build_simple<'a, T, I>(
    records: I,
    options: &BuildOptions,
) -> Result<Vec<Simple<T>>, TreeError<T>>
where
    I: IntoIterator<Item = Record<T>>,
    I::IntoIter: 'a,
    T: Clone + 'a,
{
    build_tree(records, Simple::projector(options), collect_children, options)
}
