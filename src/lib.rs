//! # leveltree
//!
//! Turns a flat stream of leveled records into a tree, lazily.
//!
//! Outline-like formats (indented code, markup, org-style documents) imply their
//! structure through a depth number instead of open/close markers. This crate
//! takes records carrying such a depth and rebuilds the hierarchy:
//!
//! 1. [`levels`] resolves relative depths and fills in placeholder nodes for
//!    mandatory depths the input jumped over
//! 2. [`build_tree`] walks the resulting depth sequence with one lazy [`Group`]
//!    per open depth, handing each group to the caller's aggregator
//!
//! Nothing is materialized unless the aggregator does it; [`build_outline`]
//! is the setup that does.
//!
//! The [`notation`] module reads records from a compact line syntax, and
//! [`formats`] renders built trees as text, JSON or YAML.

pub mod error;
pub mod formats;
pub mod levels;
pub mod notation;
pub mod options;
pub mod record;
pub mod tree;

pub use error::TreeError;
pub use levels::{levels, Leveled, Levels};
pub use options::BuildOptions;
pub use record::{Depth, Record, RecordBuilder, RecordError};
pub use tree::group::Group;
pub use tree::node::{Node, Tree};
pub use tree::simple::Simple;
pub use tree::{build_outline, build_simple, build_tree, collect_children};
