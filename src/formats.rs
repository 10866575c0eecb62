//! Output formats for built trees
//!
//! - `text`: the diagnostic `[depth] value` rendering
//! - `json` / `yaml`: serde dumps of the same structure

pub mod data;
pub mod registry;
pub mod text;

use crate::tree::node::Tree;
use crate::tree::simple::Simple;
use serde::Serialize;

pub use data::{JsonFormatter, YamlFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use text::TextFormatter;

/// A built forest, ready to be rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Outline(Vec<Tree<String>>),
    Simple(Vec<Simple<String>>),
}
