//! Diagnostic text format

use super::registry::{FormatError, Formatter};
use super::Output;

/// Renders each top-level tree with [`Tree::as_text`](crate::Tree::as_text),
/// one after another, each followed by a newline.
#[derive(Debug, Clone)]
pub struct TextFormatter {
    indent: String,
}

impl TextFormatter {
    pub fn new(indent: impl Into<String>) -> Self {
        TextFormatter {
            indent: indent.into(),
        }
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Formatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn serialize(&self, output: &Output) -> Result<String, FormatError> {
        let lines: Vec<String> = match output {
            Output::Outline(trees) => trees.iter().map(|t| t.as_text(&self.indent)).collect(),
            Output::Simple(trees) => trees.iter().map(|t| t.as_text(&self.indent)).collect(),
        };
        Ok(lines.into_iter().map(|text| text + "\n").collect())
    }

    fn description(&self) -> &str {
        "Indented `[depth] value` lines"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Simple, Tree};

    #[test]
    fn empty_forest_renders_nothing() {
        let text = TextFormatter::default().serialize(&Output::Outline(vec![]));
        assert_eq!(text, Ok(String::new()));
    }

    #[test]
    fn renders_each_root() {
        let output = Output::Outline(vec![
            Tree {
                depth: 0,
                value: None,
                children: vec![Tree::leaf("a".to_string(), 1)],
            },
            Tree::leaf("b".to_string(), 0),
        ]);
        let text = TextFormatter::default().serialize(&output).unwrap();
        insta::assert_snapshot!(text, @r"
        [0] ~
        .[1] a
        [0] b
        ");
    }

    #[test]
    fn renders_simple_projection() {
        let output = Output::Simple(vec![Simple::Branch(
            Some("a".to_string()),
            vec![Simple::Leaf(Some("b".to_string()))],
        )]);
        let text = TextFormatter::new("-").serialize(&output).unwrap();
        assert_eq!(text, "a\n-b\n");
    }
}
