//! Structured data formats backed by serde

use super::registry::{FormatError, Formatter};
use super::Output;

/// Pretty-printed JSON
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, output: &Output) -> Result<String, FormatError> {
        serde_json::to_string_pretty(output)
            .map(|json| json + "\n")
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "JSON dump of the tree"
    }
}

/// YAML
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, output: &Output) -> Result<String, FormatError> {
        serde_yaml::to_string(output).map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "YAML dump of the tree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Simple, Tree};

    #[test]
    fn json_outline() {
        let output = Output::Outline(vec![Tree::leaf("a".to_string(), 0)]);
        let json = JsonFormatter.serialize(&output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([{"depth": 0, "value": "a", "children": []}])
        );
    }

    #[test]
    fn json_simple() {
        let output = Output::Simple(vec![Simple::Branch(
            None,
            vec![Simple::Leaf(Some("x".to_string()))],
        )]);
        let json = JsonFormatter.serialize(&output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, serde_json::json!([[null, ["x"]]]));
    }

    #[test]
    fn yaml_outline() {
        let output = Output::Outline(vec![Tree::leaf("a".to_string(), 2)]);
        let yaml = YamlFormatter.serialize(&output).unwrap();
        insta::assert_snapshot!(yaml, @r"
        - depth: 2
          value: a
          children: []
        ");
    }
}
