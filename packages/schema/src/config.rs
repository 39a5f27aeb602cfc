use crate::attrs::AttributeSpec;
use crate::nodes::BUILTIN_NODES;
use crate::registry::FallbackPolicy;
use serde::{Deserialize, Serialize};

/// Document grammar settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaConfig {
    /// Built-in node types to register, in parse priority order
    pub nodes: Vec<String>,

    /// Attributes every node type accepts in addition to its own
    pub custom_attributes: Vec<AttributeSpec>,

    /// What happens to elements no schema recognizes
    pub fallback: FallbackPolicy,

    /// Block used to wrap inline content at block level
    pub default_block: Option<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            nodes: BUILTIN_NODES.iter().map(|s| s.to_string()).collect(),
            custom_attributes: vec![],
            fallback: FallbackPolicy::default(),
            default_block: Some("paragraph".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::AttrValue;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "nodes": ["doc", "text", "paragraph"],
            "customAttributes": [{"name": "data-id"}, {"name": "class", "default": "x"}],
            "fallback": "unwrap"
        }"#;

        let config: SchemaConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.nodes, vec!["doc", "text", "paragraph"]);
        assert_eq!(config.custom_attributes.len(), 2);
        assert_eq!(config.custom_attributes[0].default, AttrValue::Null);
        assert_eq!(config.custom_attributes[1].default, AttrValue::from("x"));
        assert_eq!(config.fallback, FallbackPolicy::Unwrap);
        assert_eq!(config.default_block.as_deref(), Some("paragraph"));
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: SchemaConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SchemaConfig::default());
        assert_eq!(config.fallback, FallbackPolicy::Text);
    }
}
