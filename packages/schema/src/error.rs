//! Error types for schema definition and node construction

use thiserror::Error;

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Configuration and construction errors.
///
/// These indicate a broken document grammar or a caller passing attributes
/// or node types the grammar does not declare. They are never swallowed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Unknown attribute '{attribute}' for node '{node}'")]
    UnknownAttribute { node: String, attribute: String },

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Duplicate node name: {0}")]
    DuplicateNodeName(String),

    #[error("Invalid content expression '{expr}' for node '{node}'")]
    InvalidContentExpr { node: String, expr: String },

    #[error("Invalid content for node '{node}': {reason}")]
    InvalidContent { node: String, reason: String },

    #[error("Invalid DOM match rule: {0}")]
    InvalidMatchRule(String),

    #[error("Schema is missing required node type: {0}")]
    MissingNodeType(String),
}

impl SchemaError {
    pub fn unknown_attribute(node: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            node: node.into(),
            attribute: attribute.into(),
        }
    }

    pub fn invalid_content(node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidContent {
            node: node.into(),
            reason: reason.into(),
        }
    }
}
