//! Document tree nodes.
//!
//! A node owns its children exclusively. Nodes are plain values: editing
//! goes through transactions, which build a new tree instead of mutating a
//! shared one.

use crate::attrs::{AttrValue, Attrs};
use serde::{Deserialize, Serialize};

/// Name of the built-in text node type
pub const TEXT_NODE: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,

    /// Only set for text nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Node {
    /// Node with the given attributes and children, unchecked.
    ///
    /// Use `SchemaRegistry::create_node` to resolve defaults and validate.
    pub fn new(node_type: impl Into<String>, attrs: Attrs, content: Vec<Node>) -> Self {
        Self {
            node_type: node_type.into(),
            attrs,
            content,
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            node_type: TEXT_NODE.to_string(),
            attrs: Attrs::new(),
            content: Vec::new(),
            text: Some(text.into()),
        }
    }

    pub fn is_text(&self) -> bool {
        self.node_type == TEXT_NODE
    }

    pub fn attr(&self, name: &str) -> &AttrValue {
        static NULL: AttrValue = AttrValue::Null;
        self.attrs.get(name).unwrap_or(&NULL)
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.content.get(index)
    }

    pub fn child_count(&self) -> usize {
        self.content.len()
    }

    /// Length in chars of a text node, 0 otherwise
    pub fn text_len(&self) -> usize {
        self.text.as_deref().map_or(0, |t| t.chars().count())
    }

    /// Descendant at `path` (child indices from this node)
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        path.iter().try_fold(self, |node, &i| node.content.get(i))
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        path.iter()
            .try_fold(self, |node, &i| node.content.get_mut(i))
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => self.content.iter().map(Node::text_content).collect(),
        }
    }

    /// Depth-first pre-order walk, including `self`
    pub fn descendants(&self) -> Vec<&Node> {
        let mut out = vec![self];
        for child in &self.content {
            out.extend(child.descendants());
        }
        out
    }
}
