use crate::dom_spec::DomSpec;
use crate::node::{Node, TEXT_NODE};
use crate::node_schema::{NodeSchema, NodeSpec};

/// Text leaf. Created from DOM text nodes by the registry, never matched
/// against elements.
#[derive(Debug)]
pub struct Text {
    spec: NodeSpec,
}

impl Text {
    pub fn new() -> Self {
        Self {
            spec: NodeSpec::new(TEXT_NODE).inline(true).group("inline"),
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeSchema for Text {
    fn spec(&self) -> &NodeSpec {
        &self.spec
    }

    fn serialize(&self, node: &Node) -> DomSpec {
        DomSpec::text(node.text.clone().unwrap_or_default())
    }
}
