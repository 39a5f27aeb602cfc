use crate::dom_spec::DomSpec;
use crate::error::SchemaResult;
use crate::node::Node;
use crate::node_schema::{NodeSchema, NodeSpec};

/// Document root. Never parsed from DOM; serializes to a `div` wrapper.
#[derive(Debug)]
pub struct Doc {
    spec: NodeSpec,
}

impl Doc {
    pub fn new() -> SchemaResult<Self> {
        Ok(Self {
            spec: NodeSpec::new("doc").selectable(false).content("block+")?,
        })
    }
}

impl NodeSchema for Doc {
    fn spec(&self) -> &NodeSpec {
        &self.spec
    }

    fn serialize(&self, _node: &Node) -> DomSpec {
        DomSpec::element("div")
    }
}
