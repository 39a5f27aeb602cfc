use crate::attrs::Attrs;
use crate::dom_spec::DomSpec;
use crate::error::SchemaResult;
use crate::node::Node;
use crate::node_schema::{NodeSchema, NodeSpec};

/// Line break inside a block (`<br>`)
#[derive(Debug)]
pub struct HardBreak {
    spec: NodeSpec,
}

impl HardBreak {
    pub fn new() -> SchemaResult<Self> {
        let spec = NodeSpec::new("hardBreak")
            .inline(true)
            .group("inline")
            .selectable(false)
            .atom(true)
            .parse_rule("br", |_| Some(Attrs::new()))?;
        Ok(Self { spec })
    }
}

impl NodeSchema for HardBreak {
    fn spec(&self) -> &NodeSpec {
        &self.spec
    }

    fn serialize(&self, _node: &Node) -> DomSpec {
        DomSpec::element("br")
    }
}
