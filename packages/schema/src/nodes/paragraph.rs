use crate::attrs::Attrs;
use crate::dom_spec::DomSpec;
use crate::error::SchemaResult;
use crate::node::Node;
use crate::node_schema::{NodeSchema, NodeSpec};

#[derive(Debug)]
pub struct Paragraph {
    spec: NodeSpec,
}

impl Paragraph {
    pub fn new() -> SchemaResult<Self> {
        let spec = NodeSpec::new("paragraph")
            .group("block")
            .content("inline*")?
            .parse_rule("p", |_| Some(Attrs::new()))?;
        Ok(Self { spec })
    }
}

impl NodeSchema for Paragraph {
    fn spec(&self) -> &NodeSpec {
        &self.spec
    }

    fn serialize(&self, _node: &Node) -> DomSpec {
        DomSpec::element("p")
    }
}
