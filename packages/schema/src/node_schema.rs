//! # Node Schema
//!
//! A node type is any value implementing [`NodeSchema`]: a static
//! [`NodeSpec`] describing its shape plus a serialization rule. Parsing is
//! driven by the `NodeSpec`'s ordered [`DomMatchRule`]s.
//!
//! ## Structural rules
//!
//! `inline`, `group`, `selectable` and `content` are fixed when the `NodeSpec` is
//! built. They decide where a node may appear and whether a node selection
//! may target it. Inserting a node where its group is not allowed fails the
//! whole transaction; nodes are never relocated to make them fit.

use crate::attrs::{AttributeSet, Attrs};
use crate::content::ContentExpr;
use crate::dom_spec::DomSpec;
use crate::error::{SchemaError, SchemaResult};
use crate::node::Node;
use folio_dom::Element;
use std::fmt;

/// Extracts node attributes from a sanitized element.
///
/// Returning `None` rejects the element even though its selector matched.
pub type ExtractFn = fn(&Element) -> Option<Attrs>;

/// Tag/attribute predicate plus attribute extractor
#[derive(Clone)]
pub struct DomMatchRule {
    selector: String,
    tag: String,
    required_attributes: Vec<String>,
    extract: ExtractFn,
}

impl DomMatchRule {
    /// Build from a selector of the form `tag` or `tag[attr][attr2]`
    pub fn new(selector: &str, extract: ExtractFn) -> SchemaResult<Self> {
        let invalid = || SchemaError::InvalidMatchRule(selector.to_string());

        let (tag, mut rest) = match selector.find('[') {
            Some(i) => (&selector[..i], &selector[i..]),
            None => (selector, ""),
        };
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid());
        }

        let mut required_attributes = Vec::new();
        while !rest.is_empty() {
            let inner = rest.strip_prefix('[').ok_or_else(invalid)?;
            let close = inner.find(']').ok_or_else(invalid)?;
            let attr = inner[..close].trim();
            if attr.is_empty() {
                return Err(invalid());
            }
            required_attributes.push(attr.to_ascii_lowercase());
            rest = &inner[close + 1..];
        }

        Ok(Self {
            selector: selector.to_string(),
            tag: tag.to_ascii_lowercase(),
            required_attributes,
            extract,
        })
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn matches(&self, element: &Element) -> bool {
        element.tag == self.tag
            && self
                .required_attributes
                .iter()
                .all(|attr| element.has_attribute(attr))
    }

    pub fn extract(&self, element: &Element) -> Option<Attrs> {
        (self.extract)(element)
    }
}

impl fmt::Debug for DomMatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomMatchRule")
            .field("selector", &self.selector)
            .finish()
    }
}

/// Static shape of a node type
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub name: String,
    pub inline: bool,
    pub group: Option<String>,
    pub selectable: bool,
    /// Leaf node edited as a unit
    pub atom: bool,
    /// `None` for leaf nodes
    pub content: Option<ContentExpr>,
    pub attributes: AttributeSet,
    pub parse_rules: Vec<DomMatchRule>,
}

impl NodeSpec {
    /// Block node with no content, selectable, no attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inline: false,
            group: None,
            selectable: true,
            atom: false,
            content: None,
            attributes: AttributeSet::new(),
            parse_rules: Vec::new(),
        }
    }

    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn atom(mut self, atom: bool) -> Self {
        self.atom = atom;
        self
    }

    pub fn content(mut self, expr: &str) -> SchemaResult<Self> {
        self.content = Some(ContentExpr::parse(&self.name, expr)?);
        Ok(self)
    }

    pub fn attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn parse_rule(mut self, selector: &str, extract: ExtractFn) -> SchemaResult<Self> {
        self.parse_rules.push(DomMatchRule::new(selector, extract)?);
        Ok(self)
    }

    pub fn is_leaf(&self) -> bool {
        self.content.is_none()
    }
}

/// Contract every node type satisfies
pub trait NodeSchema: Send + Sync + fmt::Debug {
    fn spec(&self) -> &NodeSpec;

    /// Convert a node of this type to DOM.
    ///
    /// Returns the element without children; the registry appends serialized
    /// content and custom attributes.
    fn serialize(&self, node: &Node) -> DomSpec;

    fn name(&self) -> &str {
        &self.spec().name
    }

    /// True if some parse rule's predicate accepts the element
    fn matches(&self, element: &Element) -> bool {
        self.spec().parse_rules.iter().any(|rule| rule.matches(element))
    }

    /// Extract attributes with the first matching rule.
    ///
    /// `None` when no rule matches or the first matching rule rejects the
    /// element; later rules are not tried. `element` must be sanitized.
    fn parse(&self, element: &Element) -> Option<Attrs> {
        self.spec()
            .parse_rules
            .iter()
            .find(|rule| rule.matches(element))
            .and_then(|rule| rule.extract(element))
    }
}
