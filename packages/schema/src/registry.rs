//! # Schema Registry
//!
//! Aggregates node schemas into one document grammar and maps between
//! sanitized DOM and the document tree.
//!
//! ## Registration order
//!
//! Order is explicit configuration, not an accident of construction:
//! parsing tries schemas in the order they were registered and the first one
//! whose rule matches decides the element's fate. If that rule rejects the
//! element, the fallback policy applies; later schemas are not consulted.
//!
//! ## Parsing is total
//!
//! [`SchemaRegistry::parse_document`] always produces a document:
//! unrecognized elements go through the [`FallbackPolicy`], inline content
//! found where blocks are expected is wrapped in the default block, and
//! anything that fits nowhere is dropped.

use crate::attrs::{AttrValue, AttributeSet, Attrs};
use crate::config::SchemaConfig;
use crate::content::ContentExpr;
use crate::dom_spec::DomSpec;
use crate::error::{SchemaError, SchemaResult};
use crate::node::{Node, TEXT_NODE};
use crate::node_schema::NodeSchema;
use crate::nodes::builtin;
use folio_dom::{parse_fragment, DomNode, Element, Fragment, Sanitizer};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name of the root node type
pub const DOC_NODE: &str = "doc";

/// What happens to an element no schema recognizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Replace the element with its text content
    #[default]
    Text,
    /// Parse the element's children in its place
    Unwrap,
    /// Remove the element and its content
    Drop,
}

/// Collects schemas and settings, validated by [`RegistryBuilder::build`]
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    schemas: Vec<Arc<dyn NodeSchema>>,
    index: HashMap<String, usize>,
    custom_attributes: AttributeSet,
    fallback: FallbackPolicy,
    default_block: Option<String>,
}

impl RegistryBuilder {
    /// Register a schema. On a duplicate name the first registration is kept.
    pub fn register(&mut self, schema: Arc<dyn NodeSchema>) -> SchemaResult<&mut Self> {
        let name = schema.name().to_string();
        if self.index.contains_key(&name) {
            return Err(SchemaError::DuplicateNodeName(name));
        }
        debug!(node = %name, position = self.schemas.len(), "Registering node schema");
        self.index.insert(name, self.schemas.len());
        self.schemas.push(schema);
        Ok(self)
    }

    /// Attributes merged into every node type and echoed on serialization
    pub fn custom_attributes(&mut self, attributes: AttributeSet) -> &mut Self {
        self.custom_attributes = attributes;
        self
    }

    pub fn fallback(&mut self, policy: FallbackPolicy) -> &mut Self {
        self.fallback = policy;
        self
    }

    /// Node used to wrap inline content found in a block container
    pub fn default_block(&mut self, name: Option<String>) -> &mut Self {
        self.default_block = name;
        self
    }

    pub fn build(&mut self) -> SchemaResult<SchemaRegistry> {
        for required in [DOC_NODE, TEXT_NODE] {
            if !self.index.contains_key(required) {
                return Err(SchemaError::MissingNodeType(required.to_string()));
            }
        }

        for schema in &self.schemas {
            if let Some(expr) = &schema.spec().content {
                let known = self.index.contains_key(&expr.target)
                    || self
                        .schemas
                        .iter()
                        .any(|s| s.spec().group.as_deref() == Some(expr.target.as_str()));
                if !known {
                    return Err(SchemaError::InvalidContentExpr {
                        node: schema.name().to_string(),
                        expr: expr.to_string(),
                    });
                }
            }
        }

        if let Some(block) = &self.default_block {
            let usable = self
                .index
                .get(block)
                .map(|&i| &self.schemas[i])
                .is_some_and(|s| !s.spec().inline && !s.spec().is_leaf());
            if !usable {
                return Err(SchemaError::UnknownNodeType(block.clone()));
            }
        }

        info!(
            nodes = self.schemas.len(),
            custom_attributes = self.custom_attributes.len(),
            "Schema registry built"
        );

        Ok(SchemaRegistry {
            schemas: std::mem::take(&mut self.schemas),
            index: std::mem::take(&mut self.index),
            custom_attributes: std::mem::take(&mut self.custom_attributes),
            fallback: self.fallback,
            default_block: self.default_block.take(),
        })
    }
}

/// Immutable document grammar
pub struct SchemaRegistry {
    schemas: Vec<Arc<dyn NodeSchema>>,
    index: HashMap<String, usize>,
    custom_attributes: AttributeSet,
    fallback: FallbackPolicy,
    default_block: Option<String>,
}

impl SchemaRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// All built-in nodes in default order
    pub fn with_defaults() -> SchemaResult<Self> {
        Self::from_config(&SchemaConfig::default())
    }

    /// Register built-in nodes in the order listed by the config
    pub fn from_config(config: &SchemaConfig) -> SchemaResult<Self> {
        let mut builder = Self::builder();
        for name in &config.nodes {
            builder.register(builtin(name)?)?;
        }
        builder
            .custom_attributes(config.custom_attributes.iter().cloned().collect())
            .fallback(config.fallback)
            .default_block(config.default_block.clone())
            .build()
    }

    pub fn resolve(&self, name: &str) -> SchemaResult<&dyn NodeSchema> {
        self.index
            .get(name)
            .map(|&i| self.schemas[i].as_ref())
            .ok_or_else(|| SchemaError::UnknownNodeType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Schemas in registration order
    pub fn schemas(&self) -> impl Iterator<Item = &dyn NodeSchema> {
        self.schemas.iter().map(|s| s.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.schemas().map(|s| s.name()).collect()
    }

    pub fn custom_attributes(&self) -> &AttributeSet {
        &self.custom_attributes
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    pub fn default_block(&self) -> Option<&str> {
        self.default_block.as_deref()
    }

    /// Declared attributes of a node type plus the custom extension
    pub fn attributes_for(&self, name: &str) -> SchemaResult<AttributeSet> {
        let schema = self.resolve(name)?;
        Ok(schema.spec().attributes.merged(&self.custom_attributes))
    }

    /// Build a node with defaults filled in and content validated
    pub fn create_node(&self, name: &str, supplied: Attrs, content: Vec<Node>) -> SchemaResult<Node> {
        if name == TEXT_NODE {
            return Err(SchemaError::invalid_content(TEXT_NODE, "use Node::text"));
        }
        let attrs = self.attributes_for(name)?.resolve(name, supplied)?;
        let node = Node::new(name, attrs, content);
        self.check_content(&node)?;
        Ok(node)
    }

    /// Whether `child` may appear directly inside a node of type `parent`
    pub fn allows_child(&self, parent: &str, child: &str) -> SchemaResult<bool> {
        let parent_spec = self.resolve(parent)?.spec();
        let child_spec = self.resolve(child)?.spec();
        Ok(parent_spec
            .content
            .as_ref()
            .is_some_and(|expr| expr.allows(&child_spec.name, child_spec.group.as_deref())))
    }

    /// Check the direct children of `node` against its content expression
    pub fn check_content(&self, node: &Node) -> SchemaResult<()> {
        let spec = self.resolve(&node.node_type)?.spec();
        let Some(expr) = &spec.content else {
            if node.content.is_empty() {
                return Ok(());
            }
            return Err(SchemaError::invalid_content(&spec.name, "leaf node has content"));
        };

        for child in &node.content {
            if !self.allows_child(&spec.name, &child.node_type)? {
                return Err(SchemaError::invalid_content(
                    &spec.name,
                    format!("'{}' not allowed by '{}'", child.node_type, expr),
                ));
            }
        }

        if !expr.accepts_count(node.content.len()) {
            return Err(SchemaError::invalid_content(
                &spec.name,
                format!("{} children do not satisfy '{}'", node.content.len(), expr),
            ));
        }

        Ok(())
    }

    /// Deep validation: known types, complete attributes, valid content,
    /// non-empty text
    pub fn validate_node(&self, node: &Node) -> SchemaResult<()> {
        if node.is_text() {
            self.resolve(TEXT_NODE)?;
            return match node.text.as_deref() {
                Some(text) if !text.is_empty() => Ok(()),
                _ => Err(SchemaError::invalid_content(TEXT_NODE, "empty text node")),
            };
        }

        self.attributes_for(&node.node_type)?
            .check_complete(&node.node_type, &node.attrs)?;
        self.check_content(node)?;
        node.content.iter().try_for_each(|child| self.validate_node(child))
    }

    // ---------------------------------------------------------------------
    // DOM → document
    // ---------------------------------------------------------------------

    /// Tokenize, sanitize and parse markup
    pub fn parse_html(&self, source: &str, sanitizer: &dyn Sanitizer) -> Node {
        let fragment = sanitizer.sanitize(&parse_fragment(source));
        self.parse_document(&fragment)
    }

    /// Build a document from a sanitized fragment
    pub fn parse_document(&self, fragment: &Fragment) -> Node {
        let mut parsed = Vec::new();
        self.parse_nodes(&fragment.children, &mut parsed);

        let doc_attrs = self
            .attributes_for(DOC_NODE)
            .and_then(|set| set.resolve(DOC_NODE, Attrs::new()))
            .unwrap_or_default();
        let content = match self.resolve(DOC_NODE) {
            Ok(doc) => self.fit_content(doc.spec().content.as_ref(), parsed),
            Err(_) => Vec::new(),
        };

        debug!(blocks = content.len(), "Parsed document");
        Node::new(DOC_NODE, doc_attrs, content)
    }

    fn parse_nodes(&self, nodes: &[DomNode], out: &mut Vec<Node>) {
        for node in nodes {
            match node {
                DomNode::Text { content } => push_text(out, content),
                DomNode::Element(element) => self.parse_element(element, out),
            }
        }
    }

    fn parse_element(&self, element: &Element, out: &mut Vec<Node>) {
        match self.recognize(element) {
            Some((schema, attrs)) => {
                let spec = schema.spec();
                let content = if spec.is_leaf() {
                    Vec::new()
                } else {
                    let mut children = Vec::new();
                    self.parse_nodes(&element.children, &mut children);
                    self.fit_content(spec.content.as_ref(), children)
                };
                out.push(Node::new(&spec.name, attrs, content));
            }
            None => self.apply_fallback(element, out),
        }
    }

    /// First schema (in registration order) that matches, with resolved
    /// attributes; `None` if nothing matches or the match rejects
    fn recognize(&self, element: &Element) -> Option<(&dyn NodeSchema, Attrs)> {
        let schema = self.schemas().find(|s| s.matches(element))?;
        let Some(mut attrs) = schema.parse(element) else {
            debug!(node = %schema.name(), tag = %element.tag, "Parse rule rejected element");
            return None;
        };

        for custom in self.custom_attributes.iter() {
            if !schema.spec().attributes.contains(&custom.name) {
                if let Some(value) = element.get_attribute(&custom.name) {
                    attrs.insert(custom.name.clone(), AttrValue::from_dom(Some(value)));
                }
            }
        }

        match self
            .attributes_for(schema.name())
            .and_then(|set| set.resolve(schema.name(), attrs))
        {
            Ok(resolved) => Some((schema, resolved)),
            Err(e) => {
                warn!(node = %schema.name(), error = %e, "Parse rule produced undeclared attributes");
                None
            }
        }
    }

    fn apply_fallback(&self, element: &Element, out: &mut Vec<Node>) {
        debug!(tag = %element.tag, policy = ?self.fallback, "Applying fallback to unrecognized element");
        match self.fallback {
            FallbackPolicy::Text => push_text(out, &element.text_content()),
            FallbackPolicy::Unwrap => self.parse_nodes(&element.children, out),
            FallbackPolicy::Drop => {}
        }
    }

    /// Make parsed children fit a content expression: wrap stray inline
    /// content in the default block, lift the content of disallowed
    /// containers, drop the rest
    fn fit_content(&self, expr: Option<&ContentExpr>, children: Vec<Node>) -> Vec<Node> {
        let Some(expr) = expr else {
            return Vec::new();
        };

        let mut fitted = Vec::new();
        let mut pending: Vec<Node> = Vec::new();
        let mut queue: VecDeque<Node> = children.into();

        while let Some(child) = queue.pop_front() {
            if self.expr_allows(expr, &child) {
                self.flush_wrapped(&mut pending, &mut fitted);
                fitted.push(child);
            } else if self.wrapper_accepts(expr, &child) {
                let blank = child.is_text() && child.text_content().trim().is_empty();
                if !(blank && pending.is_empty()) {
                    pending.push(child);
                }
            } else if !child.content.is_empty() {
                for grandchild in child.content.into_iter().rev() {
                    queue.push_front(grandchild);
                }
            } else {
                debug!(node = %child.node_type, target = %expr, "Dropping node that fits nowhere");
            }
        }
        self.flush_wrapped(&mut pending, &mut fitted);

        if fitted.is_empty() && expr.min > 0 {
            if let Some(block) = self.empty_default_block(expr) {
                fitted.push(block);
            }
        }

        merge_text(fitted)
    }

    fn expr_allows(&self, expr: &ContentExpr, node: &Node) -> bool {
        self.resolve(&node.node_type)
            .map(|schema| expr.allows(schema.name(), schema.spec().group.as_deref()))
            .unwrap_or(false)
    }

    fn wrapper_accepts(&self, expr: &ContentExpr, node: &Node) -> bool {
        let Some(block) = self.default_block.as_deref() else {
            return false;
        };
        let Ok(wrapper) = self.resolve(block) else {
            return false;
        };
        expr.allows(wrapper.name(), wrapper.spec().group.as_deref())
            && wrapper
                .spec()
                .content
                .as_ref()
                .is_some_and(|inner| self.expr_allows(inner, node))
    }

    fn flush_wrapped(&self, pending: &mut Vec<Node>, fitted: &mut Vec<Node>) {
        // Trailing whitespace between blocks is not content
        while pending
            .last()
            .is_some_and(|n| n.is_text() && n.text_content().trim().is_empty())
        {
            pending.pop();
        }
        if pending.is_empty() {
            return;
        }
        let content = merge_text(std::mem::take(pending));
        if let Some(mut block) = self.default_block.as_deref().and_then(|b| self.blank_node(b)) {
            block.content = content;
            fitted.push(block);
        }
    }

    fn empty_default_block(&self, expr: &ContentExpr) -> Option<Node> {
        let name = self.default_block.as_deref()?;
        let schema = self.resolve(name).ok()?;
        if !expr.allows(schema.name(), schema.spec().group.as_deref()) {
            return None;
        }
        self.blank_node(name)
    }

    fn blank_node(&self, name: &str) -> Option<Node> {
        let attrs = self
            .attributes_for(name)
            .and_then(|set| set.resolve(name, Attrs::new()))
            .ok()?;
        Some(Node::new(name, attrs, Vec::new()))
    }

    // ---------------------------------------------------------------------
    // document → DOM
    // ---------------------------------------------------------------------

    /// Serialize a node and its content. Truthy custom attributes are echoed.
    pub fn serialize_node(&self, node: &Node) -> SchemaResult<DomSpec> {
        let schema = self.resolve(&node.node_type)?;
        let mut spec = schema.serialize(node);
        if node.is_text() {
            return Ok(spec);
        }

        for custom in self.custom_attributes.iter() {
            if schema.spec().attributes.contains(&custom.name) {
                continue;
            }
            if let Some(value) = node.attr(&custom.name).to_dom_value() {
                spec = spec.with_attr(custom.name.clone(), &value);
            }
        }

        for child in &node.content {
            spec = spec.with_child(self.serialize_node(child)?);
        }
        Ok(spec)
    }

    /// Serialize the children of a document
    pub fn serialize_document(&self, doc: &Node) -> SchemaResult<Vec<DomSpec>> {
        doc.content.iter().map(|n| self.serialize_node(n)).collect()
    }

    pub fn to_html(&self, doc: &Node) -> SchemaResult<String> {
        let mut out = String::new();
        for spec in self.serialize_document(doc)? {
            spec.write_html(&mut out);
        }
        Ok(out)
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("nodes", &self.names())
            .field("custom_attributes", &self.custom_attributes.len())
            .field("fallback", &self.fallback)
            .finish()
    }
}

fn push_text(out: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node { text: Some(prev), .. }) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(Node::text(text));
    }
}

fn merge_text(nodes: Vec<Node>) -> Vec<Node> {
    let mut merged = Vec::with_capacity(nodes.len());
    for node in nodes {
        if node.is_text() {
            if let Some(text) = &node.text {
                push_text(&mut merged, text);
                continue;
            }
        }
        merged.push(node);
    }
    merged
}
