//! DOM tree types

use crate::escape::{escape_attribute, escape_text};
use crate::is_void_element;
use serde::{Deserialize, Serialize};

/// A node in a parsed DOM fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomNode {
    Element(Element),
    Text { content: String },
}

impl DomNode {
    pub fn text(content: impl Into<String>) -> Self {
        DomNode::Text {
            content: content.into(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            DomNode::Element(el) => Some(el),
            DomNode::Text { .. } => None,
        }
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        match self {
            DomNode::Element(el) => el.text_content(),
            DomNode::Text { content } => content.clone(),
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            DomNode::Element(el) => el.write_html(out),
            DomNode::Text { content } => out.push_str(&escape_text(content)),
        }
    }
}

impl From<Element> for DomNode {
    fn from(el: Element) -> Self {
        DomNode::Element(el)
    }
}

/// HTML element with lower-cased tag and attribute names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    /// Attributes in source order; values are decoded
    pub attributes: Vec<(String, String)>,
    pub children: Vec<DomNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<DomNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self
            .attributes
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(pos).1)
    }

    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                DomNode::Element(el) => text.push_str(&el.text_content()),
                DomNode::Text { content } => text.push_str(content),
            }
        }
        text
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attribute(value));
            out.push('"');
        }
        out.push('>');

        if is_void_element(&self.tag) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// An ordered list of sibling nodes with no enclosing element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub children: Vec<DomNode>,

    /// Set by the tree builder when nesting past [`MAX_NESTING`] was cut off
    ///
    /// [`MAX_NESTING`]: crate::MAX_NESTING
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl Fragment {
    pub fn new(children: Vec<DomNode>) -> Self {
        Self {
            children,
            truncated: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn first_element(&self) -> Option<&Element> {
        self.children.iter().find_map(DomNode::as_element)
    }

    /// Nesting depth of the deepest element (0 for text-only fragments)
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(&DomNode, usize)> = self.children.iter().map(|n| (n, 1)).collect();
        while let Some((node, depth)) = pending.pop() {
            if let DomNode::Element(el) = node {
                deepest = deepest.max(depth);
                pending.extend(el.children.iter().map(|child| (child, depth + 1)));
            }
        }
        deepest
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(&mut out);
        }
        out
    }
}
