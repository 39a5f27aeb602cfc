//! Serialized DOM output of a node.
//!
//! Attribute values in a [`DomSpec`] are stored **already escaped**, so any
//! consumer can embed them verbatim. Text is stored raw and escaped on emission.

use folio_dom::{
    escape_attribute, escape_text, is_dangerous_element, is_void_element, DEFAULT_ALLOWED_TAGS,
};
use serde::{Deserialize, Serialize};

/// Tag of a serialized element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DomTag {
    /// Plain tag name
    Name(String),
    /// Raw markup overriding the default tag (e.g. `<custom-img/>`)
    Raw(String),
}

impl DomTag {
    /// Tag name used when emitting HTML.
    ///
    /// For raw markup this is the first tag name it contains, if that name
    /// passes [`safe_raw_tag`]; anything else falls back to `fallback`.
    pub fn element_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            DomTag::Name(name) => name,
            DomTag::Raw(raw) => safe_raw_tag(raw).unwrap_or(fallback),
        }
    }
}

/// First tag name in `raw` if it may be emitted: a lower-case custom element
/// name (one containing `-`) or a tag the default sanitizer keeps. Script
/// and embedding elements are never accepted.
pub fn safe_raw_tag(raw: &str) -> Option<&str> {
    let name = first_tag_name(raw)?;
    let well_formed = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let known = name.contains('-') || DEFAULT_ALLOWED_TAGS.contains(&name);
    (well_formed && known && !is_dangerous_element(name)).then_some(name)
}

fn first_tag_name(raw: &str) -> Option<&str> {
    let start = raw.find('<')? + 1;
    let rest = &raw[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
        .unwrap_or(rest.len());
    let name = &rest[..end];
    name.chars()
        .next()
        .filter(char::is_ascii_alphabetic)
        .map(|_| name)
}

/// Node serialized as DOM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomSpec {
    Text {
        content: String,
    },
    Element {
        tag: DomTag,
        /// Escaped values
        attrs: Vec<(String, String)>,
        children: Vec<DomSpec>,
    },
}

impl DomSpec {
    pub fn element(tag: impl Into<String>) -> Self {
        DomSpec::Element {
            tag: DomTag::Name(tag.into()),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn raw(markup: impl Into<String>) -> Self {
        DomSpec::Element {
            tag: DomTag::Raw(markup.into()),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        DomSpec::Text {
            content: content.into(),
        }
    }

    /// Add an attribute, escaping the value
    pub fn with_attr(mut self, name: impl Into<String>, value: &str) -> Self {
        if let DomSpec::Element { ref mut attrs, .. } = self {
            let name = name.into();
            if !attrs.iter().any(|(n, _)| *n == name) {
                attrs.push((name, escape_attribute(value).into_owned()));
            }
        }
        self
    }

    /// Add an attribute only when `value` is present and non-empty
    pub fn with_optional_attr(self, name: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.with_attr(name, v),
            _ => self,
        }
    }

    pub fn with_child(mut self, child: DomSpec) -> Self {
        if let DomSpec::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn tag(&self) -> Option<&DomTag> {
        match self {
            DomSpec::Element { tag, .. } => Some(tag),
            DomSpec::Text { .. } => None,
        }
    }

    /// Escaped value of an attribute
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            DomSpec::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            DomSpec::Text { .. } => None,
        }
    }

    pub fn attr_names(&self) -> Vec<&str> {
        match self {
            DomSpec::Element { attrs, .. } => attrs.iter().map(|(n, _)| n.as_str()).collect(),
            DomSpec::Text { .. } => Vec::new(),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub(crate) fn write_html(&self, out: &mut String) {
        match self {
            DomSpec::Text { content } => out.push_str(&escape_text(content)),
            DomSpec::Element {
                tag,
                attrs,
                children,
            } => {
                let name = tag.element_name("span");
                out.push('<');
                out.push_str(name);
                for (attr, value) in attrs {
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    // Already escaped
                    out.push_str(value);
                    out.push('"');
                }
                out.push('>');
                if is_void_element(name) {
                    return;
                }
                for child in children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}
