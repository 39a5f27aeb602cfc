//! # Attribute Descriptor
//!
//! Every node attribute is declared up front with a default. Constructing a
//! node with a partial attribute map fills the gaps from the defaults;
//! undeclared keys are rejected.

use crate::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolved attribute map of a node
pub type Attrs = BTreeMap<String, AttrValue>;

/// Attribute value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    #[default]
    Null,
    Bool(bool),
    String(String),
}

impl AttrValue {
    /// `false` for null, `false` and the empty string
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Null => false,
            AttrValue::Bool(b) => *b,
            AttrValue::String(s) => !s.is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Value rendered as a DOM attribute, if it should be emitted at all
    pub fn to_dom_value(&self) -> Option<String> {
        match self {
            AttrValue::String(s) if !s.is_empty() => Some(s.clone()),
            AttrValue::Bool(true) => Some(String::new()),
            _ => None,
        }
    }

    /// Null for a missing or empty DOM attribute
    pub fn from_dom(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => AttrValue::String(v.to_string()),
            _ => AttrValue::Null,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttrValue::Null)
    }
}

/// Declared attribute with its default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    #[serde(default)]
    pub default: AttrValue,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, default: impl Into<AttrValue>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
        }
    }

    /// Attribute defaulting to null
    pub fn nullable(name: impl Into<String>) -> Self {
        Self::new(name, AttrValue::Null)
    }
}

/// Ordered, fixed set of attribute declarations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet {
    specs: Vec<AttributeSpec>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later declarations with an already-declared name are ignored
    pub fn with(mut self, spec: AttributeSpec) -> Self {
        if !self.contains(&spec.name) {
            self.specs.push(spec);
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.iter().any(|s| s.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// This set followed by the declarations of `extension` it does not
    /// already have
    pub fn merged(&self, extension: &AttributeSet) -> AttributeSet {
        extension
            .iter()
            .cloned()
            .fold(self.clone(), |set, spec| set.with(spec))
    }

    /// Fill every declared attribute missing from `supplied` with its default.
    ///
    /// `node` is only used for error reporting.
    pub fn resolve(&self, node: &str, supplied: Attrs) -> SchemaResult<Attrs> {
        if let Some(unknown) = supplied.keys().find(|k| !self.contains(k)) {
            return Err(SchemaError::unknown_attribute(node, unknown.clone()));
        }

        let mut resolved = supplied;
        for spec in &self.specs {
            resolved
                .entry(spec.name.clone())
                .or_insert_with(|| spec.default.clone());
        }
        Ok(resolved)
    }

    /// Check that `attrs` holds exactly the declared keys
    pub fn check_complete(&self, node: &str, attrs: &Attrs) -> SchemaResult<()> {
        if let Some(unknown) = attrs.keys().find(|k| !self.contains(k)) {
            return Err(SchemaError::unknown_attribute(node, unknown.clone()));
        }
        if let Some(missing) = self.specs.iter().find(|s| !attrs.contains_key(&s.name)) {
            return Err(SchemaError::invalid_content(
                node,
                format!("missing attribute '{}'", missing.name),
            ));
        }
        Ok(())
    }
}

impl FromIterator<AttributeSpec> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = AttributeSpec>>(iter: I) -> Self {
        iter.into_iter().fold(AttributeSet::new(), |set, spec| set.with(spec))
    }
}

/// Build an [`Attrs`] map from `(name, value)` pairs
pub fn attrs<K, V, I>(pairs: I) -> Attrs
where
    K: Into<String>,
    V: Into<AttrValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
