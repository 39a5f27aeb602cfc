//! `addImage`: replace the selection with an image node.

use super::{parse_payload, run, Command};
use crate::editor::Dispatch;
use crate::state::EditorState;
use folio_schema::{AttrValue, Attrs};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Payload of `addImage`. Only `imageUrl` is required; empty optional
/// fields are left at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagePayload {
    pub image_url: Option<String>,
    pub alt_text: Option<String>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
}

/// Width/height given as a number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Number(serde_json::Number),
    Text(String),
}

impl Dimension {
    fn to_attr(&self) -> Option<String> {
        match self {
            Dimension::Number(n) if n.as_f64() == Some(0.0) => None,
            Dimension::Number(n) => Some(n.to_string()),
            Dimension::Text(s) if s.is_empty() => None,
            Dimension::Text(s) => Some(s.clone()),
        }
    }
}

impl ImagePayload {
    /// Node attributes, or `None` without an image URL
    pub fn to_attrs(&self) -> Option<Attrs> {
        let image_url = self.image_url.as_deref().filter(|url| !url.is_empty())?;

        let mut attrs = Attrs::new();
        attrs.insert("imageUrl".to_string(), AttrValue::from(image_url));
        if let Some(alt) = self.alt_text.as_deref().filter(|alt| !alt.is_empty()) {
            attrs.insert("altText".to_string(), AttrValue::from(alt));
        }
        if let Some(width) = self.width.as_ref().and_then(Dimension::to_attr) {
            attrs.insert("width".to_string(), AttrValue::from(width));
        }
        if let Some(height) = self.height.as_ref().and_then(Dimension::to_attr) {
            attrs.insert("height".to_string(), AttrValue::from(height));
        }
        Some(attrs)
    }
}

pub struct AddImage;

impl Command for AddImage {
    fn name(&self) -> &'static str {
        "addImage"
    }

    fn execute(&self, payload: &Value, state: &EditorState, dispatch: Option<&mut dyn Dispatch>) -> bool {
        let attrs = match parse_payload::<ImagePayload>(payload) {
            Ok(payload) => payload.to_attrs(),
            Err(e) => {
                debug!(command = self.name(), error = %e, "Rejected payload");
                return false;
            }
        };
        let Some(attrs) = attrs else {
            debug!(command = self.name(), "Missing imageUrl");
            return false;
        };

        let node = match state.schema().create_node("image", attrs, Vec::new()) {
            Ok(node) => node,
            Err(e) => {
                debug!(command = self.name(), error = %e, "Cannot build image node");
                return false;
            }
        };

        let tr = state
            .tr()
            .replace_selection_with(node)
            .scroll_into_view()
            .set_description("Insert image");
        run(self.name(), tr, state, dispatch)
    }
}
