//! Built-in node types

mod doc;
mod hard_break;
mod image;
mod paragraph;
mod text;

pub use doc::Doc;
pub use hard_break::HardBreak;
pub use image::Image;
pub use paragraph::Paragraph;
pub use text::Text;

use crate::error::{SchemaError, SchemaResult};
use crate::node_schema::NodeSchema;
use std::sync::Arc;

/// Names of the built-in node types, in default registration order
pub const BUILTIN_NODES: &[&str] = &["doc", "paragraph", "text", "hardBreak", "image"];

/// Construct a built-in node schema by name
pub fn builtin(name: &str) -> SchemaResult<Arc<dyn NodeSchema>> {
    let schema: Arc<dyn NodeSchema> = match name {
        "doc" => Arc::new(Doc::new()?),
        "paragraph" => Arc::new(Paragraph::new()?),
        "text" => Arc::new(Text::new()),
        "hardBreak" => Arc::new(HardBreak::new()?),
        "image" => Arc::new(Image::new()?),
        other => return Err(SchemaError::UnknownNodeType(other.to_string())),
    };
    Ok(schema)
}
