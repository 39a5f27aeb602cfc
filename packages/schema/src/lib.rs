//! # Folio Schema
//!
//! Document grammar for the Folio editor: node types, their attributes, and
//! the mapping between sanitized DOM and the document tree.
//!
//! ```text
//! Fragment (sanitized) ──parse_document──▶ Node (doc)
//! Node ──serialize_node──▶ DomSpec ──to_html──▶ String
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_dom::AllowlistSanitizer;
//! use folio_schema::SchemaRegistry;
//!
//! let registry = SchemaRegistry::with_defaults()?;
//! let doc = registry.parse_html(r#"<img src="a.png" alt="A">"#, &AllowlistSanitizer::default());
//! assert_eq!(doc.node_at(&[0, 0]).unwrap().node_type, "image");
//! let html = registry.to_html(&doc)?;
//! ```

pub mod attrs;
pub mod config;
pub mod content;
pub mod dom_spec;
pub mod error;
pub mod node;
pub mod node_schema;
pub mod nodes;
pub mod registry;

pub use attrs::{attrs, AttrValue, AttributeSet, AttributeSpec, Attrs};
pub use config::SchemaConfig;
pub use content::ContentExpr;
pub use dom_spec::{safe_raw_tag, DomSpec, DomTag};
pub use error::{SchemaError, SchemaResult};
pub use node::{Node, TEXT_NODE};
pub use node_schema::{DomMatchRule, ExtractFn, NodeSchema, NodeSpec};
pub use nodes::{builtin, Doc, HardBreak, Image, Paragraph, Text, BUILTIN_NODES};
pub use registry::{FallbackPolicy, RegistryBuilder, SchemaRegistry, DOC_NODE};
