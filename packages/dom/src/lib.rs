//! # Folio DOM
//!
//! Minimal DOM model for the editor's ingestion and emission boundaries.
//!
//! ```text
//! raw HTML ──tokenize──▶ Fragment ──sanitize──▶ Fragment ──▶ schema registry
//! ```
//!
//! The tree builder is total: any input produces a fragment. Nothing in this
//! crate knows about node schemas; it only shapes and cleans markup.

pub mod escape;
pub mod node;
pub mod sanitizer;
pub mod tokenizer;
mod tree_builder;

pub use escape::{escape_attribute, escape_text, unescape};
pub use node::{DomNode, Element, Fragment};
pub use sanitizer::{
    is_dangerous_element, sanitize_html, AllowlistSanitizer, Sanitizer, SanitizerConfig,
    DEFAULT_ALLOWED_TAGS,
};
pub use tokenizer::Token;
pub use tree_builder::{parse_fragment, MAX_NESTING};

/// Elements that never have children or a closing tag
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "img"
            | "input"
            | "br"
            | "hr"
            | "meta"
            | "link"
            | "area"
            | "base"
            | "col"
            | "embed"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose content is raw text up to the matching close tag
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}
