//! # Sanitizer Boundary
//!
//! Every fragment is cleaned before any node schema inspects it. Schemas
//! assume their input already went through a [`Sanitizer`] and do not
//! re-check for unsafe content.
//!
//! The contract:
//! - **Idempotent**: `sanitize(sanitize(x)) == sanitize(x)`
//! - **Total**: never fails; input it cannot handle yields an empty fragment
//! - **Subtractive**: only removes elements, attributes or wrappers

use crate::node::{DomNode, Element, Fragment};
use crate::tree_builder::parse_fragment;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Strips unsafe markup from a fragment
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, fragment: &Fragment) -> Fragment;
}

/// Parse raw markup and sanitize it in one step
pub fn sanitize_html(source: &str, sanitizer: &dyn Sanitizer) -> Fragment {
    sanitizer.sanitize(&parse_fragment(source))
}

/// Allowlist configuration for [`AllowlistSanitizer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SanitizerConfig {
    /// Tags kept as-is; other tags are unwrapped
    pub allowed_tags: Vec<String>,

    /// Attributes kept on any allowed tag (`data-*` is always kept)
    pub allowed_attributes: Vec<String>,

    /// URL schemes accepted in `src`/`href` (relative URLs are always accepted)
    pub allowed_schemes: Vec<String>,

    /// Fragments nested deeper than this are rejected entirely
    pub max_depth: usize,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            allowed_tags: strings(DEFAULT_ALLOWED_TAGS),
            allowed_attributes: strings(&[
                "src", "alt", "width", "height", "href", "title", "class", "id",
            ]),
            allowed_schemes: strings(&["http", "https", "mailto"]),
            max_depth: 512,
        }
    }
}

/// Tags kept by the default [`SanitizerConfig`]
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "p", "br", "img", "a", "em", "strong", "b", "i", "u", "s", "code", "pre", "blockquote",
    "ul", "ol", "li", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "span", "div", "table",
    "thead", "tbody", "tr", "th", "td",
];

/// Elements removed together with their content
const DANGEROUS_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "template", "noscript", "frame",
    "frameset", "applet",
];

/// Elements that may run script or load active content (case-insensitive)
pub fn is_dangerous_element(tag: &str) -> bool {
    DANGEROUS_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Attributes holding URLs
const URL_ATTRIBUTES: &[&str] = &["src", "href"];

/// Default sanitizer driven by a [`SanitizerConfig`]
#[derive(Debug, Clone, Default)]
pub struct AllowlistSanitizer {
    config: SanitizerConfig,
}

impl AllowlistSanitizer {
    pub fn new(config: SanitizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    fn clean_nodes(&self, nodes: &[DomNode], out: &mut Vec<DomNode>) {
        for node in nodes {
            match node {
                DomNode::Text { content } => push_text(out, content),
                DomNode::Element(el) => self.clean_element(el, out),
            }
        }
    }

    fn clean_element(&self, el: &Element, out: &mut Vec<DomNode>) {
        if is_dangerous_element(&el.tag) {
            debug!(tag = %el.tag, "Dropping element with content");
            return;
        }

        let mut children = Vec::new();
        self.clean_nodes(&el.children, &mut children);

        if !self.config.allowed_tags.iter().any(|t| *t == el.tag) {
            debug!(tag = %el.tag, "Unwrapping non-allowlisted element");
            for child in children {
                match child {
                    DomNode::Text { content } => push_text(out, &content),
                    other => out.push(other),
                }
            }
            return;
        }

        let attributes = el
            .attributes
            .iter()
            .filter(|(name, value)| self.keep_attribute(name, value))
            .cloned()
            .collect();

        out.push(DomNode::Element(Element {
            tag: el.tag.clone(),
            attributes,
            children,
        }));
    }

    fn keep_attribute(&self, name: &str, value: &str) -> bool {
        if name.starts_with("on") {
            return false;
        }
        let allowed = name.starts_with("data-")
            || self.config.allowed_attributes.iter().any(|a| a == name);
        if !allowed {
            return false;
        }
        if URL_ATTRIBUTES.contains(&name) && !self.is_safe_url(value) {
            debug!(attribute = name, "Dropping unsafe URL");
            return false;
        }
        true
    }

    fn is_safe_url(&self, url: &str) -> bool {
        // Control characters and whitespace are ignored by browsers when
        // resolving schemes ("java\tscript:")
        let normalized: String = url
            .chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .collect::<String>()
            .to_ascii_lowercase();

        let Some(colon) = normalized.find(':') else {
            return true;
        };
        let scheme = &normalized[..colon];
        // A colon after a path/query/fragment delimiter is not a scheme separator
        if scheme.contains(['/', '?', '#']) {
            return true;
        }
        if scheme == "data" {
            return normalized.starts_with("data:image/") && !normalized.starts_with("data:image/svg");
        }
        self.config.allowed_schemes.iter().any(|s| s == scheme)
    }
}

impl Sanitizer for AllowlistSanitizer {
    fn sanitize(&self, fragment: &Fragment) -> Fragment {
        if fragment.truncated || fragment.depth() > self.config.max_depth {
            warn!(
                max_depth = self.config.max_depth,
                "Fragment nested too deeply, returning empty fragment"
            );
            return Fragment::empty();
        }

        let mut children = Vec::new();
        self.clean_nodes(&fragment.children, &mut children);
        Fragment::new(children)
    }
}

fn push_text(out: &mut Vec<DomNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(DomNode::Text { content }) = out.last_mut() {
        content.push_str(text);
    } else {
        out.push(DomNode::text(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(source: &str) -> String {
        sanitize_html(source, &AllowlistSanitizer::default()).to_html()
    }

    #[test]
    fn test_script_removed_with_content() {
        assert_eq!(clean("<p>a<script>alert(1)</script>b</p>"), "<p>ab</p>");
    }

    #[test]
    fn test_event_handlers_removed() {
        assert_eq!(
            clean(r#"<img src="a.png" onerror="alert(1)">"#),
            r#"<img src="a.png">"#
        );
    }

    #[test]
    fn test_javascript_urls_removed() {
        assert_eq!(clean(r#"<img src="javascript:alert(1)">"#), "<img>");
        assert_eq!(clean(r#"<img src="JaVa&#x09;Script:alert(1)">"#), "<img>");
        assert_eq!(clean(r#"<a href="data:text/html,x">l</a>"#), "<a>l</a>");
    }

    #[test]
    fn test_safe_urls_kept() {
        assert_eq!(clean(r#"<img src="/a/b.png">"#), r#"<img src="/a/b.png">"#);
        assert_eq!(
            clean(r#"<img src="http://x/y.png?q=a:b">"#),
            r#"<img src="http://x/y.png?q=a:b">"#
        );
        assert_eq!(
            clean(r#"<img src="data:image/png;base64,AAAA">"#),
            r#"<img src="data:image/png;base64,AAAA">"#
        );
    }

    #[test]
    fn test_data_attributes_kept() {
        let html = clean(r#"<img src="a.png" data-raw-html="<custom-img/>">"#);
        assert_eq!(html, r#"<img src="a.png" data-raw-html="&lt;custom-img/&gt;">"#);
    }

    #[test]
    fn test_unknown_tags_unwrapped() {
        assert_eq!(clean("<p><font color=red>x</font>y</p>"), "<p>xy</p>");
    }

    #[test]
    fn test_idempotent() {
        let sanitizer = AllowlistSanitizer::default();
        let once = sanitize_html(
            r#"<div onclick="x"><font>a</font><img src="javascript:x"><script>s</script></div>"#,
            &sanitizer,
        );
        let twice = sanitizer.sanitize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dangerous_elements_ignore_case() {
        assert!(is_dangerous_element("script"));
        assert!(is_dangerous_element("IFrame"));
        assert!(!is_dangerous_element("img"));
    }

    #[test]
    fn test_too_deep_yields_empty_fragment() {
        let sanitizer = AllowlistSanitizer::new(SanitizerConfig {
            max_depth: 3,
            ..SanitizerConfig::default()
        });
        let fragment = sanitize_html("<div><div><div><div>x</div></div></div></div>", &sanitizer);
        assert!(fragment.is_empty());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SanitizerConfig = serde_json::from_str(r#"{"maxDepth": 8}"#).unwrap();
        assert_eq!(config.max_depth, 8);
        assert!(config.allowed_tags.contains(&"img".to_string()));
    }
}
