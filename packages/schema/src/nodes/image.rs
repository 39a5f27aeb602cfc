//! Inline image.
//!
//! Parsed from `img[src]`:
//!
//! | DOM attribute   | Node attribute | Default |
//! |-----------------|----------------|---------|
//! | `src`           | `imageUrl`     | `""`    |
//! | `alt`           | `altText`      | null    |
//! | `width`         | `width`        | null    |
//! | `height`        | `height`       | null    |
//! | `data-raw-html` | `rawHTML`      | null    |
//!
//! An empty `src` rejects the element. When `rawHTML` is set, its markup
//! replaces the `img` tag on serialization; `rawHTML` itself is not emitted,
//! so such nodes do not survive a serialize/parse round trip unchanged.
//! Markup whose tag fails [`safe_raw_tag`] is ignored on parse and on
//! serialization.

use crate::attrs::{AttrValue, AttributeSet, AttributeSpec, Attrs};
use crate::dom_spec::{safe_raw_tag, DomSpec};
use crate::error::SchemaResult;
use crate::node::Node;
use crate::node_schema::{NodeSchema, NodeSpec};
use folio_dom::Element;

pub const IMAGE_URL: &str = "imageUrl";
pub const ALT_TEXT: &str = "altText";
pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
pub const RAW_HTML: &str = "rawHTML";

#[derive(Debug)]
pub struct Image {
    spec: NodeSpec,
}

impl Image {
    pub fn new() -> SchemaResult<Self> {
        let attributes = AttributeSet::new()
            .with(AttributeSpec::new(IMAGE_URL, ""))
            .with(AttributeSpec::nullable(ALT_TEXT))
            .with(AttributeSpec::nullable(WIDTH))
            .with(AttributeSpec::nullable(HEIGHT))
            .with(AttributeSpec::nullable(RAW_HTML));

        let spec = NodeSpec::new("image")
            .inline(true)
            .group("inline")
            .selectable(false)
            .atom(true)
            .attributes(attributes)
            .parse_rule("img[src]", parse_image)?;

        Ok(Self { spec })
    }
}

fn parse_image(element: &Element) -> Option<Attrs> {
    let image_url = element.get_attribute("src").filter(|src| !src.is_empty())?;

    let mut attrs = Attrs::new();
    attrs.insert(IMAGE_URL.to_string(), AttrValue::from(image_url));
    attrs.insert(ALT_TEXT.to_string(), AttrValue::from_dom(element.get_attribute("alt")));
    attrs.insert(WIDTH.to_string(), AttrValue::from_dom(element.get_attribute("width")));
    attrs.insert(HEIGHT.to_string(), AttrValue::from_dom(element.get_attribute("height")));

    if let Some(raw) = element
        .get_attribute("data-raw-html")
        .filter(|raw| safe_raw_tag(raw).is_some())
    {
        attrs.insert(RAW_HTML.to_string(), AttrValue::from(raw));
    }

    Some(attrs)
}

impl NodeSchema for Image {
    fn spec(&self) -> &NodeSpec {
        &self.spec
    }

    fn serialize(&self, node: &Node) -> DomSpec {
        let element = match node.attr(RAW_HTML).as_str().filter(|raw| safe_raw_tag(raw).is_some()) {
            Some(raw) => DomSpec::raw(raw),
            None => DomSpec::element("img"),
        };

        element
            .with_attr("src", node.attr(IMAGE_URL).as_str().unwrap_or_default())
            .with_optional_attr("alt", node.attr(ALT_TEXT).as_str())
            .with_optional_attr("width", node.attr(WIDTH).as_str())
            .with_optional_attr("height", node.attr(HEIGHT).as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::attrs;
    use crate::dom_spec::DomTag;

    fn image_node(pairs: &[(&str, &str)]) -> Node {
        let schema = Image::new().unwrap();
        let attrs = schema
            .spec()
            .attributes
            .resolve("image", attrs(pairs.iter().copied()))
            .unwrap();
        Node::new("image", attrs, vec![])
    }

    #[test]
    fn test_matches_only_img_with_src() {
        let image = Image::new().unwrap();
        assert!(image.matches(&Element::new("img").with_attr("src", "a.png")));
        assert!(!image.matches(&Element::new("img")));
        assert!(!image.matches(&Element::new("picture").with_attr("src", "a.png")));
    }

    #[test]
    fn test_empty_src_is_rejected() {
        let image = Image::new().unwrap();
        let el = Element::new("img").with_attr("src", "");
        assert!(image.matches(&el));
        assert_eq!(image.parse(&el), None);
    }

    #[test]
    fn test_parse_all_attributes() {
        let image = Image::new().unwrap();
        let el = Element::new("img")
            .with_attr("src", "http://x/y.png")
            .with_attr("alt", "A picture")
            .with_attr("width", "100")
            .with_attr("height", "")
            .with_attr("data-raw-html", "<custom-img/>");
        let parsed = image.parse(&el).unwrap();
        assert_eq!(parsed[IMAGE_URL], AttrValue::from("http://x/y.png"));
        assert_eq!(parsed[ALT_TEXT], AttrValue::from("A picture"));
        assert_eq!(parsed[WIDTH], AttrValue::from("100"));
        assert_eq!(parsed[HEIGHT], AttrValue::Null);
        assert_eq!(parsed[RAW_HTML], AttrValue::from("<custom-img/>"));
    }

    #[test]
    fn test_raw_html_only_set_when_present() {
        let image = Image::new().unwrap();
        let el = Element::new("img")
            .with_attr("src", "a.png")
            .with_attr("data-raw-html", "");
        assert!(!image.parse(&el).unwrap().contains_key(RAW_HTML));
    }

    #[test]
    fn test_serialize_omits_empty_attributes() {
        let node = image_node(&[(IMAGE_URL, "a.png"), (WIDTH, "10")]);
        let spec = Image::new().unwrap().serialize(&node);
        assert_eq!(spec.tag(), Some(&DomTag::Name("img".to_string())));
        assert_eq!(spec.attr_names(), vec!["src", "width"]);
    }

    #[test]
    fn test_serialize_raw_html_overrides_tag() {
        let node = image_node(&[(IMAGE_URL, "a.png"), (RAW_HTML, "<custom-img/>")]);
        let spec = Image::new().unwrap().serialize(&node);
        assert_eq!(spec.tag(), Some(&DomTag::Raw("<custom-img/>".to_string())));
        assert_eq!(spec.attr_names(), vec!["src"]);
    }

    #[test]
    fn test_unsafe_raw_html_is_ignored() {
        let image = Image::new().unwrap();
        let el = Element::new("img")
            .with_attr("src", "x.js")
            .with_attr("data-raw-html", "<script>");
        assert!(!image.parse(&el).unwrap().contains_key(RAW_HTML));

        // Nodes built directly still serialize as a plain image
        let node = image_node(&[(IMAGE_URL, "x.js"), (RAW_HTML, "<iframe>")]);
        let spec = image.serialize(&node);
        assert_eq!(spec.tag(), Some(&DomTag::Name("img".to_string())));
    }

    #[test]
    fn test_serialize_escapes_url_and_alt() {
        let node = image_node(&[(IMAGE_URL, "x\"><script>&"), (ALT_TEXT, "<b>")]);
        let spec = Image::new().unwrap().serialize(&node);
        for value in [spec.attr("src").unwrap(), spec.attr("alt").unwrap()] {
            assert!(!value.contains(['<', '>', '"']));
        }
    }
}
