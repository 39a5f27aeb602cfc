use folio_dom::{parse_fragment, AllowlistSanitizer, Sanitizer};
use folio_schema::{
    attrs, AttrValue, AttributeSpec, DomTag, FallbackPolicy, Node, SchemaConfig, SchemaError,
    SchemaRegistry,
};

fn registry() -> SchemaRegistry {
    SchemaRegistry::with_defaults().unwrap()
}

fn parse(registry: &SchemaRegistry, html: &str) -> Node {
    registry.parse_html(html, &AllowlistSanitizer::default())
}

fn with_fallback(policy: FallbackPolicy) -> SchemaRegistry {
    SchemaRegistry::from_config(&SchemaConfig {
        fallback: policy,
        ..SchemaConfig::default()
    })
    .unwrap()
}

#[test]
fn test_image_with_raw_html_override() {
    let registry = registry();
    let doc = parse(
        &registry,
        r#"<img src="http://x/y.png" width="100" data-raw-html="<custom-img/>">"#,
    );

    let image = doc.node_at(&[0, 0]).unwrap();
    assert_eq!(image.node_type, "image");
    assert_eq!(image.attr("imageUrl"), &AttrValue::from("http://x/y.png"));
    assert_eq!(image.attr("width"), &AttrValue::from("100"));
    assert_eq!(image.attr("rawHTML"), &AttrValue::from("<custom-img/>"));
    assert!(image.attr("altText").is_null());
    assert!(image.attr("height").is_null());

    let spec = registry.serialize_node(image).unwrap();
    assert_eq!(spec.tag(), Some(&DomTag::Raw("<custom-img/>".to_string())));
    assert_eq!(spec.attr_names(), vec!["src", "width"]);
}

#[test]
fn test_raw_html_cannot_smuggle_active_elements() {
    let registry = registry();
    for raw in ["&lt;script&gt;", "<script>", "<iframe>", "<IFRAME>", "<embed/>", "<svg>"] {
        let html = format!(
            r#"<p><img src="https://evil.example/x.js" data-raw-html="{raw}"></p>"#
        );
        let doc = parse(&registry, &html);
        let image = doc.node_at(&[0, 0]).unwrap();
        assert!(image.attr("rawHTML").is_null(), "{raw}");

        let emitted = registry.to_html(&doc).unwrap();
        assert_eq!(emitted, r#"<p><img src="https://evil.example/x.js"></p>"#);
    }
}

#[test]
fn test_inline_content_is_wrapped_in_paragraph() {
    let doc = parse(&registry(), r#"<img src="a.png">"#);
    assert_eq!(doc.child_count(), 1);
    assert_eq!(doc.child(0).unwrap().node_type, "paragraph");
}

#[test]
fn test_every_declared_attribute_is_present() {
    let registry = registry();
    let doc = parse(&registry, r#"<p><img src="a.png"></p>"#);
    let image = doc.node_at(&[0, 0]).unwrap();

    let declared = registry.attributes_for("image").unwrap();
    for spec in declared.iter() {
        assert!(image.attrs.contains_key(&spec.name), "missing {}", spec.name);
    }
    assert_eq!(image.attrs.len(), declared.len());
    registry.validate_node(&doc).unwrap();
}

#[test]
fn test_round_trip_preserves_attributes() {
    let registry = registry();
    let image = registry
        .create_node(
            "image",
            attrs([
                ("imageUrl", "http://a/b.png?x=1&y=2"),
                ("altText", "A \"quoted\" <alt> & more"),
                ("width", "10"),
            ]),
            vec![],
        )
        .unwrap();
    let hard_break = registry.create_node("hardBreak", Default::default(), vec![]).unwrap();
    let paragraph = registry
        .create_node(
            "paragraph",
            Default::default(),
            vec![Node::text("Hi <there> "), image, hard_break, Node::text("again")],
        )
        .unwrap();
    let doc = registry.create_node("doc", Default::default(), vec![paragraph]).unwrap();

    let html = registry.to_html(&doc).unwrap();
    assert_eq!(parse(&registry, &html), doc);
}

#[test]
fn test_omitted_attributes_reparse_to_defaults() {
    let registry = registry();
    let image = registry
        .create_node("image", attrs([("imageUrl", "a.png"), ("altText", "")]), vec![])
        .unwrap();
    let paragraph = registry
        .create_node("paragraph", Default::default(), vec![image])
        .unwrap();
    let doc = registry.create_node("doc", Default::default(), vec![paragraph]).unwrap();

    let html = registry.to_html(&doc).unwrap();
    assert_eq!(html, r#"<p><img src="a.png"></p>"#);

    let reparsed = parse(&registry, &html);
    assert!(reparsed.node_at(&[0, 0]).unwrap().attr("altText").is_null());
}

#[test]
fn test_hostile_attribute_values_are_escaped() {
    let registry = registry();
    let image = registry
        .create_node(
            "image",
            attrs([
                ("imageUrl", "x\" onerror=\"alert(1)"),
                ("altText", "\"><script>alert(1)</script>"),
            ]),
            vec![],
        )
        .unwrap();

    let html = registry.serialize_node(&image).unwrap().to_html();
    assert!(!html.contains("<script"));
    assert!(!html.contains("\" onerror"));

    // Re-parsing yields the same values, not extra attributes
    let fragment = AllowlistSanitizer::default().sanitize(&parse_fragment(&html));
    let element = fragment.first_element().unwrap();
    assert_eq!(element.attributes.len(), 2);
    assert_eq!(element.get_attribute("src"), Some("x\" onerror=\"alert(1)"));
}

#[test]
fn test_scripts_and_event_handlers_never_reach_the_document() {
    let registry = registry();
    let doc = parse(
        &registry,
        r#"<p onclick="x()">a<script>alert(1)</script>b</p><img src="javascript:alert(1)">"#,
    );
    assert_eq!(doc.child_count(), 1);
    let paragraph = doc.child(0).unwrap();
    assert!(paragraph.attrs.is_empty());
    assert_eq!(paragraph.text_content(), "ab");
    assert!(doc.descendants().iter().all(|n| n.node_type != "image"));
}

#[test]
fn test_empty_input_yields_one_empty_paragraph() {
    let registry = registry();
    let doc = parse(&registry, "");
    assert_eq!(doc.child_count(), 1);
    assert_eq!(doc.child(0).unwrap().node_type, "paragraph");
    assert_eq!(registry.to_html(&doc).unwrap(), "<p></p>");
}

#[test]
fn test_rejected_image_goes_through_fallback() {
    let doc = parse(&registry(), r#"<p>a<img src="">b</p>"#);
    let paragraph = doc.child(0).unwrap();
    assert_eq!(paragraph.child_count(), 1);
    assert_eq!(paragraph.text_content(), "ab");
}

#[test]
fn test_whitespace_between_blocks_is_dropped() {
    let doc = parse(&registry(), "<p>a</p>\n  <p>b</p>\n");
    assert_eq!(doc.child_count(), 2);
    assert_eq!(doc.text_content(), "ab");
}

#[test]
fn test_nested_paragraph_content_is_lifted() {
    let doc = parse(&registry(), "<p>a<p>b</p></p>");
    assert_eq!(doc.child_count(), 1);
    let paragraph = doc.child(0).unwrap();
    assert_eq!(paragraph.child_count(), 1);
    assert_eq!(paragraph.text_content(), "ab");
}

#[test]
fn test_fallback_text() {
    let doc = parse(&with_fallback(FallbackPolicy::Text), "<div><p>a</p><p>b</p></div>");
    assert_eq!(doc.child_count(), 1);
    let paragraph = doc.child(0).unwrap();
    assert_eq!(paragraph.child_count(), 1);
    assert_eq!(paragraph.text_content(), "ab");
}

#[test]
fn test_fallback_unwrap() {
    let doc = parse(&with_fallback(FallbackPolicy::Unwrap), "<div><p>a</p><p>b</p></div>");
    assert_eq!(doc.child_count(), 2);
}

#[test]
fn test_fallback_drop() {
    let doc = parse(&with_fallback(FallbackPolicy::Drop), "<div><p>a</p></div><p>b</p>");
    assert_eq!(doc.child_count(), 1);
    assert_eq!(doc.text_content(), "b");
}

#[test]
fn test_custom_attributes_round_trip() {
    let registry = SchemaRegistry::from_config(&SchemaConfig {
        custom_attributes: vec![AttributeSpec::nullable("data-id")],
        ..SchemaConfig::default()
    })
    .unwrap();

    let doc = parse(&registry, r#"<p data-id="7">x</p><p>y</p>"#);
    assert_eq!(doc.child(0).unwrap().attr("data-id"), &AttrValue::from("7"));
    assert!(doc.child(1).unwrap().attr("data-id").is_null());
    assert_eq!(
        registry.to_html(&doc).unwrap(),
        r#"<p data-id="7">x</p><p>y</p>"#
    );
}

#[test]
fn test_registration_order_comes_from_config() {
    let config: SchemaConfig = serde_json::from_str(
        r#"{"nodes": ["image", "hardBreak", "text", "paragraph", "doc"]}"#,
    )
    .unwrap();
    let registry = SchemaRegistry::from_config(&config).unwrap();
    assert_eq!(
        registry.names(),
        vec!["image", "hardBreak", "text", "paragraph", "doc"]
    );
    let doc = parse(&registry, r#"<p><img src="a.png"><br></p>"#);
    assert_eq!(doc.node_at(&[0, 1]).unwrap().node_type, "hardBreak");
}

#[test]
fn test_unknown_node_in_config() {
    let config = SchemaConfig {
        nodes: vec!["doc".into(), "video".into()],
        ..SchemaConfig::default()
    };
    assert_eq!(
        SchemaRegistry::from_config(&config).unwrap_err(),
        SchemaError::UnknownNodeType("video".to_string())
    );
}

#[test]
fn test_serialize_unknown_node_type_fails() {
    let node = Node::new("video", Default::default(), vec![]);
    assert!(matches!(
        registry().serialize_node(&node),
        Err(SchemaError::UnknownNodeType(_))
    ));
}
