use folio_dom::{
    parse_fragment, sanitize_html, AllowlistSanitizer, DomNode, Sanitizer, SanitizerConfig,
    MAX_NESTING,
};

fn clean(source: &str) -> String {
    sanitize_html(source, &AllowlistSanitizer::default()).to_html()
}

#[test]
fn test_pasted_document_is_cleaned() {
    let source = r#"
        <!DOCTYPE html>
        <html><head><style>p { color: red }</style><script>steal()</script></head>
        <body onload="init()">
            <!-- comment -->
            <p class="lead" onmouseover="x()">Hello <b>world</b></p>
            <img src="https://cdn/x.png" alt="X" srcset="y.png 2x">
            <iframe src="https://evil"></iframe>
        </body></html>
    "#;

    let html = clean(source);
    assert!(html.contains(r#"<p class="lead">Hello <b>world</b></p>"#));
    assert!(html.contains(r#"<img src="https://cdn/x.png" alt="X">"#));
    for banned in ["script", "style", "iframe", "onload", "onmouseover", "srcset", "<!--", "html", "body"] {
        assert!(!html.contains(banned), "{} survived: {}", banned, html);
    }
}

#[test]
fn test_sanitizer_output_is_a_fixed_point() {
    let source = r#"<div><p>a<span onclick="x">b</span></p><a href="JaVaScRiPt:alert(1)">c</a><img src=data:image/png;base64,AAAA></div>"#;
    let once = clean(source);
    assert_eq!(clean(&once), once);
}

#[test]
fn test_custom_config_narrows_allowlist() {
    let config: SanitizerConfig =
        serde_json::from_str(r#"{"allowedTags": ["p"], "allowedSchemes": ["https"]}"#).unwrap();
    let sanitizer = AllowlistSanitizer::new(config);

    let fragment = sanitize_html(
        r#"<p><a href="https://x">link</a><img src="http://x/y.png"></p>"#,
        &sanitizer,
    );
    assert_eq!(fragment.to_html(), "<p>link</p>");
}

#[test]
fn test_deep_nesting_is_rejected() {
    let source = "<div>".repeat(600) + "x";
    let fragment = AllowlistSanitizer::default().sanitize(&parse_fragment(&source));
    assert!(fragment.is_empty());

    let source = "<div>".repeat(200_000) + "x";
    let parsed = parse_fragment(&source);
    assert!(parsed.truncated);
    assert!(AllowlistSanitizer::default().sanitize(&parsed).is_empty());
}

#[test]
fn test_truncated_input_is_rejected_under_a_loose_limit() {
    let sanitizer = AllowlistSanitizer::new(SanitizerConfig {
        max_depth: usize::MAX,
        ..SanitizerConfig::default()
    });
    let source = "<div>".repeat(MAX_NESTING + 1) + "x";
    assert!(sanitize_html(&source, &sanitizer).is_empty());
}

#[test]
fn test_text_survives_unwrapping_intact() {
    let fragment = sanitize_html("a<font>b</font>c &amp; d", &AllowlistSanitizer::default());
    assert_eq!(fragment.children, vec![DomNode::text("abc & d")]);
}
