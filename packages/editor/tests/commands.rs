//! Command behaviour through the editor facade

use folio_dom::AllowlistSanitizer;
use folio_editor::{Editor, EditorState, Position, Selection};
use folio_schema::{AttrValue, SchemaRegistry};
use serde_json::json;
use std::sync::Arc;

fn editor(html: &str) -> Editor {
    let schema = Arc::new(SchemaRegistry::with_defaults().unwrap());
    let state = EditorState::from_html(schema, html, &AllowlistSanitizer::default()).unwrap();
    Editor::new(state)
}

fn move_cursor(editor: &mut Editor, at: Position) {
    use folio_editor::Dispatch;
    let tr = editor.state().tr().set_selection(Selection::cursor(at));
    editor.dispatch(tr).unwrap();
}

#[test]
fn test_add_image_at_cursor() {
    let mut editor = editor("<p>Hello</p>");
    let payload = json!({"imageUrl": "cat.png", "altText": "A cat", "width": 120});

    assert!(editor.can_execute("addImage", &payload));
    assert_eq!(editor.state().version(), 0);

    assert!(editor.execute("addImage", &payload));
    assert_eq!(editor.state().version(), 1);

    let image = editor.state().doc().node_at(&[0, 0]).unwrap();
    assert_eq!(image.node_type, "image");
    assert_eq!(image.attr("imageUrl"), &AttrValue::from("cat.png"));
    assert_eq!(image.attr("altText"), &AttrValue::from("A cat"));
    assert_eq!(image.attr("width"), &AttrValue::from("120"));
    assert!(image.attr("height").is_null());

    // Cursor lands right after the image
    assert_eq!(
        editor.state().selection(),
        &Selection::cursor(Position::new(vec![0], 1))
    );
    assert!(editor.take_scroll_request());
    assert_eq!(
        editor.state().to_html().unwrap(),
        r#"<p><img src="cat.png" alt="A cat" width="120">Hello</p>"#
    );
}

#[test]
fn test_add_image_inside_text_splits_it() {
    let mut editor = editor("<p>Hello</p>");
    move_cursor(&mut editor, Position::new(vec![0, 0], 2));

    assert!(editor.execute("addImage", &json!({"imageUrl": "a.png"})));
    assert_eq!(
        editor.state().to_html().unwrap(),
        r#"<p>He<img src="a.png">llo</p>"#
    );
    assert_eq!(
        editor.state().selection(),
        &Selection::cursor(Position::new(vec![0], 2))
    );
}

#[test]
fn test_add_image_replaces_text_range() {
    use folio_editor::Dispatch;

    let mut editor = editor("<p>Hello</p>");
    let tr = editor.state().tr().set_selection(Selection::text(
        Position::new(vec![0, 0], 1),
        Position::new(vec![0, 0], 4),
    ));
    editor.dispatch(tr).unwrap();

    assert!(editor.execute("addImage", &json!({"imageUrl": "a.png"})));
    assert_eq!(
        editor.state().to_html().unwrap(),
        r#"<p>H<img src="a.png">o</p>"#
    );
}

#[test]
fn test_add_image_without_url_does_nothing() {
    let mut editor = editor("<p>Hello</p>");

    for payload in [json!({}), json!({"imageUrl": ""}), json!({"altText": "no source"})] {
        assert!(!editor.can_execute("addImage", &payload));
        assert!(!editor.execute("addImage", &payload));
    }
    assert_eq!(editor.state().version(), 0);
    assert!(!editor.history().can_undo());
    assert!(!editor.take_scroll_request());
}

#[test]
fn test_add_image_with_fractional_width() {
    let mut editor = editor("<p>Hello</p>");
    assert!(editor.execute("addImage", &json!({"imageUrl": "a.png", "width": 12.5})));
    assert_eq!(
        editor.state().to_html().unwrap(),
        r#"<p><img src="a.png" width="12.5">Hello</p>"#
    );
}

#[test]
fn test_add_image_with_malformed_payload() {
    let mut editor = editor("<p>Hello</p>");
    assert!(!editor.execute("addImage", &json!({"imageUrl": 42})));
    assert!(!editor.execute("addImage", &json!("cat.png")));
    assert_eq!(editor.state().version(), 0);
}

#[test]
fn test_add_image_between_blocks_is_rejected() {
    let mut editor = editor("<p>Hello</p>");
    move_cursor(&mut editor, Position::new(vec![], 1));
    let version = editor.state().version();

    let payload = json!({"imageUrl": "a.png"});
    assert!(!editor.can_execute("addImage", &payload));
    assert!(!editor.execute("addImage", &payload));
    assert_eq!(editor.state().version(), version);
    assert_eq!(editor.state().doc().child_count(), 1);
}

#[test]
fn test_insert_text_and_hard_break() {
    let mut editor = editor("<p>ab</p>");
    move_cursor(&mut editor, Position::new(vec![0, 0], 1));

    assert!(editor.execute("insertText", &json!({"text": "X"})));
    assert!(editor.execute("insertHardBreak", &json!(null)));
    assert!(!editor.execute("insertText", &json!({"text": ""})));

    assert_eq!(editor.state().to_html().unwrap(), "<p>aX<br>b</p>");
}

#[test]
fn test_delete_selection() {
    use folio_editor::Dispatch;

    let mut editor = editor(r#"<p>a<img src="x.png">b</p>"#);
    assert!(!editor.execute("deleteSelection", &json!(null)));

    // Images are not node-selectable, so select the range around it
    let tr = editor.state().tr().set_selection(Selection::text(
        Position::new(vec![0], 1),
        Position::new(vec![0], 2),
    ));
    editor.dispatch(tr).unwrap();

    assert!(editor.execute("deleteSelection", &json!(null)));
    assert_eq!(editor.state().to_html().unwrap(), "<p>ab</p>");
    assert_eq!(editor.state().doc().child(0).unwrap().child_count(), 1);
}

#[test]
fn test_undo_restores_document_as_new_version() {
    let mut editor = editor("<p>Hello</p>");
    assert!(editor.execute("addImage", &json!({"imageUrl": "a.png"})));
    assert_eq!(editor.history().undo_description(), Some("Insert image"));

    assert!(editor.undo());
    assert_eq!(editor.state().version(), 2);
    assert_eq!(editor.state().to_html().unwrap(), "<p>Hello</p>");

    assert!(editor.redo());
    assert_eq!(editor.state().version(), 3);
    assert_eq!(
        editor.state().to_html().unwrap(),
        r#"<p><img src="a.png">Hello</p>"#
    );
}
