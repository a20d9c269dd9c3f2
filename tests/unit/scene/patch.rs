use super::*;
use serde_json::json;

#[test]
fn text_patch_touches_only_given_fields() {
    let before = TextElement::template("t1");
    let mut el = before.clone();
    TextPatch {
        font_size: Some(64.0),
        color: Some(ColorDef::BLACK),
        ..TextPatch::default()
    }
    .apply(&mut el);

    assert_eq!(el.font_size, 64.0);
    assert_eq!(el.color, ColorDef::BLACK);
    let mut expected = before;
    expected.font_size = 64.0;
    expected.color = ColorDef::BLACK;
    assert_eq!(el, expected);
}

#[test]
fn nested_records_are_replaced_whole() {
    let mut el = TextElement::template("t1");
    el.shadow.blur = 9.0;
    let patch: TextPatch =
        serde_json::from_value(json!({"shadow": {"enabled": true, "color": "#ff0000"}})).unwrap();
    patch.apply(&mut el);

    assert!(el.shadow.enabled);
    assert_eq!(el.shadow.blur, Shadow::default().blur);
    assert_eq!(el.shadow.color, ColorDef::rgba(1.0, 0.0, 0.0, 1.0));
}

#[test]
fn quote_patch_reads_flat_json() {
    let patch: QuotePatch =
        serde_json::from_value(json!({"text": "let a = 1;", "width": 600.0, "isCodeSnippet": false}))
            .unwrap();
    let mut q = QuoteElement::template("q");
    patch.apply(&mut q);
    assert_eq!(q.base.text, "let a = 1;");
    assert_eq!(q.width, Some(600.0));
    assert_eq!(q.height, None);
    assert!(!q.is_code_snippet);
}

#[test]
fn shape_patch_can_switch_kind_and_fill() {
    let mut s = ShapeElement::template("s", ShapeKind::Rectangle);
    let patch: ShapePatch =
        serde_json::from_value(json!({"type": "circle", "fill": "transparent"})).unwrap();
    patch.apply(&mut s);
    assert_eq!(s.kind, ShapeKind::Circle);
    assert_eq!(s.fill, Fill::Transparent);
    assert_eq!(s.width, 150.0);
}

#[test]
fn empty_patch_serializes_to_empty_object() {
    assert_eq!(serde_json::to_value(TextPatch::default()).unwrap(), json!({}));
    assert_eq!(
        serde_json::to_value(ShapePatch::position(1.0, 2.0)).unwrap(),
        json!({"x": 1.0, "y": 2.0})
    );
}
