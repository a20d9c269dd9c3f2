use super::*;
use serde_json::json;

#[test]
fn font_weight_accepts_keywords_and_numbers() {
    let w: FontWeight = serde_json::from_value(json!("bold")).unwrap();
    assert_eq!(w, FontWeight::BOLD);
    let w: FontWeight = serde_json::from_value(json!("600")).unwrap();
    assert_eq!(w, FontWeight(600));
    let w: FontWeight = serde_json::from_value(json!(300)).unwrap();
    assert_eq!(w, FontWeight(300));
    assert!(serde_json::from_value::<FontWeight>(json!("heavy-ish")).is_err());

    assert_eq!(serde_json::to_value(FontWeight::NORMAL).unwrap(), json!("normal"));
    assert_eq!(serde_json::to_value(FontWeight(600)).unwrap(), json!("600"));
}

#[test]
fn quote_template_matches_editor_defaults() {
    let q = QuoteElement::template("quote-1");
    assert_eq!(q.id(), "quote-1");
    assert_eq!(q.base.text, QuoteElement::DEFAULT_TEXT);
    assert_eq!((q.base.x, q.base.y), (540.0, 960.0));
    assert_eq!(q.base.font_size, 32.0);
    assert_eq!(q.base.font_weight, FontWeight::BOLD);
    assert_eq!(q.base.line_height, 1.4);
    assert!(q.is_code_snippet);
    assert_eq!(q.box_size(), None);
    assert_eq!(q.code_colors.keyword.to_hex(), "#ff6b6b");
}

#[test]
fn quote_serializes_flat_camel_case() {
    let q = QuoteElement::template("quote-1");
    let v = serde_json::to_value(&q).unwrap();
    assert_eq!(v["id"], json!("quote-1"));
    assert_eq!(v["fontSize"], json!(32.0));
    assert_eq!(v["isCodeSnippet"], json!(true));
    assert_eq!(v["codeColors"]["string"], json!("#4ecdc4"));
    assert!(v.get("width").is_none());

    let back: QuoteElement = serde_json::from_value(v).unwrap();
    assert_eq!(back, q);
}

#[test]
fn text_element_fills_missing_fields_from_template() {
    let t: TextElement = serde_json::from_value(json!({"id": "t1", "text": "hi"})).unwrap();
    assert_eq!(t.id, "t1");
    assert_eq!(t.text, "hi");
    assert_eq!(t.font_size, TextElement::default().font_size);
    assert_eq!(t.shadow, Shadow::default());
}

#[test]
fn shape_templates_per_kind() {
    let line = ShapeElement::template("s", ShapeKind::Line);
    assert_eq!((line.width, line.height), (200.0, 5.0));
    assert_eq!(line.fill, Fill::Transparent);

    let circle = ShapeElement::template("s", ShapeKind::Circle);
    assert_eq!((circle.width, circle.height), (150.0, 150.0));

    let rect = ShapeElement::template("s", ShapeKind::Rectangle);
    assert_eq!(rect.bounds(), kurbo::Rect::new(465.0, 910.0, 615.0, 1010.0));
    assert_eq!(rect.corner_radius, 4.0);
}

#[test]
fn shape_kind_uses_type_key() {
    let v = serde_json::to_value(ShapeElement::template("s1", ShapeKind::Arrow)).unwrap();
    assert_eq!(v["type"], json!("arrow"));
    assert_eq!(v["strokeWidth"], json!(2.0));
    assert_eq!("Ellipse".parse::<ShapeKind>().unwrap(), ShapeKind::Circle);
}

#[test]
fn palette_plain_role_has_no_color() {
    let p = CodePalette::default();
    assert_eq!(p.color_for(TokenRole::Plain), None);
    assert_eq!(p.color_for(TokenRole::Comment), Some(p.comment));
}
