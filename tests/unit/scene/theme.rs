use super::*;

#[test]
fn unknown_theme_falls_back_to_first() {
    assert_eq!(ThemeId::from_id_or_default("midnight"), ThemeId::Midnight);
    assert_eq!(ThemeId::from_id_or_default("neon"), ThemeId::DarkCode);
}

#[test]
fn theme_ids_serialize_kebab_case() {
    assert_eq!(
        serde_json::to_value(ThemeId::DarkCode).unwrap(),
        serde_json::json!("dark-code")
    );
    for id in ThemeId::ALL {
        let v = serde_json::to_value(id).unwrap();
        assert_eq!(v, serde_json::json!(id.as_str()));
    }
}

#[test]
fn veil_defaults_match_theme_table() {
    assert_eq!(ThemeId::DarkCode.theme().veil_opacity, 0.5);
    assert_eq!(ThemeId::Midnight.theme().veil_opacity, 0.55);
    assert_eq!(ThemeId::Paper.theme().veil, ColorDef::WHITE);
}

#[test]
fn theme_palette_overrides_only_its_roles() {
    let palette = ThemeId::Paper.theme().code_palette();
    assert_eq!(palette.keyword, ThemeId::Paper.theme().keyword);
    assert_eq!(palette.function, CodePalette::default().function);
}
