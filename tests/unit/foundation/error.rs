use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        EditorError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        EditorError::capacity("text elements", 5)
            .to_string()
            .contains("capacity exceeded:")
    );
    assert!(EditorError::not_found("x").to_string().contains("not found:"));
    assert!(
        EditorError::resource_load("x")
            .to_string()
            .contains("resource load error:")
    );
    assert!(EditorError::export("x").to_string().contains("export error:"));
    assert!(
        EditorError::resolve("x")
            .to_string()
            .contains("media resolve error:")
    );
    assert!(
        EditorError::persistence("x")
            .to_string()
            .contains("persistence error:")
    );
    assert!(
        EditorError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn capacity_message_names_the_cap() {
    let msg = EditorError::capacity("shapes", 5).to_string();
    assert!(msg.contains("5 shapes"));
}

#[test]
fn rejections_are_classified() {
    assert!(EditorError::capacity("shapes", 5).is_rejection());
    assert!(EditorError::not_found("x").is_rejection());
    assert!(!EditorError::export("x").is_rejection());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = EditorError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
