use super::*;
use crate::scene::elements::ShapeKind;

fn temp_dir(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "motiversera_{name}_{}_{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn missing_file_loads_as_empty_snapshot() {
    let dir = temp_dir("store_missing");
    let store = JsonFileStore::new(dir.join("state.json"));
    assert_eq!(store.load().unwrap(), SceneSnapshot::default());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn corrupt_file_degrades_to_default_scene() {
    let dir = temp_dir("store_corrupt");
    let path = dir.join("state.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = JsonFileStore::new(&path);

    assert!(matches!(store.load(), Err(EditorError::Serde(_))));
    let scene = load_scene_or_default(&store);
    assert_eq!(scene.snapshot(), Scene::new().snapshot());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn save_then_load_round_trips_scene() {
    let dir = temp_dir("store_round_trip");
    let mut store = JsonFileStore::new(dir.join("nested").join("state.json"));

    let mut scene = Scene::new();
    scene.add_text().unwrap();
    scene.add_shape(ShapeKind::Arrow).unwrap();
    scene.remove_quote();
    store.save(&scene.snapshot()).unwrap();

    let loaded = load_scene_or_default(&store);
    assert_eq!(loaded.snapshot(), scene.snapshot());
    assert!(loaded.quote().is_none());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn save_merges_into_existing_object() {
    let dir = temp_dir("store_merge");
    let path = dir.join("state.json");
    std::fs::write(&path, r#"{"leftPanelWidth": 320, "overlayOpacity": 0.9}"#).unwrap();
    let mut store = JsonFileStore::new(&path);

    store
        .save(&SceneSnapshot {
            overlay_opacity: Some(0.5),
            ..SceneSnapshot::default()
        })
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["leftPanelWidth"], 320);
    assert_eq!(raw["overlayOpacity"], 0.5);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn clear_removes_file_and_tolerates_absence() {
    let dir = temp_dir("store_clear");
    let mut store = JsonFileStore::new(dir.join("state.json"));
    store.save(&Scene::new().snapshot()).unwrap();
    assert!(store.path().exists());

    store.clear().unwrap();
    assert!(!store.path().exists());
    store.clear().unwrap();
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn memory_store_merges_partial_saves() {
    let mut store = MemoryStore::with_snapshot(SceneSnapshot {
        gradient_angle: Some(45.0),
        theme_id: Some("paper".to_owned()),
        ..SceneSnapshot::default()
    });
    store
        .save(&SceneSnapshot {
            gradient_angle: Some(90.0),
            ..SceneSnapshot::default()
        })
        .unwrap();

    let snap = store.load().unwrap();
    assert_eq!(snap.gradient_angle, Some(90.0));
    assert_eq!(snap.theme_id.as_deref(), Some("paper"));

    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), SceneSnapshot::default());
}

#[test]
fn explicit_null_quote_wins_merge() {
    let base = SceneSnapshot {
        quote_element: Some(Scene::new().quote().cloned()),
        ..SceneSnapshot::default()
    };
    let update = SceneSnapshot {
        quote_element: Some(None),
        ..SceneSnapshot::default()
    };
    assert_eq!(merge_snapshots(base, update).quote_element, Some(None));
}

#[test]
fn autosave_writes_only_on_revision_change() {
    let mut store = MemoryStore::new();
    let mut scene = Scene::new();
    let mut autosave = Autosave::starting_at(&scene);

    assert!(!autosave.sync(&scene, &mut store).unwrap());
    scene.add_text().unwrap();
    assert!(autosave.sync(&scene, &mut store).unwrap());
    assert!(!autosave.sync(&scene, &mut store).unwrap());

    // Selection alone is not a content change.
    scene.select(None).unwrap();
    assert!(!autosave.sync(&scene, &mut store).unwrap());
    assert_eq!(store.saves(), 1);
}
