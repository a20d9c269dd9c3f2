use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::error::{EditorError, EditorResult},
    scene::{model::Scene, snapshot::SceneSnapshot},
};

/// Durable home for the editor's scene.
///
/// `load` may return a partial snapshot; [`Scene::from_snapshot`] fills in the rest.
pub trait SceneStore {
    fn load(&self) -> EditorResult<SceneSnapshot>;
    fn save(&mut self, snapshot: &SceneSnapshot) -> EditorResult<()>;
    fn clear(&mut self) -> EditorResult<()>;
}

/// Load the persisted scene, falling back to [`Scene::new`] on any store error.
pub fn load_scene_or_default(store: &dyn SceneStore) -> Scene {
    match store.load() {
        Ok(snapshot) => Scene::from_snapshot(snapshot),
        Err(err) => {
            tracing::warn!(%err, "persisted scene unavailable, starting from defaults");
            Scene::new()
        }
    }
}

/// Scene state kept as one JSON object on disk.
///
/// Saves merge into whatever object is already in the file, so keys this crate does not know
/// about (panel widths and the like) survive a round trip.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_object(&self) -> EditorResult<Option<serde_json::Map<String, serde_json::Value>>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(EditorError::persistence(format!(
                    "failed to read scene file '{}': {e}",
                    self.path.display()
                )));
            }
        };
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(serde_json::Value::Object(map)) => Ok(Some(map)),
            Ok(_) => Err(EditorError::serde(format!(
                "scene file '{}' does not hold a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(EditorError::serde(format!(
                "scene file '{}' is not valid JSON: {e}",
                self.path.display()
            ))),
        }
    }
}

impl SceneStore for JsonFileStore {
    fn load(&self) -> EditorResult<SceneSnapshot> {
        let Some(map) = self.read_object()? else {
            return Ok(SceneSnapshot::default());
        };
        serde_json::from_value(serde_json::Value::Object(map)).map_err(|e| {
            EditorError::serde(format!(
                "scene file '{}' has unexpected fields: {e}",
                self.path.display()
            ))
        })
    }

    fn save(&mut self, snapshot: &SceneSnapshot) -> EditorResult<()> {
        let mut merged = match self.read_object() {
            Ok(existing) => existing.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(%err, "overwriting unreadable scene file");
                serde_json::Map::new()
            }
        };
        let serde_json::Value::Object(fresh) = serde_json::to_value(snapshot)
            .map_err(|e| EditorError::serde(format!("failed to serialize scene: {e}")))?
        else {
            return Err(EditorError::serde("scene snapshot did not serialize to an object"));
        };
        merged.extend(fresh);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                EditorError::persistence(format!(
                    "failed to create state directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
        let json = serde_json::to_string_pretty(&serde_json::Value::Object(merged))
            .context("encode scene json")?;
        std::fs::write(&self.path, json).map_err(|e| {
            EditorError::persistence(format!(
                "failed to write scene file '{}': {e}",
                self.path.display()
            ))
        })?;
        tracing::debug!(path = %self.path.display(), "scene saved");
        Ok(())
    }

    fn clear(&mut self) -> EditorResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(EditorError::persistence(format!(
                "failed to remove scene file '{}': {e}",
                self.path.display()
            ))),
        }
    }
}

/// Store that lives as long as the process. Saves merge field-wise like [`JsonFileStore`].
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<SceneSnapshot>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: SceneSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            saves: 0,
        }
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn snapshot(&self) -> Option<&SceneSnapshot> {
        self.snapshot.as_ref()
    }
}

impl SceneStore for MemoryStore {
    fn load(&self) -> EditorResult<SceneSnapshot> {
        Ok(self.snapshot.clone().unwrap_or_default())
    }

    fn save(&mut self, snapshot: &SceneSnapshot) -> EditorResult<()> {
        let merged = match self.snapshot.take() {
            Some(existing) => merge_snapshots(existing, snapshot.clone()),
            None => snapshot.clone(),
        };
        self.snapshot = Some(merged);
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> EditorResult<()> {
        self.snapshot = None;
        Ok(())
    }
}

/// Fields present in `update` replace those in `base`.
pub fn merge_snapshots(base: SceneSnapshot, update: SceneSnapshot) -> SceneSnapshot {
    SceneSnapshot {
        text_elements: update.text_elements.or(base.text_elements),
        quote_element: update.quote_element.or(base.quote_element),
        shapes: update.shapes.or(base.shapes),
        filters: update.filters.or(base.filters),
        gradient_colors: update.gradient_colors.or(base.gradient_colors),
        gradient_angle: update.gradient_angle.or(base.gradient_angle),
        overlay_color: update.overlay_color.or(base.overlay_color),
        overlay_opacity: update.overlay_opacity.or(base.overlay_opacity),
        blend_mode: update.blend_mode.or(base.blend_mode),
        media_type: update.media_type.or(base.media_type),
        selected_url: update.selected_url.or(base.selected_url),
        theme_id: update.theme_id.or(base.theme_id),
        show_veil: update.show_veil.or(base.show_veil),
        veil_opacity: update.veil_opacity.or(base.veil_opacity),
        crop_settings: update.crop_settings.or(base.crop_settings),
    }
}

/// Saves the scene whenever its revision moved since the last save.
#[derive(Clone, Copy, Debug, Default)]
pub struct Autosave {
    saved_revision: Option<u64>,
}

impl Autosave {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `scene`'s current revision as already persisted, e.g. right after loading it.
    pub fn starting_at(scene: &Scene) -> Self {
        Self {
            saved_revision: Some(scene.revision()),
        }
    }

    /// Returns whether a save happened. A failed save is retried on the next call.
    pub fn sync(&mut self, scene: &Scene, store: &mut dyn SceneStore) -> EditorResult<bool> {
        if self.saved_revision == Some(scene.revision()) {
            return Ok(false);
        }
        store.save(&scene.snapshot())?;
        self.saved_revision = Some(scene.revision());
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/store.rs"]
mod tests;
