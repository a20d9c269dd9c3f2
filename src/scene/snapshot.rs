use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    assets::color::ColorDef,
    export::crop::CropSettings,
    scene::{
        elements::{QuoteElement, ShapeElement, TextElement},
        model::{
            BlendMode, FilterSettings, GradientSpec, MAX_SHAPES, MAX_TEXT_ELEMENTS, MediaKind,
            OverlayTint, Scene, Veil,
        },
        theme::ThemeId,
    },
};

/// Serializable, possibly partial view of a [`Scene`].
///
/// Every field is optional: a missing field means "keep the default". Field names follow the
/// browser editor's persisted state (`textElements`, `gradientColors`, `overlayOpacity`, ...),
/// and unknown keys are ignored. For `quoteElement` and `selectedUrl`, an explicit `null`
/// means "none", which differs from the field being absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_elements: Option<Vec<TextElement>>,
    #[serde(
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub quote_element: Option<Option<QuoteElement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shapes: Option<Vec<ShapeElement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_colors: Option<Vec<ColorDef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_color: Option<ColorDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaKind>,
    #[serde(
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub selected_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_veil: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veil_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_settings: Option<CropSettings>,
}

/// Present-but-null becomes `Some(None)`; absence stays `None` via `#[serde(default)]`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl SceneSnapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Scene {
    /// Full snapshot of the serializable scene state.
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            text_elements: Some(self.texts.clone()),
            quote_element: Some(self.quote.clone()),
            shapes: Some(self.shapes.clone()),
            filters: Some(self.filters.clone()),
            gradient_colors: Some(self.gradient.colors().to_vec()),
            gradient_angle: Some(self.gradient.angle_deg()),
            overlay_color: Some(self.tint.color),
            overlay_opacity: Some(self.tint.opacity),
            blend_mode: Some(blend_mode_name(self.blend_mode)),
            media_type: Some(self.media_kind),
            selected_url: Some(self.media_source.clone()),
            theme_id: Some(self.theme.as_str().to_owned()),
            show_veil: Some(self.veil.enabled),
            veil_opacity: Some(self.veil.opacity),
            crop_settings: Some(self.crop.clone()),
        }
    }

    /// Build a scene from a (partial) snapshot on top of [`Scene::new`] defaults.
    ///
    /// Never fails: over-cap collections are truncated, duplicate ids are renamed, and invalid
    /// gradients or blend modes fall back to defaults, each with a warning.
    pub fn from_snapshot(snapshot: SceneSnapshot) -> Scene {
        let mut scene = Scene::new();
        scene.apply_snapshot(snapshot);
        scene.selection = None;
        scene.revision = 0;
        scene
    }

    fn apply_snapshot(&mut self, snap: SceneSnapshot) {
        if let Some(mut texts) = snap.text_elements {
            if texts.len() > MAX_TEXT_ELEMENTS {
                tracing::warn!(
                    count = texts.len(),
                    cap = MAX_TEXT_ELEMENTS,
                    "dropping text elements over the cap"
                );
                texts.truncate(MAX_TEXT_ELEMENTS);
            }
            self.texts = texts;
        }
        if let Some(quote) = snap.quote_element {
            self.quote = quote;
        }
        if let Some(mut shapes) = snap.shapes {
            if shapes.len() > MAX_SHAPES {
                tracing::warn!(
                    count = shapes.len(),
                    cap = MAX_SHAPES,
                    "dropping shapes over the cap"
                );
                shapes.truncate(MAX_SHAPES);
            }
            self.shapes = shapes;
        }
        self.dedupe_ids();

        if let Some(filters) = snap.filters {
            self.filters = filters;
        }
        let angle = snap.gradient_angle.unwrap_or(self.gradient.angle_deg());
        let colors = snap
            .gradient_colors
            .unwrap_or_else(|| self.gradient.colors().to_vec());
        match GradientSpec::new(angle, colors) {
            Ok(g) => self.gradient = g,
            Err(err) => {
                tracing::warn!(%err, "keeping default gradient colors");
                self.gradient = GradientSpec::new(angle, self.gradient.colors().to_vec())
                    .unwrap_or_default();
            }
        }
        self.tint = OverlayTint {
            color: snap.overlay_color.unwrap_or(self.tint.color),
            opacity: snap.overlay_opacity.unwrap_or(self.tint.opacity),
        };
        if let Some(name) = snap.blend_mode {
            self.blend_mode = name.parse().unwrap_or_else(|err: String| {
                tracing::warn!(%err, "falling back to normal blending");
                BlendMode::Normal
            });
        }
        if let Some(kind) = snap.media_type {
            self.media_kind = kind;
        }
        if let Some(url) = snap.selected_url {
            self.media_source = url;
        }
        if let Some(id) = snap.theme_id {
            self.theme = ThemeId::from_id_or_default(&id);
        }
        self.veil = Veil::from_theme(self.theme, snap.show_veil.unwrap_or(self.veil.enabled));
        if let Some(opacity) = snap.veil_opacity {
            self.veil.opacity = opacity;
        }
        if let Some(crop) = snap.crop_settings {
            self.crop = crop;
        }
    }

    /// Rename elements whose id is empty or already taken, and advance the id counter past
    /// every loaded numeric suffix.
    fn dedupe_ids(&mut self) {
        let mut seen = std::collections::HashSet::new();
        let mut max_suffix = 0u64;
        let mut collect = |id: &str| {
            if let Some(n) = id.rsplit('-').next().and_then(|s| s.parse::<u64>().ok()) {
                max_suffix = max_suffix.max(n);
            }
        };
        for t in &self.texts {
            collect(&t.id);
        }
        for s in &self.shapes {
            collect(&s.id);
        }
        if let Some(q) = &self.quote {
            collect(q.id());
        }
        self.next_id = self.next_id.max(max_suffix.saturating_add(1));

        let mut renamed = Vec::new();
        if let Some(q) = &self.quote {
            seen.insert(q.base.id.clone());
        }
        for i in 0..self.texts.len() {
            if self.texts[i].id.is_empty() || !seen.insert(self.texts[i].id.clone()) {
                renamed.push(("text", i));
            }
        }
        for i in 0..self.shapes.len() {
            if self.shapes[i].id.is_empty() || !seen.insert(self.shapes[i].id.clone()) {
                renamed.push(("shape", i));
            }
        }
        for (kind, i) in renamed {
            let id = self.fresh_unique_id(kind, &seen);
            tracing::warn!(kind, new_id = %id, "renaming element with duplicate id");
            seen.insert(id.clone());
            match kind {
                "text" => self.texts[i].id = id,
                _ => self.shapes[i].id = id,
            }
        }
        if self.quote.as_ref().is_some_and(|q| q.base.id.is_empty()) {
            let n = self.take_id_number();
            if let Some(q) = &mut self.quote {
                q.base.id = format!("quote-{n}");
            }
        }
    }

    fn fresh_unique_id(&mut self, prefix: &str, seen: &std::collections::HashSet<String>) -> String {
        loop {
            let id = format!("{prefix}-{}", self.take_id_number());
            if !seen.contains(&id) {
                return id;
            }
        }
    }
}

fn blend_mode_name(mode: BlendMode) -> String {
    match serde_json::to_value(mode) {
        Ok(serde_json::Value::String(s)) => s,
        _ => "normal".to_owned(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/snapshot.rs"]
mod tests;
