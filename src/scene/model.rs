use serde::{Deserialize, Serialize};

use crate::{
    assets::color::ColorDef,
    export::crop::CropSettings,
    foundation::error::{EditorError, EditorResult},
    scene::{
        elements::{QuoteElement, ShapeElement, ShapeKind, TextElement},
        patch::{ElementPatch, QuotePatch, ShapePatch, TextPatch},
        theme::ThemeId,
    },
};

/// Maximum number of live text elements.
pub const MAX_TEXT_ELEMENTS: usize = 5;
/// Maximum number of live shape elements.
pub const MAX_SHAPES: usize = 5;
/// Maximum number of quote elements (it is a singleton).
pub const MAX_QUOTES: usize = 1;

pub const MIN_GRADIENT_COLORS: usize = 2;
pub const MAX_GRADIENT_COLORS: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Gradient,
    Image,
    Video,
}

/// Linear gradient background: angle in degrees plus 2..=5 evenly spaced colors.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientSpec {
    angle_deg: f64,
    colors: Vec<ColorDef>,
}

impl GradientSpec {
    pub fn new(angle_deg: f64, colors: Vec<ColorDef>) -> EditorResult<Self> {
        check_gradient_len(colors.len())?;
        Ok(Self { angle_deg, colors })
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn colors(&self) -> &[ColorDef] {
        &self.colors
    }
}

impl Default for GradientSpec {
    fn default() -> Self {
        Self {
            angle_deg: 135.0,
            colors: vec![
                ColorDef::from_rgba8(0x66, 0x7e, 0xea, 255),
                ColorDef::from_rgba8(0x76, 0x4b, 0xa2, 255),
            ],
        }
    }
}

fn check_gradient_len(n: usize) -> EditorResult<()> {
    if !(MIN_GRADIENT_COLORS..=MAX_GRADIENT_COLORS).contains(&n) {
        return Err(EditorError::validation(format!(
            "gradient needs {MIN_GRADIENT_COLORS}..={MAX_GRADIENT_COLORS} colors, got {n}"
        )));
    }
    Ok(())
}

/// CSS-style filter settings applied to the background layer only.
///
/// Percentages: brightness/contrast/saturation 0..200, sepia/invert/grayscale 0..100,
/// opacity 0..100; hue rotation in degrees; blur in px. Values are passed through unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSettings {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub blur: f64,
    pub sepia: f64,
    pub hue_rotate: f64,
    pub invert: f64,
    pub grayscale: f64,
    pub opacity: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur: 0.0,
            sepia: 0.0,
            hue_rotate: 0.0,
            invert: 0.0,
            grayscale: 0.0,
            opacity: 100.0,
        }
    }
}

impl FilterSettings {
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

/// Separable blend modes for compositing the background layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    SoftLight,
    HardLight,
    Difference,
    Exclusion,
}

impl std::str::FromStr for BlendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_ascii_lowercase()))
            .map_err(|_| format!("unsupported blend mode \"{s}\""))
    }
}

/// Full-canvas color wash drawn over the background.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayTint {
    pub color: ColorDef,
    /// 0..1
    pub opacity: f64,
}

impl Default for OverlayTint {
    fn default() -> Self {
        Self {
            color: ColorDef::BLACK,
            opacity: 0.3,
        }
    }
}

/// Theme-derived legibility wash, drawn after the tint when enabled.
#[derive(Clone, Debug, PartialEq)]
pub struct Veil {
    pub enabled: bool,
    pub color: ColorDef,
    pub opacity: f64,
}

impl Veil {
    pub fn from_theme(theme: ThemeId, enabled: bool) -> Self {
        let t = theme.theme();
        Self {
            enabled,
            color: t.veil,
            opacity: t.veil_opacity,
        }
    }
}

/// Reference to one element across the three collections.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ElementRef {
    Text(String),
    Quote,
    Shape(String),
}

impl ElementRef {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ElementRef::Text(_) => "text",
            ElementRef::Quote => "quote",
            ElementRef::Shape(_) => "shape",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuoteToggle {
    Added,
    Removed,
}

/// The authoritative editor state.
///
/// All mutation goes through the methods below. Content mutations bump [`Scene::revision`],
/// which renderers and autosave use to notice changes. Selection is a single optional
/// [`ElementRef`], so at most one element is selected across all collections.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub(crate) media_kind: MediaKind,
    pub(crate) media_source: Option<String>,
    pub(crate) gradient: GradientSpec,
    pub(crate) filters: FilterSettings,
    pub(crate) blend_mode: BlendMode,
    pub(crate) tint: OverlayTint,
    pub(crate) theme: ThemeId,
    pub(crate) veil: Veil,
    pub(crate) crop: CropSettings,
    pub(crate) texts: Vec<TextElement>,
    pub(crate) quote: Option<QuoteElement>,
    pub(crate) shapes: Vec<ShapeElement>,
    pub(crate) selection: Option<ElementRef>,
    pub(crate) revision: u64,
    pub(crate) next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// The editor's default scene: purple gradient, neutral filters, 30% black tint and the
    /// default code quote.
    pub fn new() -> Self {
        let mut scene = Self::blank();
        let id = scene.fresh_id("quote");
        scene.quote = Some(QuoteElement::template(id));
        scene
    }

    /// Default globals with no overlay elements.
    pub fn blank() -> Self {
        Self {
            media_kind: MediaKind::Gradient,
            media_source: None,
            gradient: GradientSpec::default(),
            filters: FilterSettings::default(),
            blend_mode: BlendMode::Normal,
            tint: OverlayTint::default(),
            theme: ThemeId::default(),
            veil: Veil::from_theme(ThemeId::default(), false),
            crop: CropSettings::default(),
            texts: Vec::new(),
            quote: None,
            shapes: Vec::new(),
            selection: None,
            revision: 0,
            next_id: 1,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn media_kind(&self) -> MediaKind {
        self.media_kind
    }

    pub fn media_source(&self) -> Option<&str> {
        self.media_source.as_deref()
    }

    /// Image source the rasterizer must load, when the background is an image.
    pub fn background_image_source(&self) -> Option<&str> {
        match self.media_kind {
            MediaKind::Image => self.media_source(),
            _ => None,
        }
    }

    pub fn gradient(&self) -> &GradientSpec {
        &self.gradient
    }

    pub fn filters(&self) -> &FilterSettings {
        &self.filters
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn tint(&self) -> &OverlayTint {
        &self.tint
    }

    pub fn theme(&self) -> ThemeId {
        self.theme
    }

    pub fn veil(&self) -> &Veil {
        &self.veil
    }

    pub fn crop(&self) -> &CropSettings {
        &self.crop
    }

    pub fn texts(&self) -> &[TextElement] {
        &self.texts
    }

    pub fn text(&self, id: &str) -> Option<&TextElement> {
        self.texts.iter().find(|t| t.id == id)
    }

    pub fn quote(&self) -> Option<&QuoteElement> {
        self.quote.as_ref()
    }

    pub fn shapes(&self) -> &[ShapeElement] {
        &self.shapes
    }

    pub fn shape(&self, id: &str) -> Option<&ShapeElement> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn selection(&self) -> Option<&ElementRef> {
        self.selection.as_ref()
    }

    pub fn is_selected(&self, target: &ElementRef) -> bool {
        self.selection.as_ref() == Some(target)
    }

    pub fn contains(&self, target: &ElementRef) -> bool {
        match target {
            ElementRef::Text(id) => self.text(id).is_some(),
            ElementRef::Quote => self.quote.is_some(),
            ElementRef::Shape(id) => self.shape(id).is_some(),
        }
    }

    /// Add a text element from the template and select it.
    pub fn add_text(&mut self) -> EditorResult<ElementRef> {
        if self.texts.len() >= MAX_TEXT_ELEMENTS {
            tracing::debug!("text element cap reached");
            return Err(EditorError::capacity("text elements", MAX_TEXT_ELEMENTS));
        }
        let id = self.fresh_id("text");
        self.texts.push(TextElement::template(id.clone()));
        let target = ElementRef::Text(id);
        self.selection = Some(target.clone());
        self.touch();
        Ok(target)
    }

    /// Add a shape of `kind` from its template and select it.
    pub fn add_shape(&mut self, kind: ShapeKind) -> EditorResult<ElementRef> {
        if self.shapes.len() >= MAX_SHAPES {
            tracing::debug!("shape cap reached");
            return Err(EditorError::capacity("shapes", MAX_SHAPES));
        }
        let id = self.fresh_id("shape");
        self.shapes.push(ShapeElement::template(id.clone(), kind));
        let target = ElementRef::Shape(id);
        self.selection = Some(target.clone());
        self.touch();
        Ok(target)
    }

    /// Add the quote element from the default template and select it.
    pub fn add_quote(&mut self) -> EditorResult<ElementRef> {
        if self.quote.is_some() {
            return Err(EditorError::capacity("quote elements", MAX_QUOTES));
        }
        let id = self.fresh_id("quote");
        self.quote = Some(QuoteElement::template(id));
        self.selection = Some(ElementRef::Quote);
        self.touch();
        Ok(ElementRef::Quote)
    }

    /// Discard the quote element entirely. Returns whether one existed.
    pub fn remove_quote(&mut self) -> bool {
        if self.quote.take().is_none() {
            return false;
        }
        if self.selection == Some(ElementRef::Quote) {
            self.selection = None;
        }
        self.touch();
        true
    }

    pub fn add_or_remove_quote(&mut self) -> QuoteToggle {
        if self.remove_quote() {
            QuoteToggle::Removed
        } else {
            // Cannot hit the cap: the quote was just observed absent.
            let _ = self.add_quote();
            QuoteToggle::Added
        }
    }

    /// Shallow-merge `patch` into the target element.
    ///
    /// Values are not range-checked; property editors and the interaction controller clamp
    /// before calling.
    pub fn update_element(&mut self, target: &ElementRef, patch: ElementPatch) -> EditorResult<()> {
        match (target, patch) {
            (ElementRef::Text(id), ElementPatch::Text(p)) => self.update_text(id, &p),
            (ElementRef::Quote, ElementPatch::Quote(p)) => self.update_quote(&p),
            (ElementRef::Quote, ElementPatch::Text(p)) => self.update_quote(&QuotePatch::from(p)),
            (ElementRef::Shape(id), ElementPatch::Shape(p)) => self.update_shape(id, &p),
            (target, patch) => Err(EditorError::validation(format!(
                "{} patch cannot be applied to a {} element",
                patch.kind_name(),
                target.kind_name()
            ))),
        }
    }

    pub fn update_text(&mut self, id: &str, patch: &TextPatch) -> EditorResult<()> {
        let el = self
            .texts
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| EditorError::not_found(format!("text element '{id}'")))?;
        patch.apply(el);
        self.touch();
        Ok(())
    }

    pub fn update_quote(&mut self, patch: &QuotePatch) -> EditorResult<()> {
        let el = self
            .quote
            .as_mut()
            .ok_or_else(|| EditorError::not_found("quote element"))?;
        patch.apply(el);
        self.touch();
        Ok(())
    }

    pub fn update_shape(&mut self, id: &str, patch: &ShapePatch) -> EditorResult<()> {
        let el = self
            .shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| EditorError::not_found(format!("shape '{id}'")))?;
        patch.apply(el);
        self.touch();
        Ok(())
    }

    /// Remove an element, clearing the selection when it pointed at it.
    pub fn delete_element(&mut self, target: &ElementRef) -> EditorResult<()> {
        match target {
            ElementRef::Text(id) => {
                let idx = self
                    .texts
                    .iter()
                    .position(|t| &t.id == id)
                    .ok_or_else(|| EditorError::not_found(format!("text element '{id}'")))?;
                self.texts.remove(idx);
            }
            ElementRef::Quote => {
                if self.quote.take().is_none() {
                    return Err(EditorError::not_found("quote element"));
                }
            }
            ElementRef::Shape(id) => {
                let idx = self
                    .shapes
                    .iter()
                    .position(|s| &s.id == id)
                    .ok_or_else(|| EditorError::not_found(format!("shape '{id}'")))?;
                self.shapes.remove(idx);
            }
        }
        if self.selection.as_ref() == Some(target) {
            self.selection = None;
        }
        self.touch();
        Ok(())
    }

    /// Select one element (clearing any other selection) or clear with `None`.
    pub fn select(&mut self, target: Option<ElementRef>) -> EditorResult<()> {
        if let Some(t) = &target
            && !self.contains(t)
        {
            return Err(EditorError::not_found(format!(
                "cannot select missing {} element",
                t.kind_name()
            )));
        }
        self.selection = target;
        Ok(())
    }

    pub fn set_media(&mut self, kind: MediaKind, source: Option<String>) {
        self.media_kind = kind;
        self.media_source = source;
        self.touch();
    }

    pub fn set_gradient(&mut self, gradient: GradientSpec) {
        self.gradient = gradient;
        self.touch();
    }

    pub fn set_gradient_angle(&mut self, angle_deg: f64) {
        self.gradient.angle_deg = angle_deg;
        self.touch();
    }

    pub fn set_gradient_colors(&mut self, colors: Vec<ColorDef>) -> EditorResult<()> {
        check_gradient_len(colors.len())?;
        self.gradient.colors = colors;
        self.touch();
        Ok(())
    }

    pub fn add_gradient_color(&mut self, color: ColorDef) -> EditorResult<()> {
        if self.gradient.colors.len() >= MAX_GRADIENT_COLORS {
            return Err(EditorError::capacity("gradient colors", MAX_GRADIENT_COLORS));
        }
        self.gradient.colors.push(color);
        self.touch();
        Ok(())
    }

    pub fn remove_gradient_color(&mut self, index: usize) -> EditorResult<()> {
        if index >= self.gradient.colors.len() {
            return Err(EditorError::not_found(format!("gradient color #{index}")));
        }
        if self.gradient.colors.len() <= MIN_GRADIENT_COLORS {
            return Err(EditorError::validation(format!(
                "gradient needs at least {MIN_GRADIENT_COLORS} colors"
            )));
        }
        self.gradient.colors.remove(index);
        self.touch();
        Ok(())
    }

    pub fn set_filters(&mut self, filters: FilterSettings) {
        self.filters = filters;
        self.touch();
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
        self.touch();
    }

    pub fn set_tint(&mut self, tint: OverlayTint) {
        self.tint = tint;
        self.touch();
    }

    /// Switch theme; the veil color and opacity reset to the theme's values.
    pub fn set_theme(&mut self, theme: ThemeId) {
        self.theme = theme;
        self.veil = Veil::from_theme(theme, self.veil.enabled);
        self.touch();
    }

    pub fn set_veil_enabled(&mut self, enabled: bool) {
        self.veil.enabled = enabled;
        self.touch();
    }

    pub fn set_veil_opacity(&mut self, opacity: f64) {
        self.veil.opacity = opacity;
        self.touch();
    }

    pub fn set_crop(&mut self, crop: CropSettings) {
        self.crop = crop;
        self.touch();
    }

    pub(crate) fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Next `<prefix>-<n>` id not used by any element.
    pub(crate) fn fresh_id(&mut self, prefix: &str) -> String {
        loop {
            let id = format!("{prefix}-{}", self.take_id_number());
            if !self.id_in_use(&id) {
                return id;
            }
        }
    }

    /// Current counter value. Wraps back to 1 instead of overflowing.
    pub(crate) fn take_id_number(&mut self) -> u64 {
        let n = self.next_id;
        self.next_id = n.checked_add(1).unwrap_or(1);
        n
    }

    pub(crate) fn id_in_use(&self, id: &str) -> bool {
        self.texts.iter().any(|t| t.id == id)
            || self.shapes.iter().any(|s| s.id == id)
            || self.quote.as_ref().is_some_and(|q| q.id() == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
