//! Partial updates for scene elements.
//!
//! A patch carries `Some` for every field to overwrite and `None` for fields to keep. Applying
//! one is a shallow merge: nested records (`shadow`, `stroke`, `codeColors`) are replaced whole.

use serde::{Deserialize, Serialize};

use crate::{
    assets::color::{ColorDef, Fill},
    scene::elements::{
        CodePalette, FontWeight, QuoteElement, Shadow, ShapeElement, ShapeKind, TextAlign,
        TextElement, TextStroke,
    },
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<TextStroke>,
}

impl TextPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn font_size(size: f64) -> Self {
        Self {
            font_size: Some(size),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn apply(&self, el: &mut TextElement) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = &self.$field {
                    el.$field = v.clone();
                })*
            };
        }
        merge!(
            text,
            x,
            y,
            font_size,
            font_family,
            color,
            font_weight,
            text_align,
            rotation,
            opacity,
            letter_spacing,
            line_height,
            shadow,
            stroke,
        );
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuotePatch {
    #[serde(flatten)]
    pub base: TextPatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_code_snippet: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_colors: Option<CodePalette>,
}

impl QuotePatch {
    pub fn apply(&self, el: &mut QuoteElement) {
        self.base.apply(&mut el.base);
        if let Some(w) = self.width {
            el.width = Some(w);
        }
        if let Some(h) = self.height {
            el.height = Some(h);
        }
        if let Some(v) = self.is_code_snippet {
            el.is_code_snippet = v;
        }
        if let Some(p) = &self.code_colors {
            el.code_colors = p.clone();
        }
    }
}

impl From<TextPatch> for QuotePatch {
    fn from(base: TextPatch) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapePatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ShapeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<ColorDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
}

impl ShapePatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn apply(&self, el: &mut ShapeElement) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = self.$field {
                    el.$field = v;
                })*
            };
        }
        merge!(
            kind,
            x,
            y,
            width,
            height,
            fill,
            stroke,
            stroke_width,
            opacity,
            rotation,
            corner_radius,
        );
    }
}

/// A patch addressed to one element category.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementPatch {
    Text(TextPatch),
    Quote(QuotePatch),
    Shape(ShapePatch),
}

impl ElementPatch {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ElementPatch::Text(_) => "text",
            ElementPatch::Quote(_) => "quote",
            ElementPatch::Shape(_) => "shape",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/patch.rs"]
mod tests;
