use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::{Canvas, Rect},
    error::{EditorError, EditorResult},
};

/// Aspect-ratio presets offered by the crop tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectPreset {
    #[default]
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "16:9")]
    Wide16x9,
    #[serde(rename = "9:16")]
    Tall9x16,
}

impl AspectPreset {
    /// Width / height, or `None` for free-form.
    pub fn ratio(self) -> Option<f64> {
        match self {
            AspectPreset::Free => None,
            AspectPreset::Square => Some(1.0),
            AspectPreset::Landscape4x3 => Some(4.0 / 3.0),
            AspectPreset::Portrait3x4 => Some(3.0 / 4.0),
            AspectPreset::Wide16x9 => Some(16.0 / 9.0),
            AspectPreset::Tall9x16 => Some(9.0 / 16.0),
        }
    }
}

/// Export crop rectangle in logical canvas pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropSettings {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub aspect_ratio: AspectPreset,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self::full(Canvas::LOGICAL)
    }
}

impl CropSettings {
    pub fn full(canvas: Canvas) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: f64::from(canvas.width),
            height: f64::from(canvas.height),
            aspect_ratio: AspectPreset::Free,
        }
    }

    pub fn is_full(&self, canvas: Canvas) -> bool {
        *self == Self {
            aspect_ratio: self.aspect_ratio,
            ..Self::full(canvas)
        }
    }

    /// Switch to `preset`, shrinking the current rectangle to the ratio and centering it on
    /// the canvas.
    pub fn with_preset(&self, preset: AspectPreset, canvas: Canvas) -> Self {
        let Some(ratio) = preset.ratio() else {
            return Self {
                aspect_ratio: preset,
                ..self.clone()
            };
        };

        let (mut w, mut h) = (self.width, self.height);
        if w / h > ratio {
            w = h * ratio;
        } else {
            h = w / ratio;
        }
        let size = canvas.size();
        Self {
            x: (size.width - w) / 2.0,
            y: (size.height - h) / 2.0,
            width: w,
            height: h,
            aspect_ratio: preset,
        }
    }

    /// Integer pixel rectangle clipped to the canvas.
    pub fn pixel_rect(&self, canvas: Canvas) -> EditorResult<PixelRect> {
        let r = Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
            .intersect(canvas.bounds());
        let x0 = r.x0.round().max(0.0) as u32;
        let y0 = r.y0.round().max(0.0) as u32;
        let x1 = (r.x1.round() as u32).min(canvas.width);
        let y1 = (r.y1.round() as u32).min(canvas.height);
        if x1 <= x0 || y1 <= y0 {
            return Err(EditorError::validation(
                "crop rectangle does not overlap the canvas",
            ));
        }
        Ok(PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Copy a sub-rectangle out of a tightly packed RGBA8 buffer.
pub fn crop_rgba8(data: &[u8], width: u32, rect: PixelRect) -> Vec<u8> {
    let stride = width as usize * 4;
    let row_len = rect.width as usize * 4;
    let mut out = Vec::with_capacity(row_len * rect.height as usize);
    for y in rect.y..rect.y + rect.height {
        let start = y as usize * stride + rect.x as usize * 4;
        out.extend_from_slice(&data[start..start + row_len]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/export/crop.rs"]
mod tests;
