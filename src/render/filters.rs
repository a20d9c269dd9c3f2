use crate::{
    foundation::error::EditorResult,
    render::blur::blur_rgba8_premul,
    scene::model::FilterSettings,
};

/// 4x5 row-major color matrix over straight-alpha unit RGBA; column 5 is the offset.
pub type ColorMatrix = [f32; 20];

pub const IDENTITY: ColorMatrix = [
    1.0, 0.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

pub fn brightness(pct: f64) -> ColorMatrix {
    let b = (pct / 100.0) as f32;
    rgb_matrix([b, 0.0, 0.0, 0.0, b, 0.0, 0.0, 0.0, b], 0.0)
}

pub fn contrast(pct: f64) -> ColorMatrix {
    let c = (pct / 100.0) as f32;
    rgb_matrix([c, 0.0, 0.0, 0.0, c, 0.0, 0.0, 0.0, c], 0.5 - 0.5 * c)
}

pub fn saturate(pct: f64) -> ColorMatrix {
    let s = (pct / 100.0) as f32;
    rgb_matrix(
        [
            0.213 + 0.787 * s,
            0.715 - 0.715 * s,
            0.072 - 0.072 * s,
            0.213 - 0.213 * s,
            0.715 + 0.285 * s,
            0.072 - 0.072 * s,
            0.213 - 0.213 * s,
            0.715 - 0.715 * s,
            0.072 + 0.928 * s,
        ],
        0.0,
    )
}

pub fn sepia(pct: f64) -> ColorMatrix {
    let k = 1.0 - unit(pct);
    rgb_matrix(
        [
            0.393 + 0.607 * k,
            0.769 - 0.769 * k,
            0.189 - 0.189 * k,
            0.349 - 0.349 * k,
            0.686 + 0.314 * k,
            0.168 - 0.168 * k,
            0.272 - 0.272 * k,
            0.534 - 0.534 * k,
            0.131 + 0.869 * k,
        ],
        0.0,
    )
}

pub fn grayscale(pct: f64) -> ColorMatrix {
    let k = 1.0 - unit(pct);
    rgb_matrix(
        [
            0.2126 + 0.7874 * k,
            0.7152 - 0.7152 * k,
            0.0722 - 0.0722 * k,
            0.2126 - 0.2126 * k,
            0.7152 + 0.2848 * k,
            0.0722 - 0.0722 * k,
            0.2126 - 0.2126 * k,
            0.7152 - 0.7152 * k,
            0.0722 + 0.9278 * k,
        ],
        0.0,
    )
}

pub fn hue_rotate(deg: f64) -> ColorMatrix {
    let (sin, cos) = deg.to_radians().sin_cos();
    let (s, c) = (sin as f32, cos as f32);
    rgb_matrix(
        [
            0.213 + c * 0.787 - s * 0.213,
            0.715 - c * 0.715 - s * 0.715,
            0.072 - c * 0.072 + s * 0.928,
            0.213 - c * 0.213 + s * 0.143,
            0.715 + c * 0.285 + s * 0.140,
            0.072 - c * 0.072 - s * 0.283,
            0.213 - c * 0.213 - s * 0.787,
            0.715 - c * 0.715 + s * 0.715,
            0.072 + c * 0.928 + s * 0.072,
        ],
        0.0,
    )
}

pub fn invert(pct: f64) -> ColorMatrix {
    let a = unit(pct);
    let k = 1.0 - 2.0 * a;
    rgb_matrix([k, 0.0, 0.0, 0.0, k, 0.0, 0.0, 0.0, k], a)
}

pub fn opacity(pct: f64) -> ColorMatrix {
    let mut m = IDENTITY;
    m[18] = unit(pct);
    m
}

fn unit(pct: f64) -> f32 {
    (pct / 100.0).clamp(0.0, 1.0) as f32
}

fn rgb_matrix(m: [f32; 9], offset: f32) -> ColorMatrix {
    [
        m[0], m[1], m[2], 0.0, offset, //
        m[3], m[4], m[5], 0.0, offset, //
        m[6], m[7], m[8], 0.0, offset, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

/// Filter chain split around the blur, in application order.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterPlan {
    pub before_blur: Vec<ColorMatrix>,
    pub blur_sigma: f32,
    pub after_blur: Vec<ColorMatrix>,
}

impl FilterPlan {
    /// Order: brightness, contrast, saturate, blur, sepia, hue-rotate, invert, grayscale,
    /// opacity. Steps at their neutral value are left out.
    pub fn from_settings(f: &FilterSettings) -> Self {
        let mut before_blur = Vec::new();
        if f.brightness != 100.0 {
            before_blur.push(brightness(f.brightness));
        }
        if f.contrast != 100.0 {
            before_blur.push(contrast(f.contrast));
        }
        if f.saturation != 100.0 {
            before_blur.push(saturate(f.saturation));
        }

        let mut after_blur = Vec::new();
        if f.sepia != 0.0 {
            after_blur.push(sepia(f.sepia));
        }
        if f.hue_rotate.rem_euclid(360.0) != 0.0 {
            after_blur.push(hue_rotate(f.hue_rotate));
        }
        if f.invert != 0.0 {
            after_blur.push(invert(f.invert));
        }
        if f.grayscale != 0.0 {
            after_blur.push(grayscale(f.grayscale));
        }
        if f.opacity != 100.0 {
            after_blur.push(opacity(f.opacity));
        }

        Self {
            before_blur,
            blur_sigma: f.blur.max(0.0) as f32,
            after_blur,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.before_blur.is_empty() && self.after_blur.is_empty() && self.blur_sigma <= 0.0
    }

    /// Run the chain over a premultiplied RGBA8 layer.
    pub fn apply(&self, data: &mut Vec<u8>, width: u32, height: u32) -> EditorResult<()> {
        apply_color_matrices(data, &self.before_blur);
        if self.blur_sigma > 0.0 {
            *data = blur_rgba8_premul(data, width, height, self.blur_sigma)?;
        }
        apply_color_matrices(data, &self.after_blur);
        Ok(())
    }
}

/// Apply matrices in order, clamping to unit range after each one.
pub fn apply_color_matrices(data: &mut [u8], matrices: &[ColorMatrix]) {
    if matrices.is_empty() {
        return;
    }
    for px in data.chunks_exact_mut(4) {
        let pa = px[3] as f32 / 255.0;
        let inv_a = if pa > 0.0 { 1.0 / pa } else { 0.0 };
        let mut v = [
            (px[0] as f32 / 255.0 * inv_a).min(1.0),
            (px[1] as f32 / 255.0 * inv_a).min(1.0),
            (px[2] as f32 / 255.0 * inv_a).min(1.0),
            pa,
        ];
        for m in matrices {
            let [r, g, b, a] = v;
            for (row, out) in v.iter_mut().enumerate() {
                let k = row * 5;
                *out = (m[k] * r + m[k + 1] * g + m[k + 2] * b + m[k + 3] * a + m[k + 4])
                    .clamp(0.0, 1.0);
            }
        }
        let [r, g, b, a] = v;
        px[0] = (r * a * 255.0).round() as u8;
        px[1] = (g * a * 255.0).round() as u8;
        px[2] = (b * a * 255.0).round() as u8;
        px[3] = (a * 255.0).round() as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/filters.rs"]
mod tests;
