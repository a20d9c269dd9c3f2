use crate::{
    assets::color::ColorDef,
    foundation::{
        core::Canvas,
        math::{lerp_f32, unit_to_u8},
    },
    scene::model::GradientSpec,
};

/// Unit direction of a gradient angle: 0° runs top to bottom, angles turn clockwise.
pub fn direction(angle_deg: f64) -> (f64, f64) {
    let (s, c) = angle_deg.to_radians().sin_cos();
    (-s, c)
}

/// Rasterize a linear gradient into a premultiplied RGBA8 buffer.
///
/// The gradient line passes through the canvas center and is just long enough for the first
/// and last stops to touch opposite corners. Stops are evenly spaced over `[0, 1]`.
pub fn render_linear_gradient(canvas: Canvas, spec: &GradientSpec) -> Vec<u8> {
    let (w, h) = (canvas.width, canvas.height);
    let mut out = vec![0u8; canvas.pixel_count() * 4];
    let stops: Vec<[f32; 4]> = spec.colors().iter().map(|c| straight_unit(*c)).collect();
    if stops.is_empty() {
        return out;
    }

    let (dx, dy) = direction(spec.angle_deg());
    let (fw, fh) = (f64::from(w), f64::from(h));
    let len = (fw * dx).abs() + (fh * dy).abs();
    let (cx, cy) = (fw / 2.0, fh / 2.0);

    for y in 0..h {
        let py = f64::from(y) + 0.5 - cy;
        for x in 0..w {
            let px = f64::from(x) + 0.5 - cx;
            let t = if len > 0.0 {
                ((px * dx + py * dy) / len + 0.5).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let c = sample(&stops, t as f32);
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            out[idx..idx + 4].copy_from_slice(&premul_u8(c));
        }
    }
    out
}

fn sample(stops: &[[f32; 4]], t: f32) -> [f32; 4] {
    if stops.len() == 1 {
        return stops[0];
    }
    let segs = (stops.len() - 1) as f32;
    let pos = t * segs;
    let i = (pos.floor() as usize).min(stops.len() - 2);
    let local = pos - i as f32;
    let (a, b) = (stops[i], stops[i + 1]);
    [
        lerp_f32(a[0], b[0], local),
        lerp_f32(a[1], b[1], local),
        lerp_f32(a[2], b[2], local),
        lerp_f32(a[3], b[3], local),
    ]
}

fn straight_unit(c: ColorDef) -> [f32; 4] {
    [
        c.r.clamp(0.0, 1.0) as f32,
        c.g.clamp(0.0, 1.0) as f32,
        c.b.clamp(0.0, 1.0) as f32,
        c.a.clamp(0.0, 1.0) as f32,
    ]
}

fn premul_u8(c: [f32; 4]) -> [u8; 4] {
    let a = c[3];
    [
        unit_to_u8(c[0] * a),
        unit_to_u8(c[1] * a),
        unit_to_u8(c[2] * a),
        unit_to_u8(a),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/render/gradient.rs"]
mod tests;
