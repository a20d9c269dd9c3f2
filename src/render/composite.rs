use crate::{
    foundation::{
        core::Rgba8Premul,
        error::{EditorError, EditorResult},
        math::{add_sat_u8, mul_div255_u8},
    },
    scene::model::BlendMode,
};

/// Source-over of premultiplied `src` onto `dst`, with `src` scaled by `opacity`.
pub fn premul_over_in_place_opacity(dst: &mut [u8], src: &[u8], opacity: f32) -> EditorResult<()> {
    check_same_len(dst, src, "premul_over_in_place_opacity")?;
    let op = ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    if op == 0 {
        return Ok(());
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = mul_div255_u8(u16::from(s[3]), op);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(sa);

        d[3] = add_sat_u8(sa, mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let sc = mul_div255_u8(u16::from(s[c]), op);
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = add_sat_u8(sc, dc);
        }
    }
    Ok(())
}

/// Source-over of one solid premultiplied color across the whole buffer.
pub fn fill_solid_over(dst: &mut [u8], color: Rgba8Premul) {
    if color.a == 0 {
        return;
    }
    let inv = 255u16 - u16::from(color.a);
    let src = color.to_array();
    for d in dst.chunks_exact_mut(4) {
        for c in 0..4 {
            d[c] = add_sat_u8(src[c], mul_div255_u8(u16::from(d[c]), inv));
        }
    }
}

/// Composite `src` over `dst` with a separable blend mode.
///
/// The blend kernel is picked once per call; each branch monomorphizes its own inner loop.
pub fn composite_over_rgba8_premul(
    dst: &mut [u8],
    src: &[u8],
    opacity: f32,
    blend: BlendMode,
) -> EditorResult<()> {
    check_same_len(dst, src, "composite_over_rgba8_premul")?;

    match blend {
        BlendMode::Normal => premul_over_in_place_opacity(dst, src, opacity),
        BlendMode::Multiply => blend_over(dst, src, opacity, |s, d| s * d),
        BlendMode::Screen => blend_over(dst, src, opacity, |s, d| s + d - s * d),
        BlendMode::Overlay => blend_over(dst, src, opacity, |s, d| {
            if d <= 0.5 {
                2.0 * s * d
            } else {
                1.0 - 2.0 * (1.0 - s) * (1.0 - d)
            }
        }),
        BlendMode::Darken => blend_over(dst, src, opacity, |s, d| s.min(d)),
        BlendMode::Lighten => blend_over(dst, src, opacity, |s, d| s.max(d)),
        BlendMode::ColorDodge => blend_over(dst, src, opacity, |s, d| {
            if d <= 0.0 {
                0.0
            } else if s >= 1.0 {
                1.0
            } else {
                (d / (1.0 - s)).min(1.0)
            }
        }),
        BlendMode::ColorBurn => blend_over(dst, src, opacity, |s, d| {
            if d >= 1.0 {
                1.0
            } else if s <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - d) / s).min(1.0)
            }
        }),
        BlendMode::SoftLight => blend_over(dst, src, opacity, |s, d| {
            if s <= 0.5 {
                d - (1.0 - 2.0 * s) * d * (1.0 - d)
            } else {
                let g = if d <= 0.25 {
                    ((16.0 * d - 12.0) * d + 4.0) * d
                } else {
                    d.sqrt()
                };
                d + (2.0 * s - 1.0) * (g - d)
            }
        }),
        BlendMode::HardLight => blend_over(dst, src, opacity, |s, d| {
            if s <= 0.5 {
                2.0 * s * d
            } else {
                1.0 - 2.0 * (1.0 - s) * (1.0 - d)
            }
        }),
        BlendMode::Difference => blend_over(dst, src, opacity, |s, d| (d - s).abs()),
        BlendMode::Exclusion => blend_over(dst, src, opacity, |s, d| d + s - 2.0 * d * s),
    }
}

#[inline(always)]
fn blend_over<F>(dst: &mut [u8], src: &[u8], opacity: f32, blend_fn: F) -> EditorResult<()>
where
    F: Fn(f32, f32) -> f32,
{
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return Ok(());
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        // out_a = sa + da * (1 - sa)
        // out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
        let sa = (s[3] as f32 / 255.0) * opacity;
        if sa <= 0.0 {
            continue;
        }
        let da = d[3] as f32 / 255.0;
        let out_a = (sa + da * (1.0 - sa)).clamp(0.0, 1.0);

        for c in 0..3 {
            let sp = (s[c] as f32 / 255.0) * opacity;
            let dp = d[c] as f32 / 255.0;
            let sc = (sp / sa).clamp(0.0, 1.0);
            let dc = if da > 0.0 { (dp / da).clamp(0.0, 1.0) } else { 0.0 };
            let b = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out = (sp * (1.0 - da) + dp * (1.0 - sa) + b * sa * da).clamp(0.0, 1.0);
            d[c] = (out * 255.0).round() as u8;
        }
        d[3] = (out_a * 255.0).round() as u8;
    }

    Ok(())
}

fn check_same_len(dst: &[u8], src: &[u8], what: &str) -> EditorResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(EditorError::validation(format!(
            "{what} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
