use crate::foundation::error::{EditorError, EditorResult};

/// Kernel radius covering three standard deviations.
pub fn radius_for_sigma(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

/// Separable gaussian blur of a premultiplied RGBA8 buffer. Edges clamp.
pub fn blur_rgba8_premul(src: &[u8], width: u32, height: u32, sigma: f32) -> EditorResult<Vec<u8>> {
    let expected_len = buffer_len(width, height)?;
    if src.len() != expected_len {
        return Err(EditorError::validation(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    let radius = radius_for_sigma(sigma);
    if radius == 0 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Blur only the region holding non-transparent pixels, padded by the kernel radius.
///
/// Layers of single overlay elements are mostly empty, so this is what shadows go through.
pub fn blur_sparse_in_place(data: &mut [u8], width: u32, height: u32, sigma: f32) -> EditorResult<()> {
    let radius = radius_for_sigma(sigma);
    if radius == 0 {
        return Ok(());
    }
    let Some((x0, y0, x1, y1)) = alpha_bounds(data, width, height) else {
        return Ok(());
    };
    let x0 = x0.saturating_sub(radius);
    let y0 = y0.saturating_sub(radius);
    let x1 = (x1 + radius).min(width);
    let y1 = (y1 + radius).min(height);
    let (rw, rh) = (x1 - x0, y1 - y0);

    let stride = width as usize * 4;
    let row_len = rw as usize * 4;
    let mut region = Vec::with_capacity(row_len * rh as usize);
    for y in y0..y1 {
        let start = y as usize * stride + x0 as usize * 4;
        region.extend_from_slice(&data[start..start + row_len]);
    }

    let blurred = blur_rgba8_premul(&region, rw, rh, sigma)?;
    for (i, y) in (y0..y1).enumerate() {
        let start = y as usize * stride + x0 as usize * 4;
        data[start..start + row_len].copy_from_slice(&blurred[i * row_len..(i + 1) * row_len]);
    }
    Ok(())
}

/// Half-open bounding box `(x0, y0, x1, y1)` of pixels with non-zero alpha.
pub fn alpha_bounds(data: &[u8], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0u32, 0u32);
    for y in 0..height {
        let row = &data[(y * width * 4) as usize..((y + 1) * width * 4) as usize];
        for (x, px) in row.chunks_exact(4).enumerate() {
            if px[3] != 0 {
                let x = x as u32;
                x0 = x0.min(x);
                x1 = x1.max(x + 1);
                y0 = y0.min(y);
                y1 = y1.max(y + 1);
            }
        }
    }
    (x1 > x0 && y1 > y0).then_some((x0, y0, x1, y1))
}

fn buffer_len(width: u32, height: u32) -> EditorResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| EditorError::validation("blur buffer size overflow"))
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> EditorResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(EditorError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Keep the kernel summing to exactly 1.0 so flat regions stay flat.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
