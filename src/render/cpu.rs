use std::sync::Arc;

use crate::{
    assets::{decode::PreparedImage, fonts::FontBook},
    foundation::{
        core::{Affine, Canvas, Rgba8Premul},
        error::{EditorError, EditorResult},
    },
    render::{
        backend::{BackgroundSource, FrameRGBA, RenderBackend, RenderSettings},
        blur::blur_sparse_in_place,
        composite::{composite_over_rgba8_premul, fill_solid_over, premul_over_in_place_opacity},
        filters::FilterPlan,
        gradient::render_linear_gradient,
        shapes::{affine_to_cpu, paint_shape},
        text::{TextBlock, TextShaper, paint_block},
    },
    scene::{
        elements::{Shadow, TextElement},
        model::{MediaKind, Scene},
    },
};

/// CPU backend powered by `vello_cpu` for vector and text rasterization.
///
/// Every overlay element is drawn into its own transparent layer and composited with the
/// element opacity, so per-element shadows and opacity never interact with what is already on
/// the frame.
pub struct CpuBackend {
    settings: RenderSettings,
    canvas: Canvas,
    ctx: Option<vello_cpu::RenderContext>,
    shaper: TextShaper,
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("settings", &self.settings)
            .field("canvas", &self.canvas)
            .finish()
    }
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> Self {
        let fonts = settings.load_fonts();
        Self::with_fonts(settings, fonts)
    }

    /// Backend over an already-built font book (tests and hosts that ship their own fonts).
    pub fn with_fonts(settings: RenderSettings, fonts: FontBook) -> Self {
        Self {
            settings,
            canvas: Canvas::LOGICAL,
            ctx: None,
            shaper: TextShaper::new(fonts),
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn with_ctx_mut<R>(
        &mut self,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> EditorResult<R>,
    ) -> EditorResult<R> {
        let (width, height) = canvas_u16(self.canvas)?;
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    /// Run `draw` against a cleared context and read the result back as premultiplied bytes.
    fn rasterize_layer(
        &mut self,
        draw: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext),
    ) -> EditorResult<Vec<u8>> {
        let (width, height) = canvas_u16(self.canvas)?;
        self.with_ctx_mut(|this, ctx| {
            draw(this, ctx);
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(width, height);
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap.data_as_u8_slice().to_vec())
        })
    }

    fn background_layer(
        &mut self,
        scene: &Scene,
        background: BackgroundSource<'_>,
    ) -> EditorResult<Option<Vec<u8>>> {
        match scene.media_kind() {
            MediaKind::Video => Ok(None),
            MediaKind::Gradient => Ok(Some(render_linear_gradient(self.canvas, scene.gradient()))),
            MediaKind::Image => match background {
                BackgroundSource::Ready(image) => self.cover_fit_layer(image).map(Some),
                BackgroundSource::Pending => Err(EditorError::resource_load(
                    "background image is still loading",
                )),
                BackgroundSource::Failed | BackgroundSource::Unneeded => {
                    tracing::warn!(
                        source = scene.media_source().unwrap_or(""),
                        "background image unavailable, drawing gradient instead"
                    );
                    Ok(Some(render_linear_gradient(self.canvas, scene.gradient())))
                }
            },
        }
    }

    fn cover_fit_layer(&mut self, image: &PreparedImage) -> EditorResult<Vec<u8>> {
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let transform = cover_fit_transform(self.canvas, image.width, image.height);
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));
        self.rasterize_layer(|_, ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        })
    }

    fn draw_text_like(
        &mut self,
        frame: &mut [u8],
        el: &TextElement,
        block: &TextBlock,
    ) -> EditorResult<()> {
        if el.opacity <= 0.0 || block.font.is_none() {
            return Ok(());
        }
        let transform = block.transform(el.x, el.y, el.rotation);
        let mut layer =
            self.rasterize_layer(|_, ctx| paint_block(ctx, block, transform, Some(&el.stroke)))?;

        if el.shadow.enabled && !el.shadow.color.is_invisible() {
            let mut shadow = shadow_layer(&layer, self.canvas, &el.shadow)?;
            premul_over_in_place_opacity(&mut shadow, &layer, 1.0)?;
            layer = shadow;
        }
        premul_over_in_place_opacity(frame, &layer, el.opacity as f32)
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(skip_all, fields(revision = scene.revision()))]
    fn render_scene(
        &mut self,
        scene: &Scene,
        background: BackgroundSource<'_>,
    ) -> EditorResult<FrameRGBA> {
        let canvas = self.canvas;
        let mut frame = vec![0u8; canvas.pixel_count() * 4];
        if let Some([r, g, b, a]) = self.settings.clear_rgba {
            let c = Rgba8Premul::from_straight_rgba(r, g, b, a).to_array();
            for px in frame.chunks_exact_mut(4) {
                px.copy_from_slice(&c);
            }
        }

        // Filters and blend mode stop at the background layer.
        if let Some(mut bg) = self.background_layer(scene, background)? {
            FilterPlan::from_settings(scene.filters()).apply(&mut bg, canvas.width, canvas.height)?;
            composite_over_rgba8_premul(&mut frame, &bg, 1.0, scene.blend_mode())?;
        }

        let tint = scene.tint();
        if tint.opacity > 0.0 {
            fill_solid_over(&mut frame, tint.color.faded(tint.opacity).to_rgba8_premul());
        }
        let veil = scene.veil();
        if veil.enabled && veil.opacity > 0.0 {
            fill_solid_over(&mut frame, veil.color.faded(veil.opacity).to_rgba8_premul());
        }

        for el in scene.texts() {
            let block = self.shaper.shape_text(el);
            self.draw_text_like(&mut frame, el, &block)?;
        }
        if let Some(q) = scene.quote() {
            let block = self.shaper.shape_quote(q);
            self.draw_text_like(&mut frame, &q.base, &block)?;
        }
        for el in scene.shapes() {
            if el.opacity <= 0.0 {
                continue;
            }
            let layer = self.rasterize_layer(|_, ctx| paint_shape(ctx, el))?;
            premul_over_in_place_opacity(&mut frame, &layer, el.opacity as f32)?;
        }

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: frame,
            premultiplied: true,
        })
    }

    fn text_shaper(&mut self) -> &mut TextShaper {
        &mut self.shaper
    }
}

/// Scale-to-cover and center an `iw x ih` image on the canvas.
pub fn cover_fit_transform(canvas: Canvas, iw: u32, ih: u32) -> Affine {
    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
    let (iw, ih) = (f64::from(iw.max(1)), f64::from(ih.max(1)));
    let scale = (cw / iw).max(ch / ih);
    Affine::translate(((cw - iw * scale) / 2.0, (ch - ih * scale) / 2.0)) * Affine::scale(scale)
}

/// The element layer's coverage recolored with the shadow color, offset and blurred.
fn shadow_layer(layer: &[u8], canvas: Canvas, shadow: &Shadow) -> EditorResult<Vec<u8>> {
    let (w, h) = (canvas.width as i64, canvas.height as i64);
    let dx = shadow.offset_x.round() as i64;
    let dy = shadow.offset_y.round() as i64;
    let color = shadow.color.to_rgba8_premul().to_array();

    let mut out = vec![0u8; layer.len()];
    for y in 0..h {
        let sy = y - dy;
        if !(0..h).contains(&sy) {
            continue;
        }
        for x in 0..w {
            let sx = x - dx;
            if !(0..w).contains(&sx) {
                continue;
            }
            let coverage = u16::from(layer[((sy * w + sx) * 4 + 3) as usize]);
            if coverage == 0 {
                continue;
            }
            let i = ((y * w + x) * 4) as usize;
            for c in 0..4 {
                out[i + c] = ((u16::from(color[c]) * coverage + 127) / 255) as u8;
            }
        }
    }

    let sigma = (shadow.blur / 2.0) as f32;
    if sigma > 0.0 {
        blur_sparse_in_place(&mut out, canvas.width, canvas.height, sigma)?;
    }
    Ok(out)
}

fn canvas_u16(canvas: Canvas) -> EditorResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| EditorError::validation("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| EditorError::validation("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> EditorResult<vello_cpu::Pixmap> {
    let (w, h) = canvas_u16(Canvas { width, height })
        .map_err(|_| EditorError::resource_load("background image exceeds 65535 px"))?;
    if bytes.len() != (width as usize) * (height as usize) * 4 {
        return Err(EditorError::resource_load("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
