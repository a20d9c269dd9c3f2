//! Text shaping and placement shared by the live preview, export and hit testing.
//!
//! Every text block is laid out around its element position: lines stack from the block's top
//! edge with a fixed advance of `font_size * line_height`, each baseline sits in the middle of
//! its line box, and the whole block is centered on `(x, y)` before rotation. The same
//! placement is used on every path that draws or measures text.

use std::{borrow::Cow, collections::HashMap};

use usvg::fontdb;

use crate::{
    assets::{color::ColorDef, fonts::FontBook},
    foundation::core::{Affine, Rect, Size},
    scene::elements::{CodePalette, QuoteElement, TextAlign, TextElement, TextStroke},
    syntax::tokenizer::{Token, tokenize_lines},
};

/// Straight-alpha glyph color carried through parley as the layout brush.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<ColorDef> for TextBrush {
    fn from(c: ColorDef) -> Self {
        let [r, g, b, a] = c.to_rgba8_straight();
        Self { r, g, b, a }
    }
}

/// Everything layout needs to know about one text element.
#[derive(Clone, Debug)]
pub struct TextStyle<'a> {
    pub family_list: &'a str,
    pub weight: u16,
    pub font_size: f64,
    pub letter_spacing: f64,
    pub line_height: f64,
    pub align: TextAlign,
    /// Wrap width; `None` keeps each line on one row.
    pub wrap_width: Option<f64>,
    pub color: ColorDef,
    /// Syntax palette; `Some` colors each line by its tokens.
    pub palette: Option<&'a CodePalette>,
}

impl<'a> TextStyle<'a> {
    pub fn for_text(el: &'a TextElement) -> Self {
        Self {
            family_list: &el.font_family,
            weight: el.font_weight.0,
            font_size: el.font_size,
            letter_spacing: el.letter_spacing,
            line_height: el.line_height,
            align: el.text_align,
            wrap_width: None,
            color: el.color,
            palette: None,
        }
    }

    pub fn for_quote(q: &'a QuoteElement) -> Self {
        Self {
            wrap_width: q.width.filter(|w| *w > 0.0),
            palette: q.is_code_snippet.then_some(&q.code_colors),
            ..Self::for_text(&q.base)
        }
    }

    /// Distance between consecutive baselines.
    pub fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }
}

/// A glyph run in block-local coordinates (origin at the block's top-left corner).
#[derive(Clone, Debug)]
pub struct PlacedRun {
    pub brush: TextBrush,
    pub glyphs: Vec<vello_cpu::Glyph>,
}

/// A fully placed text block, ready to paint.
#[derive(Clone, Debug)]
pub struct TextBlock {
    pub size: Size,
    pub font_size: f32,
    pub line_count: usize,
    pub runs: Vec<PlacedRun>,
    /// `None` when no font face could be resolved; the block then only has a size.
    pub font: Option<vello_cpu::peniko::FontData>,
}

impl TextBlock {
    /// Bounds in the element's local frame, centered on the origin.
    pub fn local_bounds(&self) -> Rect {
        Rect::from_center_size((0.0, 0.0), self.size)
    }

    /// Map block-local coordinates into canvas space.
    pub fn transform(&self, x: f64, y: f64, rotation_deg: f64) -> Affine {
        element_transform(x, y, rotation_deg)
            * Affine::translate((-self.size.width / 2.0, -self.size.height / 2.0))
    }
}

/// Rotation about the element position, which is also its anchor.
pub fn element_transform(x: f64, y: f64, rotation_deg: f64) -> Affine {
    Affine::translate((x, y)) * Affine::rotate(rotation_deg.to_radians())
}

/// Measures text blocks; implemented by the real shaper and by a font-free approximation.
pub trait TextMeasure {
    fn measure(&mut self, text: &str, style: &TextStyle<'_>) -> Size;
}

/// Monospace-ish estimate used when no shaper is at hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxTextMeasure;

impl ApproxTextMeasure {
    const ADVANCE_EM: f64 = 0.6;
}

impl TextMeasure for ApproxTextMeasure {
    fn measure(&mut self, text: &str, style: &TextStyle<'_>) -> Size {
        let char_w = style.font_size * Self::ADVANCE_EM + style.letter_spacing;
        let mut rows = 0usize;
        let mut widest = 0.0f64;
        for line in text.split('\n') {
            let w = line.trim_end_matches('\r').chars().count() as f64 * char_w;
            match style.wrap_width {
                Some(wrap) if wrap > 0.0 && w > wrap => {
                    rows += (w / wrap).ceil() as usize;
                    widest = wrap;
                }
                _ => {
                    rows += 1;
                    widest = widest.max(w);
                }
            }
        }
        Size::new(
            style.wrap_width.unwrap_or(widest),
            rows as f64 * style.line_advance(),
        )
    }
}

struct FaceContext {
    font_ctx: parley::FontContext,
    family: String,
    font: vello_cpu::peniko::FontData,
}

struct ShapedLine {
    width: f32,
    ascent: f32,
    descent: f32,
    runs: Vec<PlacedRun>,
}

/// Parley-backed shaper over a [`FontBook`].
///
/// Each resolved face gets its own parley font context holding only that face, so the family
/// name parley sees always maps back to the bytes handed to the rasterizer.
pub struct TextShaper {
    fonts: FontBook,
    faces: HashMap<fontdb::ID, Option<FaceContext>>,
    layout_ctx: parley::LayoutContext<TextBrush>,
}

impl std::fmt::Debug for TextShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextShaper")
            .field("fonts", &self.fonts)
            .field("faces", &self.faces.len())
            .finish()
    }
}

impl TextShaper {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            faces: HashMap::new(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Lay out and place `text`. Never fails: without a usable font the block keeps an
    /// estimated size and carries no glyphs.
    pub fn shape(&mut self, text: &str, style: &TextStyle<'_>) -> TextBlock {
        let font_size = style.font_size.max(0.0) as f32;
        let face_id = self
            .fonts
            .resolve(style.family_list, style.weight)
            .and_then(|resolved| {
                let id = resolved.id;
                self.faces
                    .entry(id)
                    .or_insert_with(|| face_context(&resolved))
                    .as_ref()
                    .map(|_| id)
            });

        let Some(face_id) = face_id.filter(|_| font_size > 0.0) else {
            let size = ApproxTextMeasure.measure(text, style);
            return TextBlock {
                size,
                font_size,
                line_count: text.split('\n').count(),
                runs: Vec::new(),
                font: None,
            };
        };

        let token_lines = style.palette.map(|_| tokenize_lines(text));
        let mut lines = Vec::new();
        for (i, raw) in text.split('\n').enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let tokens = token_lines.as_ref().and_then(|t| t.get(i)).map(Vec::as_slice);
            lines.extend(self.shape_line(face_id, line, tokens, style));
        }

        let advance = style.line_advance() as f32;
        let width = style
            .wrap_width
            .map(|w| w as f32)
            .unwrap_or_else(|| lines.iter().map(|l| l.width).fold(0.0, f32::max));
        let mut runs = Vec::new();
        for (i, line) in lines.iter_mut().enumerate() {
            let dx = match style.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => (width - line.width) / 2.0,
                TextAlign::Right => width - line.width,
            };
            let top = i as f32 * advance;
            let baseline = top + (advance - (line.ascent + line.descent)) / 2.0 + line.ascent;
            for mut run in line.runs.drain(..) {
                for g in &mut run.glyphs {
                    g.x += dx;
                    g.y += baseline;
                }
                runs.push(run);
            }
        }

        TextBlock {
            size: Size::new(f64::from(width), f64::from(advance) * lines.len() as f64),
            font_size,
            line_count: lines.len(),
            runs,
            font: self
                .faces
                .get(&face_id)
                .and_then(Option::as_ref)
                .map(|f| f.font.clone()),
        }
    }

    pub fn shape_text(&mut self, el: &TextElement) -> TextBlock {
        self.shape(&el.text, &TextStyle::for_text(el))
    }

    pub fn shape_quote(&mut self, q: &QuoteElement) -> TextBlock {
        self.shape(&q.base.text, &TextStyle::for_quote(q))
    }

    fn shape_line(
        &mut self,
        face_id: fontdb::ID,
        line: &str,
        tokens: Option<&[Token<'_>]>,
        style: &TextStyle<'_>,
    ) -> Vec<ShapedLine> {
        let font_size = style.font_size as f32;
        let empty = || ShapedLine {
            width: 0.0,
            ascent: font_size * 0.8,
            descent: font_size * 0.2,
            runs: Vec::new(),
        };
        let Some(face) = self.faces.get_mut(&face_id).and_then(Option::as_mut) else {
            return vec![empty()];
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut face.font_ctx, line, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_size));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            style.letter_spacing as f32,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush::from(
            style.color,
        )));
        if let (Some(palette), Some(tokens)) = (style.palette, tokens) {
            for t in tokens {
                if let Some(c) = palette.color_for(t.role) {
                    builder.push(
                        parley::style::StyleProperty::Brush(TextBrush::from(c)),
                        t.span.start..t.span.end,
                    );
                }
            }
        }

        let mut layout: parley::Layout<TextBrush> = builder.build(line);
        let wrap = style.wrap_width.map(|w| w as f32);
        layout.break_all_lines(wrap);
        layout.align(
            wrap,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        let mut out = Vec::new();
        for l in layout.lines() {
            let metrics = l.metrics();
            let mut shaped = ShapedLine {
                width: 0.0,
                ascent: metrics.ascent,
                descent: metrics.descent,
                runs: Vec::new(),
            };
            for item in l.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let mut x = run.offset();
                let glyphs = run
                    .glyphs()
                    .map(|g| {
                        let glyph = vello_cpu::Glyph {
                            id: g.id,
                            x: x + g.x,
                            y: g.y,
                        };
                        x += g.advance;
                        glyph
                    })
                    .collect();
                shaped.width = shaped.width.max(run.offset() + run.advance());
                shaped.runs.push(PlacedRun {
                    brush: run.style().brush,
                    glyphs,
                });
            }
            out.push(shaped);
        }
        if out.is_empty() {
            out.push(empty());
        }
        out
    }
}

impl TextMeasure for TextShaper {
    fn measure(&mut self, text: &str, style: &TextStyle<'_>) -> Size {
        self.shape(text, style).size
    }
}

fn face_context(resolved: &crate::assets::fonts::ResolvedFont) -> Option<FaceContext> {
    let mut font_ctx = parley::FontContext::default();
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(resolved.data.to_vec()), None);
    let Some(family_id) = families.first().map(|(id, _)| *id) else {
        tracing::warn!(family = %resolved.family, "font bytes registered no families");
        return None;
    };
    let family = font_ctx.collection.family_name(family_id)?.to_string();
    let font = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(resolved.data.to_vec()),
        resolved.index,
    );
    Some(FaceContext {
        font_ctx,
        family,
        font,
    })
}

/// Paint a placed block: optional outline first, then the fill.
pub(crate) fn paint_block(
    ctx: &mut vello_cpu::RenderContext,
    block: &TextBlock,
    transform: Affine,
    stroke: Option<&TextStroke>,
) {
    let Some(font) = &block.font else {
        return;
    };
    ctx.set_transform(crate::render::shapes::affine_to_cpu(transform));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    if let Some(stroke) = stroke.filter(|s| s.enabled && s.width > 0.0) {
        let [r, g, b, a] = stroke.color.to_rgba8_straight();
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(stroke.width));
        for run in &block.runs {
            ctx.glyph_run(font)
                .font_size(block.font_size)
                .stroke_glyphs(run.glyphs.iter().copied());
        }
    }

    for run in &block.runs {
        let TextBrush { r, g, b, a } = run.brush;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.glyph_run(font)
            .font_size(block.font_size)
            .fill_glyphs(run.glyphs.iter().copied());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
