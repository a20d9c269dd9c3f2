use kurbo::Shape;

use crate::{
    assets::color::{ColorDef, Fill},
    foundation::core::{Affine, BezPath, Point},
    render::text::element_transform,
    scene::elements::{ShapeElement, ShapeKind},
};

const TOLERANCE: f64 = 0.1;

/// Outline pieces of a shape in its local frame (origin at the shape center, unrotated).
#[derive(Clone, Debug, Default)]
pub struct ShapeGeometry {
    /// Closed outline painted with the shape fill. `None` for lines and arrows.
    pub body: Option<BezPath>,
    /// Path traced with the stroke color and width.
    pub outline: BezPath,
    /// Arrow head, filled with the stroke color.
    pub head: Option<BezPath>,
}

/// Arrow head length for a shape of the given width.
pub fn arrow_head_len(width: f64) -> f64 {
    (width.abs() * 0.15).clamp(12.0, 48.0)
}

/// Rectangle corner radius after clamping to half the shorter side.
pub fn effective_corner_radius(el: &ShapeElement) -> f64 {
    let max = el.width.abs().min(el.height.abs()) / 2.0;
    el.corner_radius.clamp(0.0, max)
}

pub fn shape_geometry(el: &ShapeElement) -> ShapeGeometry {
    let hw = el.width.abs() / 2.0;
    let hh = el.height.abs() / 2.0;
    match el.kind {
        ShapeKind::Rectangle => {
            let path = kurbo::RoundedRect::new(-hw, -hh, hw, hh, effective_corner_radius(el))
                .to_path(TOLERANCE);
            ShapeGeometry {
                body: Some(path.clone()),
                outline: path,
                head: None,
            }
        }
        ShapeKind::Circle => {
            let path = kurbo::Ellipse::new(Point::ORIGIN, (hw, hh), 0.0).to_path(TOLERANCE);
            ShapeGeometry {
                body: Some(path.clone()),
                outline: path,
                head: None,
            }
        }
        ShapeKind::Line => {
            let mut outline = BezPath::new();
            outline.move_to((-hw, 0.0));
            outline.line_to((hw, 0.0));
            ShapeGeometry {
                body: None,
                outline,
                head: None,
            }
        }
        ShapeKind::Arrow => {
            let len = arrow_head_len(el.width);
            let base_x = (hw - len).max(-hw);
            let half = len * 0.35;

            let mut outline = BezPath::new();
            outline.move_to((-hw, 0.0));
            outline.line_to((base_x, 0.0));

            let mut head = BezPath::new();
            head.move_to((hw, 0.0));
            head.line_to((base_x, -half));
            head.line_to((base_x, half));
            head.close_path();

            ShapeGeometry {
                body: None,
                outline,
                head: Some(head),
            }
        }
    }
}

/// Local-to-canvas transform of a shape.
pub fn shape_transform(el: &ShapeElement) -> Affine {
    element_transform(el.x, el.y, el.rotation)
}

pub(crate) fn paint_shape(ctx: &mut vello_cpu::RenderContext, el: &ShapeElement) {
    let geom = shape_geometry(el);
    ctx.set_transform(affine_to_cpu(shape_transform(el)));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    if let (Some(body), Fill::Color(c)) = (&geom.body, el.fill)
        && !c.is_invisible()
    {
        ctx.set_paint(paint_color(c));
        ctx.fill_path(&bezpath_to_cpu(body));
    }

    if el.stroke_width > 0.0 && !el.stroke.is_invisible() {
        ctx.set_paint(paint_color(el.stroke));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(el.stroke_width));
        ctx.stroke_path(&bezpath_to_cpu(&geom.outline));
    }

    if let Some(head) = &geom.head {
        ctx.set_paint(paint_color(el.stroke));
        ctx.fill_path(&bezpath_to_cpu(head));
    }
}

pub(crate) fn paint_color(c: ColorDef) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8_straight();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/shapes.rs"]
mod tests;
