use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::{Affine, Point, Size},
    interact::mapper::CoordinateMapper,
    render::text::{TextMeasure, TextStyle, element_transform},
    scene::model::{ElementRef, Scene},
};

/// Corner resize handles, named by compass direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Handle {
    pub const ALL: [Handle; 4] = [Handle::Nw, Handle::Ne, Handle::Sw, Handle::Se];

    /// `(x, y)` direction of the handle from the box center: east and south are positive.
    pub fn signs(self) -> (f64, f64) {
        match self {
            Handle::Nw => (-1.0, -1.0),
            Handle::Ne => (1.0, -1.0),
            Handle::Sw => (-1.0, 1.0),
            Handle::Se => (1.0, 1.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handle::Nw => "nw",
            Handle::Ne => "ne",
            Handle::Sw => "sw",
            Handle::Se => "se",
        }
    }
}

/// What a pointer-down landed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    Body(ElementRef),
    Handle(ElementRef, Handle),
}

impl PointerTarget {
    pub fn element(&self) -> &ElementRef {
        match self {
            PointerTarget::Body(r) | PointerTarget::Handle(r, _) => r,
        }
    }
}

/// Rotated box an element occupies in logical space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementFrame {
    pub center: Point,
    pub size: Size,
    pub rotation_deg: f64,
}

impl ElementFrame {
    pub fn transform(&self) -> Affine {
        element_transform(self.center.x, self.center.y, self.rotation_deg)
    }

    pub fn contains(&self, p: Point) -> bool {
        let local = self.transform().inverse() * p;
        local.x.abs() <= self.size.width / 2.0 && local.y.abs() <= self.size.height / 2.0
    }

    pub fn corner(&self, handle: Handle) -> Point {
        let (sx, sy) = handle.signs();
        self.transform() * Point::new(sx * self.size.width / 2.0, sy * self.size.height / 2.0)
    }
}

/// Screen-space radius around a corner that counts as grabbing its handle.
pub const HANDLE_HIT_RADIUS: f64 = 10.0;
/// Thin shapes (lines, arrows) are at least this tall for hit testing, in logical px.
pub const MIN_HIT_EXTENT: f64 = 12.0;

/// Elements in draw order: texts, the quote, then shapes.
pub fn draw_order(scene: &Scene) -> Vec<ElementRef> {
    let mut out: Vec<ElementRef> = scene
        .texts()
        .iter()
        .map(|t| ElementRef::Text(t.id.clone()))
        .collect();
    if scene.quote().is_some() {
        out.push(ElementRef::Quote);
    }
    out.extend(scene.shapes().iter().map(|s| ElementRef::Shape(s.id.clone())));
    out
}

pub fn element_frame(
    scene: &Scene,
    target: &ElementRef,
    measure: &mut dyn TextMeasure,
) -> Option<ElementFrame> {
    match target {
        ElementRef::Text(id) => {
            let el = scene.text(id)?;
            Some(ElementFrame {
                center: Point::new(el.x, el.y),
                size: measure.measure(&el.text, &TextStyle::for_text(el)),
                rotation_deg: el.rotation,
            })
        }
        ElementRef::Quote => {
            let q = scene.quote()?;
            let size = match q.box_size() {
                Some((w, h)) => Size::new(w, h),
                None => measure.measure(&q.base.text, &TextStyle::for_quote(q)),
            };
            Some(ElementFrame {
                center: Point::new(q.base.x, q.base.y),
                size,
                rotation_deg: q.base.rotation,
            })
        }
        ElementRef::Shape(id) => {
            let s = scene.shape(id)?;
            Some(ElementFrame {
                center: Point::new(s.x, s.y),
                size: Size::new(s.width.abs(), s.height.abs().max(MIN_HIT_EXTENT)),
                rotation_deg: s.rotation,
            })
        }
    }
}

/// Find what lies under a screen point.
///
/// Handles of the selected element win over everything, then bodies are tested topmost first.
pub fn hit_test(
    scene: &Scene,
    mapper: &CoordinateMapper,
    screen: Point,
    measure: &mut dyn TextMeasure,
) -> Option<PointerTarget> {
    if let Some(selected) = scene.selection()
        && let Some(frame) = element_frame(scene, selected, measure)
    {
        for handle in Handle::ALL {
            let corner = mapper.to_screen(frame.corner(handle));
            if corner.distance(screen) <= HANDLE_HIT_RADIUS {
                return Some(PointerTarget::Handle(selected.clone(), handle));
            }
        }
    }

    let logical = mapper.to_logical(screen);
    draw_order(scene).into_iter().rev().find_map(|r| {
        let frame = element_frame(scene, &r, measure)?;
        frame.contains(logical).then_some(PointerTarget::Body(r))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/interact/hit.rs"]
mod tests;
