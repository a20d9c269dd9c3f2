//! Pointer-driven drag, resize and in-place text editing.
//!
//! The controller owns no element data. Every pointer event reads the element's current state
//! from the [`Scene`] it is handed and writes the result straight back, so a long drag always
//! sees the latest scene. Positions are derived from the values captured at pointer-down plus
//! the total pointer delta, never by accumulating per-move deltas.

use crate::{
    foundation::core::{Point, Size, Vec2},
    interact::{
        hit::{Handle, PointerTarget},
        mapper::CoordinateMapper,
    },
    scene::{
        model::{ElementRef, Scene},
        patch::{ElementPatch, QuotePatch, ShapePatch, TextPatch},
    },
};

/// Font-size change per screen pixel of handle movement.
pub const FONT_RESIZE_RATE: f64 = 0.002;
pub const MIN_FONT_SIZE: f64 = 8.0;
pub const MAX_FONT_SIZE: f64 = 200.0;
/// Smallest shape width/height reachable by resizing, in logical px.
pub const MIN_SHAPE_EXTENT: f64 = 20.0;
/// Smallest quote box width/height reachable by resizing, in logical px.
pub const MIN_QUOTE_BOX: f64 = 50.0;

/// Geometry captured when a resize starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResizeStart {
    /// Text, or a quote without a box: the handle scales the font.
    Font { size: f64 },
    QuoteBox {
        center: Point,
        size: Size,
        font_size: f64,
    },
    ShapeBox { center: Point, size: Size },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        target: ElementRef,
        pointer_start: Point,
        origin: Point,
    },
    Resizing {
        target: ElementRef,
        handle: Handle,
        pointer_start: Point,
        start: ResizeStart,
    },
}

/// Keys that can end an in-place edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Escape,
}

/// In-place text editing of one text element or the quote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEditSession {
    pub target: ElementRef,
    pub buffer: String,
    /// The quote edits multi-line text; plain Enter inserts a line break there.
    pub multiline: bool,
}

#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    state: Interaction,
    editing: Option<TextEditSession>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Interaction {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == Interaction::Idle
    }

    pub fn editing(&self) -> Option<&TextEditSession> {
        self.editing.as_ref()
    }

    /// Start a drag or resize. Returns whether an interaction started.
    ///
    /// A handle only resizes when its element is already selected; otherwise it behaves like
    /// the body. While editing, the edited element's body does not start a drag.
    pub fn pointer_down(
        &mut self,
        scene: &mut Scene,
        target: PointerTarget,
        pointer: Point,
        container: Option<Size>,
    ) -> bool {
        if container.and_then(CoordinateMapper::new).is_none() {
            tracing::debug!("pointer down ignored: container has no size");
            return false;
        }
        let element = target.element().clone();
        if !scene.contains(&element) {
            return false;
        }

        let handle = match target {
            PointerTarget::Handle(_, h) if scene.is_selected(&element) => Some(h),
            _ => None,
        };

        if let Some(edit) = &self.editing
            && edit.target == element
            && handle.is_none()
        {
            return false;
        }
        if self
            .editing
            .as_ref()
            .is_some_and(|edit| edit.target != element)
        {
            self.commit(scene);
        }

        if scene.select(Some(element.clone())).is_err() {
            return false;
        }

        self.state = match handle {
            Some(handle) => {
                let Some(start) = resize_start(scene, &element) else {
                    return false;
                };
                tracing::debug!(element = ?element, handle = handle.as_str(), "resize started");
                Interaction::Resizing {
                    target: element,
                    handle,
                    pointer_start: pointer,
                    start,
                }
            }
            None => {
                let Some(origin) = element_position(scene, &element) else {
                    return false;
                };
                tracing::debug!(element = ?element, "drag started");
                Interaction::Dragging {
                    target: element,
                    pointer_start: pointer,
                    origin,
                }
            }
        };
        true
    }

    /// Apply pointer movement. Returns whether the scene changed.
    pub fn pointer_move(&mut self, scene: &mut Scene, pointer: Point, container: Option<Size>) -> bool {
        let Some(mapper) = container.and_then(CoordinateMapper::new) else {
            return false;
        };

        let (target, patch) = match &self.state {
            Interaction::Idle => return false,
            Interaction::Dragging {
                target,
                pointer_start,
                origin,
            } => {
                let delta = mapper.screen_delta_to_logical(pointer - *pointer_start);
                let pos = mapper.clamp(*origin + delta);
                (target.clone(), position_patch(target, pos))
            }
            Interaction::Resizing {
                target,
                handle,
                pointer_start,
                start,
            } => {
                let screen_delta = pointer - *pointer_start;
                let patch = resize_patch(&mapper, *handle, *start, screen_delta);
                (target.clone(), patch)
            }
        };

        match scene.update_element(&target, patch) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(%err, "interaction target vanished");
                self.state = Interaction::Idle;
                false
            }
        }
    }

    /// End any drag or resize.
    pub fn pointer_up(&mut self) {
        if self.state != Interaction::Idle {
            tracing::debug!("interaction ended");
        }
        self.state = Interaction::Idle;
    }

    /// Toggle in-place editing for a text element or the quote. Returns whether editing is
    /// active afterwards.
    pub fn double_click(&mut self, scene: &mut Scene, target: &ElementRef) -> bool {
        if self.editing.as_ref().is_some_and(|e| &e.target == target) {
            self.commit(scene);
            return false;
        }
        if self.editing.is_some() {
            self.commit(scene);
        }

        let (buffer, multiline) = match target {
            ElementRef::Text(id) => match scene.text(id) {
                Some(t) => (t.text.clone(), false),
                None => return false,
            },
            ElementRef::Quote => match scene.quote() {
                Some(q) => (q.base.text.clone(), true),
                None => return false,
            },
            ElementRef::Shape(_) => return false,
        };
        if scene.select(Some(target.clone())).is_err() {
            return false;
        }
        self.state = Interaction::Idle;
        self.editing = Some(TextEditSession {
            target: target.clone(),
            buffer,
            multiline,
        });
        true
    }

    /// Replace the edit buffer. Returns `false` when not editing.
    pub fn edit_text(&mut self, text: impl Into<String>) -> bool {
        match &mut self.editing {
            Some(edit) => {
                edit.buffer = text.into();
                true
            }
            None => false,
        }
    }

    /// Handle a key while editing. Returns whether the edit was committed.
    pub fn key(&mut self, scene: &mut Scene, key: EditKey, ctrl: bool) -> bool {
        let Some(edit) = &self.editing else {
            return false;
        };
        let ends = match (key, edit.multiline) {
            (EditKey::Escape, _) => true,
            (EditKey::Enter, false) => !ctrl,
            (EditKey::Enter, true) => ctrl,
        };
        ends && self.commit(scene)
    }

    /// Focus left the editor: commit.
    pub fn blur(&mut self, scene: &mut Scene) -> bool {
        self.commit(scene)
    }

    fn commit(&mut self, scene: &mut Scene) -> bool {
        let Some(edit) = self.editing.take() else {
            return false;
        };
        self.state = Interaction::Idle;
        match scene.update_element(&edit.target, ElementPatch::Text(TextPatch::text(edit.buffer))) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(%err, "edited element vanished before commit");
                false
            }
        }
    }
}

fn element_position(scene: &Scene, target: &ElementRef) -> Option<Point> {
    match target {
        ElementRef::Text(id) => scene.text(id).map(|t| Point::new(t.x, t.y)),
        ElementRef::Quote => scene.quote().map(|q| Point::new(q.base.x, q.base.y)),
        ElementRef::Shape(id) => scene.shape(id).map(|s| Point::new(s.x, s.y)),
    }
}

fn resize_start(scene: &Scene, target: &ElementRef) -> Option<ResizeStart> {
    match target {
        ElementRef::Text(id) => scene.text(id).map(|t| ResizeStart::Font { size: t.font_size }),
        ElementRef::Quote => scene.quote().map(|q| match q.box_size() {
            Some((w, h)) if w > 0.0 && h > 0.0 => ResizeStart::QuoteBox {
                center: Point::new(q.base.x, q.base.y),
                size: Size::new(w, h),
                font_size: q.base.font_size,
            },
            _ => ResizeStart::Font {
                size: q.base.font_size,
            },
        }),
        ElementRef::Shape(id) => scene.shape(id).map(|s| ResizeStart::ShapeBox {
            center: Point::new(s.x, s.y),
            size: Size::new(s.width, s.height),
        }),
    }
}

fn position_patch(target: &ElementRef, p: Point) -> ElementPatch {
    match target {
        ElementRef::Shape(_) => ElementPatch::Shape(ShapePatch::position(p.x, p.y)),
        _ => ElementPatch::Text(TextPatch::position(p.x, p.y)),
    }
}

/// Font-size factor for `handle` moved by `screen_delta`.
///
/// The sign follows the dominant axis of the movement, oriented by the handle: moving a corner
/// away from the element grows the font, moving it inward shrinks it.
pub fn font_scale_factor(handle: Handle, screen_delta: Vec2) -> f64 {
    let distance = screen_delta.hypot();
    let (sx, sy) = handle.signs();
    let dominant = if screen_delta.x.abs() >= screen_delta.y.abs() {
        sx * screen_delta.x
    } else {
        sy * screen_delta.y
    };
    let sign = if dominant < 0.0 { -1.0 } else { 1.0 };
    1.0 + sign * distance * FONT_RESIZE_RATE
}

/// New center and size of a box resized by one corner, with the opposite corner fixed.
pub fn resize_box(
    center: Point,
    size: Size,
    handle: Handle,
    logical_delta: Vec2,
    min_extent: f64,
) -> (Point, Size) {
    let (sx, sy) = handle.signs();
    let width = (size.width + sx * logical_delta.x).max(min_extent);
    let height = (size.height + sy * logical_delta.y).max(min_extent);
    let anchor = Point::new(
        center.x - sx * size.width / 2.0,
        center.y - sy * size.height / 2.0,
    );
    let new_center = Point::new(anchor.x + sx * width / 2.0, anchor.y + sy * height / 2.0);
    (new_center, Size::new(width, height))
}

fn clamp_font(size: f64) -> f64 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

fn resize_patch(
    mapper: &CoordinateMapper,
    handle: Handle,
    start: ResizeStart,
    screen_delta: Vec2,
) -> ElementPatch {
    match start {
        ResizeStart::Font { size } => {
            let font_size = clamp_font(size * font_scale_factor(handle, screen_delta));
            ElementPatch::Text(TextPatch::font_size(font_size))
        }
        ResizeStart::QuoteBox {
            center,
            size,
            font_size,
        } => {
            let delta = mapper.screen_delta_to_logical(screen_delta);
            let (c, s) = resize_box(center, size, handle, delta, MIN_QUOTE_BOX);
            let c = mapper.clamp(c);
            let ratio = (s.width / size.width).min(s.height / size.height);
            ElementPatch::Quote(QuotePatch {
                base: TextPatch {
                    x: Some(c.x),
                    y: Some(c.y),
                    font_size: Some(clamp_font(font_size * ratio)),
                    ..TextPatch::default()
                },
                width: Some(s.width),
                height: Some(s.height),
                ..QuotePatch::default()
            })
        }
        ResizeStart::ShapeBox { center, size } => {
            let delta = mapper.screen_delta_to_logical(screen_delta);
            let (c, s) = resize_box(center, size, handle, delta, MIN_SHAPE_EXTENT);
            let c = mapper.clamp(c);
            ElementPatch::Shape(ShapePatch {
                x: Some(c.x),
                y: Some(c.y),
                width: Some(s.width),
                height: Some(s.height),
                ..ShapePatch::default()
            })
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/controller.rs"]
mod tests;
