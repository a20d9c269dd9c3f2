use crate::foundation::core::{Canvas, Point, Size, Vec2};

/// Maps between the on-screen container and the fixed logical canvas.
///
/// Absolute positions go logical → screen through `scale_x`/`scale_y`. Pointer movement goes
/// the other way as a *delta*, multiplied by the inverse scale, so drags never depend on where
/// the container sits on the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    container: Size,
    canvas: Canvas,
}

impl CoordinateMapper {
    /// `None` when the container has no usable size (not laid out yet).
    pub fn new(container: Size) -> Option<Self> {
        Self::with_canvas(container, Canvas::LOGICAL)
    }

    pub fn with_canvas(container: Size, canvas: Canvas) -> Option<Self> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !usable(container.width)
            || !usable(container.height)
            || canvas.width == 0
            || canvas.height == 0
        {
            return None;
        }
        Some(Self { container, canvas })
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn scale_x(&self) -> f64 {
        self.container.width / f64::from(self.canvas.width)
    }

    pub fn scale_y(&self) -> f64 {
        self.container.height / f64::from(self.canvas.height)
    }

    /// Uniform factor for font sizes and stroke widths.
    pub fn font_scale(&self) -> f64 {
        self.scale_x().min(self.scale_y())
    }

    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale_x(), p.y * self.scale_y())
    }

    /// Inverse of [`CoordinateMapper::to_screen`], for absolute points such as hit tests.
    pub fn to_logical(&self, p: Point) -> Point {
        Point::new(p.x / self.scale_x(), p.y / self.scale_y())
    }

    pub fn screen_delta_to_logical(&self, d: Vec2) -> Vec2 {
        Vec2::new(
            d.x * (f64::from(self.canvas.width) / self.container.width),
            d.y * (f64::from(self.canvas.height) / self.container.height),
        )
    }

    pub fn scale_length(&self, len: f64) -> f64 {
        len * self.font_scale()
    }

    /// Clamp a logical position into the canvas.
    pub fn clamp(&self, p: Point) -> Point {
        self.canvas.clamp_point(p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/mapper.rs"]
mod tests;
