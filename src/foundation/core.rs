pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Logical canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 1080;
/// Logical canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 1920;

/// Pixel dimensions of a render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// The fixed 9:16 logical canvas every element coordinate is expressed in.
    pub const LOGICAL: Canvas = Canvas {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
    };

    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn bounds(self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size())
    }

    pub fn center(self) -> Point {
        self.bounds().center()
    }

    /// Clamp a logical point into `[0, width] x [0, height]`.
    pub fn clamp_point(self, p: Point) -> Point {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        Point::new(clamp_finite(p.x, 0.0, w), clamp_finite(p.y, 0.0, h))
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::LOGICAL
    }
}

fn clamp_finite(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
