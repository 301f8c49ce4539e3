//! Geometry helpers and numeric conversions shared by the simulator.

pub mod safe_cast;

use serde::Serialize;

/// Axis-aligned rectangle in screen space (`y` grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the interiors overlap; rectangles that only touch do not intersect
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }

    /// Snap to whole pixels the way a renderer would place the sprite
    #[must_use]
    pub fn to_pixels(&self) -> Rect {
        Rect::new(self.x.trunc(), self.y.trunc(), self.width.trunc(), self.height.trunc())
    }
}
