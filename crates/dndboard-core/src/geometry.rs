#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// An absolute on-screen bounding box, as reported by the presentation layer.
///
/// Coordinates are logical pixels with the origin at the top-left of the
/// container. Hit tests use open intervals: a point lying exactly on an edge
/// is outside.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if `x` lies strictly between the left and right edges.
    #[inline]
    pub fn spans_x(&self, x: f32) -> bool {
        x > self.x && x < self.right()
    }

    /// Check if `y` lies strictly between the top and bottom edges.
    #[inline]
    pub fn spans_y(&self, y: f32) -> bool {
        y > self.y && y < self.bottom()
    }

    /// Check if a point is strictly inside the rectangle.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.spans_x(x) && self.spans_y(y)
    }

    /// Grow the rectangle by `amount` above and below, keeping its width.
    #[inline]
    pub fn expand_vertical(&self, amount: f32) -> Rect {
        Rect {
            x: self.x,
            y: self.y - amount,
            width: self.width,
            height: self.height + amount * 2.0,
        }
    }

    /// Shift the rectangle by the given offsets.
    #[inline]
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width,
            height: self.height,
        }
    }
}
