//! Geometric primitives for the grid editor.
//!
//! Coordinates are scene pixels, y growing downwards, matching the layout
//! layer that positions timetable blocks.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D vector in scene pixels.
pub type Vec2 = DVec2;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its top-left corner and size.
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min.x, min.y, size.x, size.y)
    }

    /// Minimum corner (top-left).
    #[inline]
    pub fn min(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Size as a vector.
    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Center point.
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Top edge.
    #[inline]
    pub fn top(self) -> f64 {
        self.y
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    /// Left edge.
    #[inline]
    pub fn left(self) -> f64 {
        self.x
    }

    /// Right edge.
    #[inline]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Convert a scene point into coordinates relative to the top-left corner.
    #[inline]
    pub fn to_local(self, point: Vec2) -> Vec2 {
        point - self.min()
    }
}
