//! Axis-aligned rectangle geometry for pipe segments
//!
//! Screen space: origin top-left, y grows downward. A rectangle is its
//! top-left corner plus a non-negative size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height (never negative)
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width.max(0.0), height.max(0.0)),
        }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Closest point on or inside the rectangle to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max())
    }
}
