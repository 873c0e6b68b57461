//! Collision detection between the bird and the world
//!
//! The bird is a circle; pipe segments are axis-aligned rectangles and the
//! floor is a horizontal line at the window's bottom edge.

use glam::Vec2;

use super::rect::Rect;

/// Check overlap between a circle and a rectangle
///
/// Touching edges count as a hit, and so does a center inside the rectangle.
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Rect) -> bool {
    if rect.is_empty() {
        return false;
    }
    let closest = rect.closest_point(center);
    (center - closest).length_squared() <= radius * radius
}

/// Check if the circle touches or passes the floor line
pub fn circle_floor_collision(center: Vec2, radius: f32, floor_y: f32) -> bool {
    center.y + radius >= floor_y
}
