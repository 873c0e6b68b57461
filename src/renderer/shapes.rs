//! Shape generation for 2D primitives
//!
//! Everything becomes a triangle list in pixel space; the pipeline maps it
//! to clip space.

use glam::Vec2;
use std::f32::consts::PI;

use super::draw::{DrawCmd, DrawList};
use super::vertex::Vertex;

/// Segments used for circles and ellipses
pub const ROUND_SEGMENTS: u32 = 32;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Generate vertices for a filled ellipse with the given half-axes
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for an axis-aligned rectangle (two triangles)
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Tessellate a frame's draw list
///
/// `Clear` commands produce no geometry; the backend uses the last clear
/// color for the render pass.
pub fn tessellate(list: &DrawList) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for cmd in list.commands() {
        match *cmd {
            DrawCmd::Clear(_) => {}
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => vertices.extend(circle(center, radius, color, ROUND_SEGMENTS)),
            DrawCmd::Rect { min, size, color } => {
                if size.x > 0.0 && size.y > 0.0 {
                    vertices.extend(rect(min, size, color));
                }
            }
            DrawCmd::Ellipse {
                center,
                size,
                color,
            } => vertices.extend(ellipse(center, size * 0.5, color, ROUND_SEGMENTS)),
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_circle_vertices_on_radius() {
        let center = Vec2::new(10.0, 20.0);
        let verts = circle(center, 5.0, RED, 16);
        assert_eq!(verts.len(), 16 * 3);
        for (i, v) in verts.iter().enumerate() {
            let d = (Vec2::from(v.position) - center).length();
            if i % 3 == 0 {
                assert!(d < 1e-4);
            } else {
                assert!((d - 5.0).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_rect_covers_corners() {
        let verts = rect(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), RED);
        assert_eq!(verts.len(), 6);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 1.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 4.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 2.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 6.0);
    }

    #[test]
    fn test_ellipse_uses_half_size() {
        let mut list = DrawList::new();
        list.ellipse(Vec2::ZERO, Vec2::new(100.0, 40.0), RED);
        let verts = tessellate(&list);
        let max_x = verts.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let max_y = verts.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!((max_x - 50.0).abs() < 1e-3);
        assert!(max_y <= 20.0 + 1e-3);
    }

    #[test]
    fn test_tessellate_skips_clear_and_empty() {
        let mut list = DrawList::new();
        list.clear(RED);
        list.rect(0.0, 0.0, 0.0, 10.0, RED);
        list.rect(0.0, 0.0, 10.0, 10.0, RED);
        list.circle(Vec2::ZERO, 3.0, RED);
        let verts = tessellate(&list);
        assert_eq!(verts.len(), 6 + ROUND_SEGMENTS as usize * 3);
        assert_eq!(list.clear_color(), Some(RED));
    }
}
