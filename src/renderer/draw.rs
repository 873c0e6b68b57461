//! Draw calls issued by the game each frame
//!
//! Pixel space, origin at the top-left corner, y down. The list is rebuilt
//! every frame and handed to whatever backend the host has.

use glam::Vec2;

/// RGBA, components in [0, 1]
pub type Color = [f32; 4];

/// A single drawing primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole window
    Clear(Color),
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Axis-aligned rectangle from its top-left corner
    Rect {
        min: Vec2,
        size: Vec2,
        color: Color,
    },
    /// Axis-aligned ellipse; `size` is the full width and height
    Ellipse {
        center: Vec2,
        size: Vec2,
        color: Color,
    },
}

/// Ordered draw calls for one frame
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all commands, keeping the allocation
    pub fn reset(&mut self) {
        self.cmds.clear();
    }

    pub fn clear(&mut self, color: Color) {
        self.cmds.push(DrawCmd::Clear(color));
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.cmds.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.cmds.push(DrawCmd::Rect {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
            color,
        });
    }

    pub fn ellipse(&mut self, center: Vec2, size: Vec2, color: Color) {
        self.cmds.push(DrawCmd::Ellipse {
            center,
            size,
            color,
        });
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Color of the last `Clear`, if any
    pub fn clear_color(&self) -> Option<Color> {
        self.cmds.iter().rev().find_map(|cmd| match cmd {
            DrawCmd::Clear(color) => Some(*color),
            _ => None,
        })
    }
}
