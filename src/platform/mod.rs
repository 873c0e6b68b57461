//! Platform abstraction layer
//!
//! The host owns the window, the clock and the keyboard; the game sees them
//! only through the `Game` callbacks:
//! - `setup` once, with the window size
//! - `update` every frame, with frame time and key edges, filling a draw list

pub mod headless;
pub mod input;
pub mod storage;
pub mod time;

pub use headless::{HeadlessConfig, HeadlessHost, InputScript, RunSummary};
pub use input::{Key, KeyEdges, KeyboardState};
pub use storage::{StorageError, Store};
pub use time::{FpsCounter, FrameClock};

use crate::renderer::DrawList;

/// What the host tells the game once, before the first frame
#[derive(Debug, Clone, PartialEq)]
pub struct HostInfo {
    pub title: String,
    pub width: f32,
    pub height: f32,
    /// Seed for the first run
    pub seed: u64,
}

/// Per-frame host data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Seconds since the previous frame
    pub dt: f32,
    pub width: f32,
    pub height: f32,
    /// Keys pressed since the previous frame
    pub keys: KeyEdges,
    /// Wall clock in milliseconds since the Unix epoch
    pub time_ms: f64,
}

/// Callback contract between a host loop and a game
pub trait Game {
    /// Called once before the first frame
    fn setup(&mut self, host: &HostInfo);

    /// Called every frame; draw calls go into `draw`
    fn update(&mut self, frame: &Frame, draw: &mut DrawList);
}
