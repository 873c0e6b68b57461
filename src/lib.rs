//! Gravity Flap - a small side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, pipes, scoring)
//! - `renderer`: Draw lists and the WebGPU pipeline that consumes them
//! - `platform`: Host contract, input edges, frame clock, storage, headless host
//! - `game`: The game wired to the host contract
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::FlappyGame;
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (physics formulas are per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame delta the clock accepts (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Window
    pub const WINDOW_TITLE: &str = "Gravity";
    pub const WINDOW_WIDTH: f32 = 400.0;
    pub const WINDOW_HEIGHT: f32 = 400.0;

    /// Bird defaults
    pub const BIRD_RADIUS: f32 = 25.0;
    /// Units of speed gained per second (gravity)
    pub const BIRD_SPEED: f32 = 10.0;
    pub const BIRD_FRICTION: f32 = 0.7;
    pub const JUMP_VELOCITY: f32 = -5.0;

    /// Pipe ring
    pub const PIPE_CAPACITY: usize = 5;
    pub const PIPE_WIDTH: f32 = 75.0;
    pub const PIPE_GAP: f32 = 150.0;
    /// Pixels per tick
    pub const PIPE_SCROLL_SPEED: f32 = 2.0;
    pub const PIPE_SPACING: f32 = 175.0;
    /// Keeps spacing stable: CAPACITY * SPACING == WIDTH + WINDOW_WIDTH + OFFSET
    pub const PIPE_RESPAWN_OFFSET: f32 = 400.0;
    pub const PIPE_TOP_MIN: f32 = 50.0;
    pub const PIPE_TOP_MAX: f32 = 200.0;

    /// Cloud ring (decorative)
    pub const CLOUD_CAPACITY: usize = 3;
    pub const CLOUD_SPACING: f32 = 160.0;
    pub const CLOUD_RESPAWN_OFFSET: f32 = 60.0;
    pub const CLOUD_SPEED_MIN: f32 = 0.4;
    pub const CLOUD_SPEED_MAX: f32 = 1.2;
    pub const CLOUD_WIDTH_MIN: f32 = 60.0;
    pub const CLOUD_WIDTH_MAX: f32 = 120.0;
    pub const CLOUD_HEIGHT_MIN: f32 = 24.0;
    pub const CLOUD_HEIGHT_MAX: f32 = 48.0;
    pub const CLOUD_Y_MIN: f32 = 20.0;
    pub const CLOUD_Y_MAX: f32 = 140.0;

    /// Number of bird colors the color key cycles through
    pub const PALETTE_LEN: usize = 5;
}
