//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Fixed-size pools, recycled in place
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use collision::{circle_floor_collision, circle_rect_collision};
pub use rect::Rect;
pub use state::{
    Bird, Cloud, CloudRing, GameEvent, GameState, Pipe, PipeRing, RngState, ScoreKeeper,
};
pub use tick::{TickInput, tick};
