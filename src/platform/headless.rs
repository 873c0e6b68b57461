//! Windowless host
//!
//! Drives a `Game` for a fixed number of frames at a fixed delta. Used by the
//! native binary and by tests; scripted key presses stand in for a keyboard.

use std::collections::BTreeMap;

use super::input::{Key, KeyEdges};
use super::{Frame, Game, HostInfo};
use crate::consts::{SIM_DT, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
use crate::renderer::DrawList;

/// Number of frames to run
pub const FRAMES_ENV: &str = "GRAVITY_FLAP_FRAMES";
/// Seed for the run
pub const SEED_ENV: &str = "GRAVITY_FLAP_SEED";

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessConfig {
    pub frames: u64,
    /// Seconds per frame
    pub dt: f32,
    pub seed: u64,
    pub width: f32,
    pub height: f32,
    /// Timestamp of frame 0 in milliseconds
    pub start_ms: f64,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            frames: 60 * 60,
            dt: SIM_DT,
            seed: 0,
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            start_ms: 0.0,
        }
    }
}

impl HeadlessConfig {
    /// Defaults overridden by `GRAVITY_FLAP_FRAMES` and `GRAVITY_FLAP_SEED`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like `from_env`, reading variables through `lookup`
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(FRAMES_ENV) {
            match raw.trim().parse() {
                Ok(frames) => config.frames = frames,
                Err(e) => log::warn!("Ignoring {}={:?}: {}", FRAMES_ENV, raw, e),
            }
        }
        if let Some(raw) = lookup(SEED_ENV) {
            match raw.trim().parse() {
                Ok(seed) => config.seed = seed,
                Err(e) => log::warn!("Ignoring {}={:?}: {}", SEED_ENV, raw, e),
            }
        }

        config
    }
}

/// Key presses keyed by frame number
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    presses: BTreeMap<u64, KeyEdges>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press `key` at the start of `frame`
    pub fn press(mut self, frame: u64, key: Key) -> Self {
        self.presses.entry(frame).or_default().insert(key);
        self
    }

    pub fn keys_at(&self, frame: u64) -> KeyEdges {
        self.presses.get(&frame).copied().unwrap_or_default()
    }
}

/// What a headless run produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    /// Draw commands over all frames
    pub draw_commands: usize,
    /// Draw commands in the final frame
    pub last_frame_commands: usize,
    /// Simulated seconds
    pub elapsed: f64,
}

pub struct HeadlessHost {
    config: HeadlessConfig,
    script: InputScript,
}

impl HeadlessHost {
    pub fn new(config: HeadlessConfig) -> Self {
        Self {
            config,
            script: InputScript::new(),
        }
    }

    pub fn with_script(mut self, script: InputScript) -> Self {
        self.script = script;
        self
    }

    pub fn config(&self) -> &HeadlessConfig {
        &self.config
    }

    /// Set the game up and run every configured frame
    pub fn run<G: Game>(&self, game: &mut G) -> RunSummary {
        let config = &self.config;
        game.setup(&HostInfo {
            title: WINDOW_TITLE.to_string(),
            width: config.width,
            height: config.height,
            seed: config.seed,
        });

        let mut draw = DrawList::new();
        let mut summary = RunSummary::default();

        for n in 0..config.frames {
            let frame = Frame {
                dt: config.dt,
                width: config.width,
                height: config.height,
                keys: self.script.keys_at(n),
                time_ms: config.start_ms + n as f64 * config.dt as f64 * 1000.0,
            };
            game.update(&frame, &mut draw);

            summary.frames += 1;
            summary.draw_commands += draw.len();
            summary.last_frame_commands = draw.len();
            summary.elapsed += config.dt as f64;
        }

        log::debug!("Headless run: {:?}", summary);
        summary
    }
}
