//! Frame timing
//!
//! Host frames arrive at whatever rate the display runs; the simulation
//! advances in fixed `SIM_DT` ticks.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Accumulates frame time into fixed simulation steps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's delta and return how many ticks to run
    ///
    /// Deltas are clamped to `MAX_FRAME_DT`; at most `MAX_SUBSTEPS` ticks run
    /// per frame and leftover time beyond that is dropped.
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += dt;

        let mut substeps = 0;
        // Tolerance so 1/60 s frames do not drift into skipped ticks
        while self.accumulator >= SIM_DT - 1e-6 && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        self.accumulator = self.accumulator.max(0.0);
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Frames-per-second over a sliding window of 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame timestamp (milliseconds)
    pub fn record(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the one we will overwrite next
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                let intervals = (self.frame_times.len() - 1) as f64;
                self.fps = (intervals * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_tick_per_sim_frame() {
        let mut clock = FrameClock::new();
        for _ in 0..600 {
            assert_eq!(clock.advance(SIM_DT), 1);
        }
    }

    #[test]
    fn test_half_frames_alternate() {
        let mut clock = FrameClock::new();
        let ticks: u32 = (0..100).map(|_| clock.advance(SIM_DT / 2.0)).sum();
        assert!((49..=50).contains(&ticks));
    }

    #[test]
    fn test_long_frame_is_bounded() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(5.0), MAX_SUBSTEPS);
        // Leftover time does not snowball
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(f32::INFINITY), 0);
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::new();
        let mut t = 1000.0;
        for _ in 0..120 {
            fps.record(t);
            t += 1000.0 / 60.0;
        }
        assert_eq!(fps.fps(), 60);
    }
}
