//! Game state and core simulation types
//!
//! Everything a run needs to be replayed lives here: the bird, the fixed
//! pipe and cloud rings, the score keeper and the seeded RNG.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::{CLOUD_CAPACITY, PALETTE_LEN, PIPE_CAPACITY};
use crate::tuning::Tuning;

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Jump impulse applied
    Jumped,
    /// Bird color advanced to a new palette index
    ColorCycled { index: usize },
    /// Bird hit the floor; `impact` is the vertical speed at contact
    Bounced { impact: f32 },
    /// A pipe slot was overwritten with a fresh pipe
    PipeRecycled { slot: usize, id: u32 },
    /// Bird got past a pipe
    Scored { score: u32, pipe_id: u32 },
    /// Bird touched a pipe; `score` is the run score that was lost
    Crashed { score: u32, pipe_id: u32 },
}

/// The player's bird
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Units of speed gained per second (gravity)
    pub speed: f32,
    /// Fraction of vertical speed kept after a floor bounce
    pub friction: f32,
}

impl Bird {
    /// Bird at the top center of the window, at rest
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.window_width / 2.0, tuning.bird_radius),
            vel: Vec2::ZERO,
            radius: tuning.bird_radius,
            speed: tuning.bird_speed,
            friction: tuning.bird_friction,
        }
    }
}

/// A vertically gapped obstacle pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Spawn serial; newer pipes have larger ids
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Height of the top segment (the gap starts here)
    pub top_height: f32,
}

impl Pipe {
    pub fn new(id: u32, x: f32, top_height: f32) -> Self {
        Self { id, x, top_height }
    }

    /// Construct a pipe with a random gap height from the tuning range
    pub fn spawn<R: Rng>(id: u32, x: f32, tuning: &Tuning, rng: &mut R) -> Self {
        let top_height = rng.random_range(tuning.pipe_top_min..=tuning.pipe_top_max);
        Self::new(id, x, top_height)
    }

    /// Right edge
    #[inline]
    pub fn trailing_edge(&self, width: f32) -> f32 {
        self.x + width
    }

    /// True once the trailing edge has passed the left boundary
    #[inline]
    pub fn is_off_screen(&self, width: f32) -> bool {
        self.trailing_edge(width) < 0.0
    }

    /// Vertical middle of the gap
    #[inline]
    pub fn gap_center(&self, gap: f32) -> f32 {
        self.top_height + gap / 2.0
    }

    pub fn top_rect(&self, tuning: &Tuning) -> Rect {
        Rect::new(self.x, 0.0, tuning.pipe_width, self.top_height)
    }

    pub fn bottom_rect(&self, tuning: &Tuning) -> Rect {
        let y = self.top_height + tuning.pipe_gap;
        Rect::new(self.x, y, tuning.pipe_width, tuning.window_height - y)
    }
}

/// Fixed pool of pipes, recycled in place
///
/// `cursor` names the slot holding the oldest pipe, which is the next one
/// to leave the screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipeRing {
    slots: [Pipe; PIPE_CAPACITY],
    cursor: usize,
}

impl PipeRing {
    pub fn new(slots: [Pipe; PIPE_CAPACITY]) -> Self {
        Self { slots, cursor: 0 }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        PIPE_CAPACITY
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn get(&self, slot: usize) -> &Pipe {
        &self.slots[slot]
    }

    pub fn get_mut(&mut self, slot: usize) -> &mut Pipe {
        &mut self.slots[slot]
    }

    /// Pipes in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        self.slots.iter()
    }

    /// Pipes from oldest to newest, starting at the cursor
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &Pipe> {
        (0..PIPE_CAPACITY).map(move |k| &self.slots[(self.cursor + k) % PIPE_CAPACITY])
    }

    /// The `k`-th pipe counting from the oldest
    pub fn oldest(&self, k: usize) -> &Pipe {
        &self.slots[(self.cursor + k) % PIPE_CAPACITY]
    }

    /// The oldest pipe (next to be recycled)
    pub fn leading(&self) -> &Pipe {
        &self.slots[self.cursor]
    }

    /// Overwrite a slot with a new pipe; the cursor moves past it
    pub fn recycle(&mut self, slot: usize, pipe: Pipe) {
        self.slots[slot] = pipe;
        self.cursor = (slot + 1) % PIPE_CAPACITY;
    }
}

/// A decorative cloud (no collision, no scoring)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    /// Ellipse center
    pub pos: Vec2,
    /// Pixels per tick
    pub speed: f32,
    /// Ellipse width and height
    pub size: Vec2,
}

impl Cloud {
    /// Construct a cloud with random height, speed and size
    pub fn spawn<R: Rng>(x: f32, tuning: &Tuning, rng: &mut R) -> Self {
        let y = rng.random_range(tuning.cloud_y_min..=tuning.cloud_y_max);
        let speed = rng.random_range(tuning.cloud_speed_min..=tuning.cloud_speed_max);
        let w = rng.random_range(tuning.cloud_width_min..=tuning.cloud_width_max);
        let h = rng.random_range(tuning.cloud_height_min..=tuning.cloud_height_max);
        Self {
            pos: Vec2::new(x, y),
            speed,
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x / 2.0 < 0.0
    }
}

/// Fixed pool of clouds, recycled like pipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudRing {
    slots: [Cloud; CLOUD_CAPACITY],
    cursor: usize,
}

impl CloudRing {
    pub fn new(slots: [Cloud; CLOUD_CAPACITY]) -> Self {
        Self { slots, cursor: 0 }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        CLOUD_CAPACITY
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn get(&self, slot: usize) -> &Cloud {
        &self.slots[slot]
    }

    pub fn get_mut(&mut self, slot: usize) -> &mut Cloud {
        &mut self.slots[slot]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cloud> {
        self.slots.iter()
    }

    pub fn recycle(&mut self, slot: usize, cloud: Cloud) {
        self.slots[slot] = cloud;
        self.cursor = (slot + 1) % CLOUD_CAPACITY;
    }
}

/// Score counter with edge-trigger guards
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreKeeper {
    pub score: u32,
    /// Best score seen this session
    pub best: u32,
    /// Id of the last pipe scored
    pub last_scored: Option<u32>,
    /// Ids of the live pipes the bird crashed into, oldest first
    pub crashed: Vec<u32>,
}

impl ScoreKeeper {
    /// Count a pass of `pipe_id` unless it (or a newer pipe) already scored
    /// or the bird crashed into it
    pub fn try_score(&mut self, pipe_id: u32) -> bool {
        let passed = self.last_scored.is_some_and(|last| pipe_id <= last);
        if passed || self.crashed.contains(&pipe_id) {
            return false;
        }
        self.score += 1;
        self.best = self.best.max(self.score);
        self.last_scored = Some(pipe_id);
        true
    }

    /// Register a crash into `pipe_id`; returns the score that was lost
    ///
    /// Only the crashed pipe loses the right to score; older pipes the bird
    /// is still passing can score afterwards.
    pub fn try_crash(&mut self, pipe_id: u32) -> Option<u32> {
        if self.crashed.contains(&pipe_id) {
            return None;
        }
        // Only ids still in the ring matter
        if self.crashed.len() == PIPE_CAPACITY {
            self.crashed.remove(0);
        }
        self.crashed.push(pipe_id);
        Some(std::mem::take(&mut self.score))
    }
}

/// RNG state wrapper for serialization
///
/// Each spawn draws from its own stream, so the state stays a pair of
/// integers and replays exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Generator for the next spawn
    pub fn next_rng(&mut self) -> Pcg32 {
        let mixed = self
            .seed
            .wrapping_add(self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.stream += 1;
        Pcg32::seed_from_u64(mixed)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub tuning: Tuning,
    pub bird: Bird,
    pub pipes: PipeRing,
    pub clouds: CloudRing,
    pub score: ScoreKeeper,
    /// Index into the bird palette
    pub color_index: usize,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next pipe id
    next_id: u32,
}

impl GameState {
    /// Create a new game state with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// State for a run with `tuning`
    ///
    /// `tuning` must pass `Tuning::validate`; inverted spawn ranges panic on
    /// the first spawn.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng_state = RngState::new(seed);
        let mut next_id = 1;

        let pipes = std::array::from_fn(|i| {
            let x = tuning.window_width + i as f32 * tuning.pipe_spacing;
            let pipe = Pipe::spawn(next_id, x, &tuning, &mut rng_state.next_rng());
            next_id += 1;
            pipe
        });
        let clouds = std::array::from_fn(|i| {
            let x = tuning.window_width * 0.25 + i as f32 * tuning.cloud_spacing;
            Cloud::spawn(x, &tuning, &mut rng_state.next_rng())
        });

        Self {
            seed,
            rng_state,
            bird: Bird::new(&tuning),
            pipes: PipeRing::new(pipes),
            clouds: CloudRing::new(clouds),
            tuning,
            score: ScoreKeeper::default(),
            color_index: 0,
            time_ticks: 0,
            events: Vec::new(),
            next_id,
        }
    }

    /// Allocate a new pipe id
    pub fn next_pipe_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Build a fresh pipe at `x` with a new id and height
    pub fn spawn_pipe(&mut self, x: f32) -> Pipe {
        let id = self.next_pipe_id();
        let mut rng = self.rng_state.next_rng();
        Pipe::spawn(id, x, &self.tuning, &mut rng)
    }

    /// Build a fresh cloud at `x`
    pub fn spawn_cloud(&mut self, x: f32) -> Cloud {
        let mut rng = self.rng_state.next_rng();
        Cloud::spawn(x, &self.tuning, &mut rng)
    }

    /// Advance the bird color, wrapping at the palette length
    pub fn cycle_color(&mut self) -> usize {
        self.color_index = (self.color_index + 1) % PALETTE_LEN;
        self.color_index
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let state = GameState::new(7);
        let t = &state.tuning;
        assert_eq!(state.bird.pos, Vec2::new(t.window_width / 2.0, t.bird_radius));
        assert_eq!(state.bird.vel, Vec2::ZERO);
        assert_eq!(state.pipes.len(), PIPE_CAPACITY);
        for (i, pipe) in state.pipes.iter().enumerate() {
            assert_eq!(pipe.id, i as u32 + 1);
            assert_eq!(pipe.x, t.window_width + i as f32 * t.pipe_spacing);
            assert!(pipe.top_height >= t.pipe_top_min && pipe.top_height <= t.pipe_top_max);
        }
        assert_eq!(state.pipes.cursor(), 0);
    }

    #[test]
    fn test_pipe_segments() {
        let tuning = Tuning::default();
        let pipe = Pipe::new(1, 275.0, 100.0);
        let top = pipe.top_rect(&tuning);
        let bottom = pipe.bottom_rect(&tuning);
        assert_eq!(top, Rect::new(275.0, 0.0, 75.0, 100.0));
        assert_eq!(bottom, Rect::new(275.0, 250.0, 75.0, 150.0));
        assert_eq!(pipe.gap_center(tuning.pipe_gap), 175.0);
    }

    #[test]
    fn test_ring_recycle_moves_cursor() {
        let mut state = GameState::new(1);
        let pipe = state.spawn_pipe(800.0);
        state.pipes.recycle(0, pipe);
        assert_eq!(state.pipes.cursor(), 1);
        assert_eq!(state.pipes.leading().id, 2);
        let newest = state.pipes.iter_oldest_first().last().map(|p| p.id);
        assert_eq!(newest, Some(pipe.id));

        let pipe = state.spawn_pipe(800.0);
        state.pipes.recycle(PIPE_CAPACITY - 1, pipe);
        assert_eq!(state.pipes.cursor(), 0);
    }

    #[test]
    fn test_pipe_ids_are_monotonic() {
        let mut state = GameState::new(3);
        let a = state.spawn_pipe(0.0).id;
        let b = state.spawn_pipe(0.0).id;
        assert!(b > a);
        assert!(a > PIPE_CAPACITY as u32);
    }

    #[test]
    fn test_score_keeper_guards() {
        let mut keeper = ScoreKeeper::default();
        assert!(keeper.try_score(3));
        assert!(!keeper.try_score(3));
        assert!(!keeper.try_score(2));
        assert!(keeper.try_score(4));
        assert_eq!(keeper.score, 2);
        assert_eq!(keeper.best, 2);

        assert_eq!(keeper.try_crash(5), Some(2));
        assert_eq!(keeper.try_crash(5), None);
        assert_eq!(keeper.score, 0);
        assert_eq!(keeper.best, 2);
        // Crashed pipe cannot score afterwards
        assert!(!keeper.try_score(5));
        assert!(keeper.try_score(6));
    }

    #[test]
    fn test_crash_leaves_older_pipes_scorable() {
        let mut keeper = ScoreKeeper::default();
        assert!(keeper.try_score(1));
        assert_eq!(keeper.try_crash(3), Some(1));
        // Pipe 2 was still being passed when pipe 3 was hit
        assert!(keeper.try_score(2));
        assert_eq!(keeper.score, 1);
        assert!(!keeper.try_score(3));
        assert!(keeper.try_score(4));
    }

    #[test]
    fn test_crash_memory_is_bounded() {
        let mut keeper = ScoreKeeper::default();
        for id in 1..=20 {
            keeper.try_crash(id);
        }
        assert_eq!(keeper.crashed.len(), PIPE_CAPACITY);
        assert_eq!(keeper.crashed.first(), Some(&(20 - PIPE_CAPACITY as u32 + 1)));
        assert_eq!(keeper.try_crash(20), None);
    }

    #[test]
    fn test_cycle_color_wraps() {
        let mut state = GameState::new(0);
        for i in 1..=PALETTE_LEN {
            assert_eq!(state.cycle_color(), i % PALETTE_LEN);
        }
        assert_eq!(state.color_index, 0);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(42);
        let b = GameState::new(42);
        let c = GameState::new(43);
        let heights = |s: &GameState| s.pipes.iter().map(|p| p.top_height).collect::<Vec<_>>();
        assert_eq!(heights(&a), heights(&b));
        assert_ne!(heights(&a), heights(&c));
    }

    #[test]
    fn test_state_json_round_trip_keeps_rng() {
        let mut state = GameState::new(11);
        state.spawn_pipe(0.0);
        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.rng_state.stream, state.rng_state.stream);
        assert_eq!(state.spawn_pipe(0.0), restored.spawn_pipe(0.0));
    }
}
