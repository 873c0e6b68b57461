//! The game behind the host contract
//!
//! `FlappyGame` owns the simulation and the player's preferences. Hosts call
//! `update` once per frame; persistence stays with the host, which asks
//! whether settings or high scores changed.

use crate::consts::SIM_DT;
use crate::highscores::HighScores;
use crate::platform::{Frame, FrameClock, Game, HostInfo, Key, KeyEdges};
use crate::renderer::{DrawList, draw_scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, autopilot_input, tick};
use crate::tuning::{Tuning, TuningError};

pub struct FlappyGame {
    state: GameState,
    tuning: Tuning,
    settings: Settings,
    high_scores: HighScores,
    clock: FrameClock,
    autopilot: bool,
    /// Edges not yet consumed by a tick
    pending: KeyEdges,
    /// Tick at which the current run started
    run_start_tick: u64,
    runs_finished: u32,
    settings_changed: bool,
    high_scores_changed: bool,
    /// Events from the last `update`, in tick order
    frame_events: Vec<GameEvent>,
}

impl Default for FlappyGame {
    fn default() -> Self {
        Self::new()
    }
}

impl FlappyGame {
    pub fn new() -> Self {
        Self::from_valid_tuning(Tuning::default())
    }

    /// Game with custom balance; rejects tuning the simulation cannot run
    pub fn with_tuning(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::from_valid_tuning(tuning))
    }

    fn from_valid_tuning(tuning: Tuning) -> Self {
        Self {
            state: GameState::with_tuning(0, tuning.clone()),
            tuning,
            settings: Settings::default(),
            high_scores: HighScores::new(),
            clock: FrameClock::new(),
            autopilot: false,
            pending: KeyEdges::none(),
            run_start_tick: 0,
            runs_finished: 0,
            settings_changed: false,
            high_scores_changed: false,
            frame_events: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.state.color_index = settings.bird_color_index();
        self.settings = settings;
        self
    }

    pub fn with_high_scores(mut self, high_scores: HighScores) -> Self {
        self.high_scores = high_scores;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings; marks them for saving
    pub fn settings_mut(&mut self) -> &mut Settings {
        self.settings_changed = true;
        &mut self.settings
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn score(&self) -> u32 {
        self.state.score.score
    }

    /// Best score this session or on record
    pub fn best(&self) -> u32 {
        self.state
            .score
            .best
            .max(self.high_scores.top_score().unwrap_or(0))
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, on: bool) {
        if self.autopilot != on {
            log::info!("Autopilot: {}", if on { "on" } else { "off" });
        }
        self.autopilot = on;
    }

    pub fn runs_finished(&self) -> u32 {
        self.runs_finished
    }

    /// Events produced during the last `update`
    pub fn frame_events(&self) -> &[GameEvent] {
        &self.frame_events
    }

    /// True once after settings changed
    pub fn take_settings_changed(&mut self) -> bool {
        std::mem::take(&mut self.settings_changed)
    }

    /// True once after a run entered the high score table
    pub fn take_high_scores_changed(&mut self) -> bool {
        std::mem::take(&mut self.high_scores_changed)
    }

    /// Close the current run with `score` and start counting a new one
    ///
    /// Returns the leaderboard rank if the run made it.
    pub fn end_run(&mut self, score: u32, timestamp: f64) -> Option<usize> {
        let frames = self.state.time_ticks - self.run_start_tick;
        self.run_start_tick = self.state.time_ticks;
        self.runs_finished += 1;

        let rank = self.high_scores.add_score(score, frames, timestamp);
        if let Some(rank) = rank {
            log::info!("New high score #{}: {} ({} ticks)", rank, score, frames);
            self.high_scores_changed = true;
        }
        rank
    }

    /// Throw away the current run and start over with `seed`
    pub fn restart(&mut self, seed: u64, timestamp: f64) {
        let score = self.state.score.score;
        self.end_run(score, timestamp);

        let best = self.state.score.best;
        self.state = GameState::with_tuning(seed, self.tuning.clone());
        self.state.score.best = best;
        self.state.color_index = self.settings.bird_color_index();
        self.run_start_tick = 0;
        self.clock.reset();
        self.pending = KeyEdges::none();
        log::info!("Restarted with seed {}", seed);
    }

    fn handle_events(&mut self, timestamp: f64) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Crashed { score, .. } => {
                    self.end_run(score, timestamp);
                }
                GameEvent::ColorCycled { index } => {
                    self.settings.bird_color = index;
                    self.settings_changed = true;
                }
                GameEvent::PipeRecycled { slot, id } => {
                    log::debug!("Pipe slot {} recycled as #{}", slot, id);
                }
                GameEvent::Bounced { impact } => {
                    log::debug!("Bounced at {:.2}", impact);
                }
                GameEvent::Jumped | GameEvent::Scored { .. } => {}
            }
            self.frame_events.push(event);
        }
    }
}

impl Game for FlappyGame {
    fn setup(&mut self, host: &HostInfo) {
        log::info!(
            "{} setup: {}x{} host, {}x{} game, seed {}",
            host.title,
            host.width,
            host.height,
            self.tuning.window_width,
            self.tuning.window_height,
            host.seed
        );
        self.state = GameState::with_tuning(host.seed, self.tuning.clone());
        self.state.color_index = self.settings.bird_color_index();
        self.run_start_tick = 0;
        self.clock.reset();
        self.pending = KeyEdges::none();
    }

    fn update(&mut self, frame: &Frame, draw: &mut DrawList) {
        self.frame_events.clear();

        if frame.keys.pressed(Key::Autopilot) {
            self.set_autopilot(!self.autopilot);
        }
        if frame.keys.pressed(Key::Restart) {
            let seed = self.state.seed.wrapping_add(1);
            self.restart(seed, frame.time_ms);
        } else {
            for key in [Key::Jump, Key::CycleColor] {
                if frame.keys.pressed(key) {
                    self.pending.insert(key);
                }
            }
        }

        let substeps = self.clock.advance(frame.dt);
        for _ in 0..substeps {
            let keys = std::mem::take(&mut self.pending);
            let mut input = TickInput {
                jump: keys.pressed(Key::Jump),
                cycle_color: keys.pressed(Key::CycleColor),
            };
            if self.autopilot {
                input.jump |= autopilot_input(&self.state).jump;
            }

            tick(&mut self.state, &input, SIM_DT);
            self.handle_events(frame.time_ms);
        }

        draw.reset();
        draw_scene(&self.state, &self.settings, draw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PIPE_WIDTH;
    use crate::renderer::DrawCmd;
    use crate::sim::Pipe;

    fn frame(keys: KeyEdges) -> Frame {
        Frame {
            dt: SIM_DT,
            width: 400.0,
            height: 400.0,
            keys,
            time_ms: 0.0,
        }
    }

    fn host(seed: u64) -> HostInfo {
        HostInfo {
            title: "Gravity".to_string(),
            width: 400.0,
            height: 400.0,
            seed,
        }
    }

    #[test]
    fn test_update_fills_draw_list() {
        let mut game = FlappyGame::new();
        game.setup(&host(1));
        let mut draw = DrawList::new();
        game.update(&frame(KeyEdges::none()), &mut draw);
        assert!(matches!(draw.commands().first(), Some(DrawCmd::Clear(_))));
        assert_eq!(game.state().time_ticks, 1);

        // The list is rebuilt, not appended to
        let len = draw.len();
        game.update(&frame(KeyEdges::none()), &mut draw);
        assert_eq!(draw.len(), len);
    }

    #[test]
    fn test_jump_edge_used_once_per_frame() {
        let mut game = FlappyGame::new();
        game.setup(&host(1));
        let mut draw = DrawList::new();

        let mut f = frame(KeyEdges::none().with(Key::Jump));
        f.dt = SIM_DT * 3.0;
        game.update(&f, &mut draw);
        assert_eq!(game.state().time_ticks, 3);
        let jumps = game
            .frame_events()
            .iter()
            .filter(|e| **e == GameEvent::Jumped)
            .count();
        assert_eq!(jumps, 1);
    }

    #[test]
    fn test_edge_waits_for_next_tick() {
        let mut game = FlappyGame::new();
        game.setup(&host(1));
        let mut draw = DrawList::new();

        let mut f = frame(KeyEdges::none().with(Key::Jump));
        f.dt = 0.0;
        game.update(&f, &mut draw);
        assert_eq!(game.state().time_ticks, 0);

        game.update(&frame(KeyEdges::none()), &mut draw);
        assert!(game.frame_events().contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_color_remembered_in_settings() {
        let mut game = FlappyGame::new();
        game.setup(&host(1));
        let mut draw = DrawList::new();
        game.update(&frame(KeyEdges::none().with(Key::CycleColor)), &mut draw);

        assert_eq!(game.state().color_index, 1);
        assert_eq!(game.settings().bird_color, 1);
        assert!(game.take_settings_changed());
        assert!(!game.take_settings_changed());
    }

    #[test]
    fn test_autopilot_toggle() {
        let mut game = FlappyGame::new();
        game.setup(&host(1));
        let mut draw = DrawList::new();
        game.update(&frame(KeyEdges::none().with(Key::Autopilot)), &mut draw);
        assert!(game.autopilot());
        game.update(&frame(KeyEdges::none().with(Key::Autopilot)), &mut draw);
        assert!(!game.autopilot());
    }

    #[test]
    fn test_restart_records_run() {
        let mut game = FlappyGame::new();
        game.setup(&host(1));
        let mut draw = DrawList::new();
        for _ in 0..10 {
            game.update(&frame(KeyEdges::none()), &mut draw);
        }
        game.state.score.score = 4;
        game.state.score.best = 4;

        game.update(&frame(KeyEdges::none().with(Key::Restart)), &mut draw);
        assert_eq!(game.runs_finished(), 1);
        assert_eq!(game.high_scores().top_score(), Some(4));
        assert_eq!(game.high_scores().entries[0].frames, 10);
        assert!(game.take_high_scores_changed());
        assert_eq!(game.score(), 0);
        assert_eq!(game.best(), 4);
        assert_eq!(game.state().seed, 2);
        // The restart frame still ticks the fresh state
        assert_eq!(game.state().time_ticks, 1);
    }

    #[test]
    fn test_crash_ends_run_into_high_scores() {
        let mut game = FlappyGame::new();
        game.setup(&host(1));
        let mut draw = DrawList::new();

        let first = game.state.pipes.cursor();
        let second = (first + 1) % game.state.pipes.len();
        let first_id = game.state.pipes.get(first).id;
        let second_id = game.state.pipes.get(second).id;
        game.state.bird.pos = glam::Vec2::new(200.0, 200.0);
        game.state.bird.vel = glam::Vec2::ZERO;
        // Cleared next tick, bird centered in the gap
        *game.state.pipes.get_mut(first) = Pipe::new(first_id, 201.0 - PIPE_WIDTH, 125.0);
        // Wall reaches the bird one tick later
        *game.state.pipes.get_mut(second) = Pipe::new(second_id, 228.0, 300.0);

        let mut f = frame(KeyEdges::none());
        f.time_ms = 1234.0;
        game.update(&f, &mut draw);
        assert_eq!(game.score(), 1);
        assert_eq!(game.runs_finished(), 0);

        game.update(&f, &mut draw);
        assert!(game.frame_events().contains(&GameEvent::Crashed {
            score: 1,
            pipe_id: second_id
        }));
        assert_eq!(game.score(), 0);
        assert_eq!(game.runs_finished(), 1);
        assert!(game.take_high_scores_changed());

        let entry = &game.high_scores().entries[0];
        assert_eq!(entry.score, 1);
        assert_eq!(entry.frames, 2);
        assert_eq!(entry.timestamp, 1234.0);
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let tuning = Tuning {
            pipe_top_min: 250.0,
            pipe_top_max: 100.0,
            ..Default::default()
        };
        assert!(matches!(
            FlappyGame::with_tuning(tuning),
            Err(TuningError::Invalid { .. })
        ));
        assert!(FlappyGame::with_tuning(Tuning::default()).is_ok());
    }

    #[test]
    fn test_setup_restores_color() {
        let settings = Settings {
            bird_color: 3,
            ..Default::default()
        };
        let mut game = FlappyGame::new().with_settings(settings);
        game.setup(&host(9));
        assert_eq!(game.state().color_index, 3);
        assert_eq!(game.state().seed, 9);
    }

    #[test]
    fn test_autopilot_survives() {
        let mut game = FlappyGame::new();
        game.setup(&host(5));
        game.set_autopilot(true);
        let mut draw = DrawList::new();
        for _ in 0..600 {
            game.update(&frame(KeyEdges::none()), &mut draw);
        }
        assert!(game.state().bird.pos.y < game.state().tuning.window_height);
        assert!(game.best() > 0);
    }
}
