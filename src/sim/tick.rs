//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Velocities are
//! in pixels per tick; only gravity is scaled by `dt`.

use super::collision::{circle_floor_collision, circle_rect_collision};
use super::state::{GameEvent, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump key edge: set an upward impulse
    pub jump: bool,
    /// Color key edge: advance the bird palette index
    pub cycle_color: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;

    integrate_bird(state, dt);
    advance_pipes(state);
    advance_clouds(state);
    detect_scoring(state);
    detect_crashes(state);
    apply_input(state, input);
}

/// Gravity, position update, floor bounce and ceiling clamp
pub fn integrate_bird(state: &mut GameState, dt: f32) {
    let floor = state.tuning.window_height;
    let ceiling = state.tuning.ceiling;
    let bird = &mut state.bird;

    bird.vel.y += bird.speed * dt;
    bird.pos += bird.vel;

    if circle_floor_collision(bird.pos, bird.radius, floor) {
        let impact = bird.vel.y;
        bird.pos.y = floor - bird.radius;
        bird.vel.y = -bird.vel.y * bird.friction;
        state.events.push(GameEvent::Bounced { impact });
    }

    if ceiling && bird.pos.y - bird.radius < 0.0 {
        bird.pos.y = bird.radius;
        bird.vel.y = bird.vel.y.max(0.0);
    }
}

/// Scroll pipes left and recycle any that left the screen
pub fn advance_pipes(state: &mut GameState) {
    let speed = state.tuning.pipe_scroll_speed;
    let width = state.tuning.pipe_width;
    let respawn_x = state.tuning.pipe_respawn_x();

    for slot in 0..state.pipes.len() {
        let pipe = state.pipes.get_mut(slot);
        pipe.x -= speed;

        if pipe.is_off_screen(width) {
            let fresh = state.spawn_pipe(respawn_x);
            state.pipes.recycle(slot, fresh);
            state.events.push(GameEvent::PipeRecycled { slot, id: fresh.id });
        }
    }
}

/// Drift clouds left at their own speeds and recycle them like pipes
pub fn advance_clouds(state: &mut GameState) {
    let respawn_x = state.tuning.cloud_respawn_x();

    for slot in 0..state.clouds.len() {
        let cloud = state.clouds.get_mut(slot);
        cloud.pos.x -= cloud.speed;

        if cloud.is_off_screen() {
            let fresh = state.spawn_cloud(respawn_x);
            state.clouds.recycle(slot, fresh);
        }
    }
}

/// Score each pipe once, the first tick the bird is past its trailing edge
pub fn detect_scoring(state: &mut GameState) {
    let bird_x = state.bird.pos.x;
    let width = state.tuning.pipe_width;

    for k in 0..state.pipes.len() {
        let pipe = *state.pipes.oldest(k);
        if bird_x > pipe.trailing_edge(width) && state.score.try_score(pipe.id) {
            log::debug!("Scored {} (pipe {})", state.score.score, pipe.id);
            state.events.push(GameEvent::Scored {
                score: state.score.score,
                pipe_id: pipe.id,
            });
        }
    }
}

/// Register the first overlap between the bird and each pipe instance
pub fn detect_crashes(state: &mut GameState) {
    let center = state.bird.pos;
    let radius = state.bird.radius;

    for k in 0..state.pipes.len() {
        let pipe = *state.pipes.oldest(k);
        let hit = circle_rect_collision(center, radius, &pipe.top_rect(&state.tuning))
            || circle_rect_collision(center, radius, &pipe.bottom_rect(&state.tuning));

        if !hit {
            continue;
        }
        if let Some(lost) = state.score.try_crash(pipe.id) {
            log::debug!("Crashed into pipe {} (lost score {})", pipe.id, lost);
            state.events.push(GameEvent::Crashed {
                score: lost,
                pipe_id: pipe.id,
            });
        }
    }
}

/// Apply the two key edges
pub fn apply_input(state: &mut GameState, input: &TickInput) {
    if input.jump {
        state.bird.vel.y = state.tuning.jump_velocity;
        state.events.push(GameEvent::Jumped);
    }
    if input.cycle_color {
        let index = state.cycle_color();
        state.events.push(GameEvent::ColorCycled { index });
    }
}
