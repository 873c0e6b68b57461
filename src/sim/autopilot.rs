//! Demo mode: a tiny controller that flaps through the gaps
//!
//! Aims for a point slightly below the middle of the upcoming gap and flaps
//! whenever the bird is falling below it. Not perfect on purpose.

use super::state::{GameState, Pipe};
use super::tick::TickInput;

/// How far below the gap center the bird may sink before flapping
pub const AUTOPILOT_MARGIN: f32 = 30.0;

/// First pipe (oldest first) the bird has not fully cleared yet
pub fn upcoming_pipe(state: &GameState) -> Option<&Pipe> {
    let bird = &state.bird;
    let width = state.tuning.pipe_width;
    state
        .pipes
        .iter_oldest_first()
        .find(|p| p.trailing_edge(width) > bird.pos.x - bird.radius)
}

/// Height the controller tries to hold
pub fn target_height(state: &GameState) -> f32 {
    match upcoming_pipe(state) {
        Some(pipe) => pipe.gap_center(state.tuning.pipe_gap),
        None => state.tuning.window_height / 2.0,
    }
}

/// Input for the next tick
pub fn autopilot_input(state: &GameState) -> TickInput {
    let bird = &state.bird;
    let falling = bird.vel.y >= 0.0;
    let too_low = bird.pos.y > target_height(state) + AUTOPILOT_MARGIN;

    TickInput {
        jump: falling && too_low,
        cycle_color: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Pipe;

    fn state_with_gap_at(center: f32) -> GameState {
        let mut state = GameState::new(4);
        let gap = state.tuning.pipe_gap;
        let x = state.bird.pos.x + 50.0;
        for slot in 0..state.pipes.len() {
            let id = state.pipes.get(slot).id;
            *state.pipes.get_mut(slot) = Pipe::new(id, x + slot as f32 * 175.0, center - gap / 2.0);
        }
        state
    }

    #[test]
    fn test_upcoming_pipe_skips_cleared() {
        let mut state = state_with_gap_at(200.0);
        let width = state.tuning.pipe_width;
        // Oldest pipe fully behind the bird
        state.pipes.get_mut(0).x = state.bird.pos.x - state.bird.radius - width - 1.0;
        let next = upcoming_pipe(&state).map(|p| p.id);
        assert_eq!(next, Some(state.pipes.get(1).id));
    }

    #[test]
    fn test_flaps_when_falling_below_target() {
        let mut state = state_with_gap_at(200.0);
        state.bird.pos.y = 260.0;
        state.bird.vel.y = 1.0;
        assert!(autopilot_input(&state).jump);
    }

    #[test]
    fn test_no_flap_when_rising() {
        let mut state = state_with_gap_at(200.0);
        state.bird.pos.y = 300.0;
        state.bird.vel.y = -2.0;
        assert!(!autopilot_input(&state).jump);
    }

    #[test]
    fn test_no_flap_above_target() {
        let mut state = state_with_gap_at(200.0);
        state.bird.pos.y = 150.0;
        state.bird.vel.y = 3.0;
        assert!(!autopilot_input(&state).jump);
    }
}
