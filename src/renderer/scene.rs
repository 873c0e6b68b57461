//! Turns game state into draw calls
//!
//! Back to front: background, clouds, pipes, bird.

use super::draw::DrawList;
use super::vertex::colors;
use crate::settings::Settings;
use crate::sim::GameState;

/// Fill `draw` with the current frame
pub fn draw_scene(state: &GameState, settings: &Settings, draw: &mut DrawList) {
    let tuning = &state.tuning;

    if settings.high_contrast {
        draw.clear(colors::BACKGROUND_HIGH_CONTRAST);
    } else {
        draw.clear(colors::BACKGROUND);
    }

    if settings.clouds {
        let cloud_color = if settings.high_contrast {
            colors::CLOUD_HIGH_CONTRAST
        } else {
            colors::CLOUD
        };
        for cloud in state.clouds.iter() {
            draw.ellipse(cloud.pos, cloud.size, cloud_color);
        }
    }

    for pipe in state.pipes.iter() {
        // Skip pipes still waiting off the right edge
        if pipe.x > tuning.window_width {
            continue;
        }
        let top = pipe.top_rect(tuning);
        let bottom = pipe.bottom_rect(tuning);
        draw.rect(top.min.x, top.min.y, top.size.x, top.size.y, colors::PIPE);
        draw.rect(bottom.min.x, bottom.min.y, bottom.size.x, bottom.size.y, colors::PIPE);
    }

    let bird_color = colors::BIRD_PALETTE[state.color_index % colors::BIRD_PALETTE.len()];
    draw.circle(state.bird.pos, state.bird.radius, bird_color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawCmd;

    fn visible_pipes(state: &GameState) -> usize {
        state
            .pipes
            .iter()
            .filter(|p| p.x <= state.tuning.window_width)
            .count()
    }

    #[test]
    fn test_scene_order_and_counts() {
        let mut state = GameState::new(3);
        state.pipes.get_mut(0).x = 100.0;
        let settings = Settings::default();
        let mut draw = DrawList::new();
        draw_scene(&state, &settings, &mut draw);

        let cmds = draw.commands();
        assert!(matches!(cmds[0], DrawCmd::Clear(c) if c == colors::BACKGROUND));
        assert!(matches!(cmds.last(), Some(DrawCmd::Circle { .. })));

        let ellipses = cmds.iter().filter(|c| matches!(c, DrawCmd::Ellipse { .. })).count();
        let rects = cmds.iter().filter(|c| matches!(c, DrawCmd::Rect { .. })).count();
        assert_eq!(ellipses, state.clouds.len());
        assert_eq!(rects, visible_pipes(&state) * 2);
    }

    #[test]
    fn test_clouds_can_be_hidden() {
        let state = GameState::new(3);
        let settings = Settings {
            clouds: false,
            ..Default::default()
        };
        let mut draw = DrawList::new();
        draw_scene(&state, &settings, &mut draw);
        assert!(!draw
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCmd::Ellipse { .. })));
    }

    #[test]
    fn test_bird_uses_palette_color() {
        let mut state = GameState::new(3);
        state.cycle_color();
        state.cycle_color();
        let mut draw = DrawList::new();
        draw_scene(&state, &Settings::default(), &mut draw);
        match draw.commands().last() {
            Some(DrawCmd::Circle { color, radius, .. }) => {
                assert_eq!(*color, colors::BIRD_PALETTE[2]);
                assert_eq!(*radius, state.bird.radius);
            }
            other => panic!("expected bird circle, got {:?}", other),
        }
    }
}
