//! Data-driven game balance
//!
//! Every gameplay number lives here so a run can be replayed or rebalanced
//! from a JSON file without recompiling. `Default` matches `consts`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Environment variable naming a JSON tuning file (native)
pub const TUNING_ENV: &str = "GRAVITY_FLAP_TUNING";

/// Errors produced while loading or validating tuning
#[derive(Debug)]
pub enum TuningError {
    /// JSON did not parse into a `Tuning`
    Parse(serde_json::Error),
    /// A value is out of its allowed range
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "tuning parse error: {}", e),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning value `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Gameplay constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub window_width: f32,
    pub window_height: f32,

    pub bird_radius: f32,
    /// Gravity acceleration applied to vertical velocity (per second)
    pub bird_speed: f32,
    /// Fraction of vertical speed kept after a floor bounce
    pub bird_friction: f32,
    pub jump_velocity: f32,
    /// Clamp the bird at the top edge
    pub ceiling: bool,

    pub pipe_width: f32,
    pub pipe_gap: f32,
    pub pipe_scroll_speed: f32,
    pub pipe_spacing: f32,
    pub pipe_respawn_offset: f32,
    pub pipe_top_min: f32,
    pub pipe_top_max: f32,

    pub cloud_spacing: f32,
    pub cloud_respawn_offset: f32,
    pub cloud_speed_min: f32,
    pub cloud_speed_max: f32,
    pub cloud_width_min: f32,
    pub cloud_width_max: f32,
    pub cloud_height_min: f32,
    pub cloud_height_max: f32,
    pub cloud_y_min: f32,
    pub cloud_y_max: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,

            bird_radius: BIRD_RADIUS,
            bird_speed: BIRD_SPEED,
            bird_friction: BIRD_FRICTION,
            jump_velocity: JUMP_VELOCITY,
            ceiling: true,

            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            pipe_scroll_speed: PIPE_SCROLL_SPEED,
            pipe_spacing: PIPE_SPACING,
            pipe_respawn_offset: PIPE_RESPAWN_OFFSET,
            pipe_top_min: PIPE_TOP_MIN,
            pipe_top_max: PIPE_TOP_MAX,

            cloud_spacing: CLOUD_SPACING,
            cloud_respawn_offset: CLOUD_RESPAWN_OFFSET,
            cloud_speed_min: CLOUD_SPEED_MIN,
            cloud_speed_max: CLOUD_SPEED_MAX,
            cloud_width_min: CLOUD_WIDTH_MIN,
            cloud_width_max: CLOUD_WIDTH_MAX,
            cloud_height_min: CLOUD_HEIGHT_MIN,
            cloud_height_max: CLOUD_HEIGHT_MAX,
            cloud_y_min: CLOUD_Y_MIN,
            cloud_y_max: CLOUD_Y_MAX,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ranges that the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.window_width <= 0.0 {
            return invalid("window_width", "must be positive");
        }
        if self.window_height <= 0.0 {
            return invalid("window_height", "must be positive");
        }
        if self.bird_radius <= 0.0 {
            return invalid("bird_radius", "must be positive");
        }
        if self.bird_radius * 2.0 >= self.window_height {
            return invalid("bird_radius", "bird does not fit in the window");
        }
        if !(0.0..=1.0).contains(&self.bird_friction) {
            return invalid("bird_friction", "must be within [0, 1]");
        }
        if self.pipe_width <= 0.0 {
            return invalid("pipe_width", "must be positive");
        }
        if self.pipe_gap <= 0.0 {
            return invalid("pipe_gap", "must be positive");
        }
        if self.pipe_scroll_speed <= 0.0 {
            return invalid("pipe_scroll_speed", "must be positive");
        }
        if self.pipe_spacing <= 0.0 {
            return invalid("pipe_spacing", "must be positive");
        }
        if self.pipe_spacing < self.pipe_width + 2.0 * self.bird_radius {
            return invalid("pipe_spacing", "bird cannot fit between two pipes");
        }
        if self.pipe_respawn_offset <= 0.0 {
            return invalid("pipe_respawn_offset", "must be positive");
        }
        if self.pipe_top_min < 0.0 {
            return invalid("pipe_top_min", "must not be negative");
        }
        if self.pipe_top_min > self.pipe_top_max {
            return invalid("pipe_top_min", "must not exceed pipe_top_max");
        }
        if self.pipe_top_max + self.pipe_gap > self.window_height {
            return invalid("pipe_gap", "gap leaves no room below the tallest top pipe");
        }
        if self.cloud_speed_min > self.cloud_speed_max {
            return invalid("cloud_speed_min", "must not exceed cloud_speed_max");
        }
        if self.cloud_width_min > self.cloud_width_max {
            return invalid("cloud_width_min", "must not exceed cloud_width_max");
        }
        if self.cloud_height_min > self.cloud_height_max {
            return invalid("cloud_height_min", "must not exceed cloud_height_max");
        }
        if self.cloud_y_min > self.cloud_y_max {
            return invalid("cloud_y_min", "must not exceed cloud_y_max");
        }
        Ok(())
    }

    /// Horizontal position freshly recycled pipes start at
    #[inline]
    pub fn pipe_respawn_x(&self) -> f32 {
        self.window_width + self.pipe_respawn_offset
    }

    #[inline]
    pub fn cloud_respawn_x(&self) -> f32 {
        self.window_width + self.cloud_respawn_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_default_spacing_is_stable() {
        // Recycled pipes land exactly one spacing behind the last pipe
        let t = Tuning::default();
        let loop_len = t.pipe_width + t.window_width + t.pipe_respawn_offset;
        assert!((loop_len - PIPE_CAPACITY as f32 * t.pipe_spacing).abs() < 0.001);
    }

    #[test]
    fn test_rejects_inverted_height_range() {
        let tuning = Tuning {
            pipe_top_min: 150.0,
            pipe_top_max: 100.0,
            ..Default::default()
        };
        match tuning.validate() {
            Err(TuningError::Invalid { field, .. }) => assert_eq!(field, "pipe_top_min"),
            other => panic!("expected invalid pipe_top_min, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_pipes_closer_than_the_bird() {
        let tuning = Tuning {
            pipe_spacing: 80.0,
            ..Default::default()
        };
        match tuning.validate() {
            Err(TuningError::Invalid { field, .. }) => assert_eq!(field, "pipe_spacing"),
            other => panic!("expected invalid pipe_spacing, got {:?}", other),
        }

        let snug = Tuning {
            pipe_spacing: PIPE_WIDTH + 2.0 * BIRD_RADIUS,
            ..Default::default()
        };
        assert!(snug.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_spacing_and_offset() {
        for tuning in [
            Tuning {
                pipe_spacing: 0.0,
                ..Default::default()
            },
            Tuning {
                pipe_respawn_offset: -10.0,
                ..Default::default()
            },
            Tuning {
                pipe_respawn_offset: 0.0,
                ..Default::default()
            },
        ] {
            assert!(matches!(tuning.validate(), Err(TuningError::Invalid { .. })));
        }
    }

    #[test]
    fn test_rejects_friction_above_one() {
        let tuning = Tuning {
            bird_friction: 1.5,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_gap_that_does_not_fit() {
        let tuning = Tuning {
            pipe_gap: 300.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let tuning = Tuning::from_json(r#"{ "bird_friction": 0.5, "pipe_gap": 120.0 }"#).unwrap();
        assert_eq!(tuning.bird_friction, 0.5);
        assert_eq!(tuning.pipe_gap, 120.0);
        assert_eq!(tuning.bird_radius, BIRD_RADIUS);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning {
            pipe_scroll_speed: 3.0,
            ceiling: false,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }
}
