use serde::{Deserialize, Serialize};

use super::collision::CollisionModel;
use super::error::{ConfigError, Error};

/// Simulation parameters that control flyer physics, obstacle generation and scoring.
///
/// Every field has a reference default, so a partial JSON document only needs
/// to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Number of flyers (and policies) per episode.
    pub population_size: usize,
    /// The episode stops once the score exceeds this value.
    pub score_threshold: u32,
    /// Fitness granted to every live flyer each tick.
    pub survival_reward: f32,
    /// Fitness granted to every surviving flyer when an obstacle is passed.
    pub pass_reward: f32,
    /// Fitness removed from a flyer that hits an obstacle.
    pub collision_penalty: f32,
    /// Policy output above which the flyer jumps.
    pub jump_threshold: f32,

    /// Downward acceleration in units per tick squared.
    pub gravity: f32,
    /// Velocity set by a jump (negative is upwards).
    pub jump_velocity: f32,
    /// Velocity a freshly spawned flyer starts with.
    pub spawn_velocity: f32,
    /// Maximum displacement magnitude per tick.
    pub terminal_velocity: f32,
    /// Extra upward correction applied whenever the flyer is rising.
    pub upward_snap: f32,
    /// Tilt change per tick in degrees.
    pub rotation_step: f32,
    /// Nose-up tilt limit in degrees.
    pub max_tilt: f32,
    /// Nose-down tilt limit in degrees.
    pub min_tilt: f32,
    /// Distance below the last jump height within which the nose stays up.
    pub tilt_hold_margin: f32,
    /// Ticks each wing frame is held for.
    pub animation_period: u32,

    /// Fixed horizontal position of every flyer.
    pub flyer_start_x: f32,
    /// Initial vertical position of every flyer.
    pub flyer_start_y: f32,
    /// Sprite width of a flyer.
    pub flyer_width: f32,
    /// Sprite height of a flyer.
    pub flyer_height: f32,
    /// Slack subtracted from the flyer height in the floor test.
    pub floor_clearance: f32,

    /// Vertical opening between the top and bottom pipe pieces.
    pub gap_size: f32,
    /// Lowest gap height (inclusive).
    pub gap_min: i32,
    /// Highest gap height (exclusive).
    pub gap_max: i32,
    /// Horizontal scroll speed of obstacles per tick.
    pub obstacle_velocity: f32,
    /// Width of a pipe piece.
    pub pipe_width: f32,
    /// Height of a pipe piece.
    pub pipe_height: f32,
    /// X position of the first obstacle of an episode.
    pub first_obstacle_x: f32,

    /// Width of the visible world; new obstacles spawn here.
    pub world_width: f32,
    /// Height of the visible world.
    pub world_height: f32,
    /// Y coordinate of the floor kill-plane.
    pub floor_y: f32,
    /// Width of one floor tile.
    pub floor_width: f32,
    /// Horizontal scroll speed of the floor per tick.
    pub floor_velocity: f32,

    /// Shape model used for flyer/obstacle intersection.
    pub collision_model: CollisionModel,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            population_size: 50,
            score_threshold: 20,
            survival_reward: 0.1,
            pass_reward: 5.0,
            collision_penalty: 1.0,
            jump_threshold: 0.5,

            gravity: 3.0,
            jump_velocity: -10.5,
            spawn_velocity: -10.5,
            terminal_velocity: 16.0,
            upward_snap: 2.0,
            rotation_step: 20.0,
            max_tilt: 25.0,
            min_tilt: -90.0,
            tilt_hold_margin: 50.0,
            animation_period: 5,

            flyer_start_x: 230.0,
            flyer_start_y: 350.0,
            flyer_width: 68.0,
            flyer_height: 48.0,
            floor_clearance: 10.0,

            gap_size: 200.0,
            gap_min: 50,
            gap_max: 450,
            obstacle_velocity: 5.0,
            pipe_width: 104.0,
            pipe_height: 640.0,
            first_obstacle_x: 700.0,

            world_width: 600.0,
            world_height: 800.0,
            floor_y: 730.0,
            floor_width: 672.0,
            floor_velocity: 5.0,

            collision_model: CollisionModel::BoundingBox,
        }
    }
}

impl Params {
    /// Checks the parameters for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        let finite = [
            ("survival_reward", self.survival_reward),
            ("pass_reward", self.pass_reward),
            ("collision_penalty", self.collision_penalty),
            ("jump_threshold", self.jump_threshold),
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("spawn_velocity", self.spawn_velocity),
            ("upward_snap", self.upward_snap),
            ("tilt_hold_margin", self.tilt_hold_margin),
            ("flyer_start_x", self.flyer_start_x),
            ("flyer_start_y", self.flyer_start_y),
            ("floor_clearance", self.floor_clearance),
            ("first_obstacle_x", self.first_obstacle_x),
            ("floor_y", self.floor_y),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }

        let positive = [
            ("terminal_velocity", self.terminal_velocity),
            ("rotation_step", self.rotation_step),
            ("flyer_width", self.flyer_width),
            ("flyer_height", self.flyer_height),
            ("gap_size", self.gap_size),
            ("obstacle_velocity", self.obstacle_velocity),
            ("pipe_width", self.pipe_width),
            ("pipe_height", self.pipe_height),
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("floor_width", self.floor_width),
            ("floor_velocity", self.floor_velocity),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        if self.animation_period == 0 {
            return Err(ConfigError::NotPositive {
                name: "animation_period",
                value: 0.0,
            });
        }
        if self.gap_min >= self.gap_max {
            return Err(ConfigError::EmptyGapRange {
                min: self.gap_min,
                max: self.gap_max,
            });
        }
        if !(self.min_tilt.is_finite() && self.max_tilt.is_finite())
            || self.min_tilt > self.max_tilt
        {
            return Err(ConfigError::InvertedTiltRange {
                min: self.min_tilt,
                max: self.max_tilt,
            });
        }

        Ok(())
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file(&self, path: &str) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads parameters from a JSON file and validates them.
    pub fn load_from_file(path: &str) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Params::default().validate(), Ok(()));
    }

    #[test]
    fn zero_population_is_rejected() {
        let params = Params {
            population_size: 0,
            ..Params::default()
        };
        assert_eq!(params.validate(), Err(ConfigError::EmptyPopulation));
    }

    #[test]
    fn empty_gap_range_is_rejected() {
        let params = Params {
            gap_min: 300,
            gap_max: 300,
            ..Params::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::EmptyGapRange { min: 300, max: 300 })
        ));
    }

    #[test]
    fn nan_gravity_is_rejected() {
        let params = Params {
            gravity: f32::NAN,
            ..Params::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::NonFinite {
                name: "gravity",
                ..
            })
        ));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let params: Params = serde_json::from_str(r#"{ "population_size": 7 }"#).unwrap();
        assert_eq!(params.population_size, 7);
        assert_eq!(params.gap_size, 200.0);
        assert_eq!(params.collision_model, CollisionModel::BoundingBox);
    }
}
