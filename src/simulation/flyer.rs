//! Flyer kinematics, tilt and the cosmetic wing animation.
//!
//! A flyer only moves vertically; the world scrolls past it. Its
//! displacement follows a ballistic law measured from the last jump, with a
//! terminal-velocity clamp and a small extra lift while rising.

use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

use super::geometric_utils::{rotated_hull, sprite_rect};
use super::locatable::Locatable;
use super::params::Params;

/// Wing frames shown in one animation cycle.
const WING_CYCLE: [usize; 4] = [0, 1, 2, 1];
/// Frame shown while nose-diving.
const GLIDE_FRAME: usize = 1;
/// Tilt at or below which the wings stop flapping.
const DIVE_TILT: f32 = -80.0;

/// A simulated agent with vertical-only kinematic state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flyer {
    /// Horizontal position, fixed for the whole episode.
    pub x: f32,
    /// Vertical position of the sprite's top edge (y grows downwards).
    pub y: f32,
    /// Velocity term of the displacement law.
    pub velocity: f32,
    /// Ticks since the last jump.
    pub tick_count: u32,
    /// Height at which the last jump happened.
    pub reference_height: f32,
    /// Tilt in degrees, positive is nose up.
    pub tilt: f32,
    /// Current wing frame index.
    pub frame: usize,
    /// Ticks into the current wing cycle.
    pub frame_ticks: u32,
}

impl Flyer {
    /// Creates a flyer at rest at `(x, y)` with the spawn velocity from `params`.
    pub fn new(x: f32, y: f32, params: &Params) -> Self {
        Self {
            x,
            y,
            velocity: params.spawn_velocity,
            tick_count: 0,
            reference_height: y,
            tilt: 0.0,
            frame: 0,
            frame_ticks: 0,
        }
    }

    /// Creates a flyer at the configured start position.
    pub fn spawn(params: &Params) -> Self {
        Self::new(params.flyer_start_x, params.flyer_start_y, params)
    }

    /// Applies a jump impulse from the current height.
    pub fn jump(&mut self, params: &Params) {
        self.velocity = params.jump_velocity;
        self.tick_count = 0;
        self.reference_height = self.y;
    }

    /// Advances the flyer by one tick and returns the displacement applied to `y`.
    ///
    /// The displacement is `v·t + ½·g·t²` since the last jump; rising flyers get
    /// an extra `upward_snap` of lift, and the result is clamped to
    /// `terminal_velocity` in either direction.
    pub fn advance(&mut self, params: &Params) -> f32 {
        self.tick_count += 1;
        let t = self.tick_count as f32;

        let mut d = self.velocity * t + 0.5 * params.gravity * t * t;
        // snap before clamping, so rising ticks stay within terminal velocity too
        if d < 0.0 {
            d -= params.upward_snap;
        }
        d = d.clamp(-params.terminal_velocity, params.terminal_velocity);

        self.y += d;

        if d < 0.0 || self.y < self.reference_height + params.tilt_hold_margin {
            self.tilt = (self.tilt + params.rotation_step).min(params.max_tilt);
        } else if self.tilt > params.min_tilt {
            self.tilt = (self.tilt - params.rotation_step).max(params.min_tilt);
        }

        d
    }

    /// Steps the wing animation by one tick.
    ///
    /// Cosmetic only: the collision shape does not depend on the frame.
    pub fn animate(&mut self, params: &Params) {
        let period = params.animation_period.max(1);
        self.frame_ticks += 1;

        let phase = (self.frame_ticks / period) as usize % WING_CYCLE.len();
        self.frame = WING_CYCLE[phase];

        if self.frame_ticks >= period * WING_CYCLE.len() as u32 {
            self.frame_ticks = 0;
        }

        if self.tilt <= DIVE_TILT {
            self.frame = GLIDE_FRAME;
            self.frame_ticks = period * 2;
        }
    }

    /// Unrotated sprite rectangle.
    pub fn sprite_rect(&self, params: &Params) -> Rect<f32> {
        sprite_rect(self.x, self.y, params.flyer_width, params.flyer_height)
    }

    /// Axis-aligned hull of the sprite rotated by the current tilt.
    pub fn bounding_shape(&self, params: &Params) -> Rect<f32> {
        rotated_hull(self.sprite_rect(params), self.tilt)
    }

    /// Checks whether the flyer has hit the floor or left the top of the world.
    pub fn is_out_of_bounds(&self, floor_y: f32, params: &Params) -> bool {
        self.y + params.flyer_height - params.floor_clearance >= floor_y || self.y < 0.0
    }
}

impl Locatable for Flyer {
    fn pos(&self) -> Coord<f32> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }

    fn update(&mut self, params: &Params) {
        self.advance(params);
        self.animate(params);
    }
}
