//! Obstacles: a top and a bottom pipe piece separated by a fixed vertical gap.

use geo::{Coord, Rect};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::CollisionEngine;
use super::flyer::Flyer;
use super::geometric_utils::sprite_rect;
use super::locatable::Locatable;
use super::params::Params;

/// A paired top/bottom barrier scrolling left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge of both pipe pieces.
    pub x: f32,
    /// Y coordinate where the gap begins (bottom edge of the top piece).
    pub gap_height: i32,
    /// Y coordinate of the top piece's upper edge.
    pub top: f32,
    /// Y coordinate of the bottom piece's upper edge.
    pub bot: f32,
    /// Set once a flyer has moved past this obstacle.
    pub passed: bool,
}

impl Obstacle {
    /// Creates an obstacle at `x` with a gap height drawn uniformly from
    /// `[gap_min, gap_max)`.
    pub fn new<R: Rng + ?Sized>(x: f32, rng: &mut R, params: &Params) -> Self {
        let gap_height = rng.random_range(params.gap_min..params.gap_max);
        Self::with_gap(x, gap_height, params)
    }

    /// Creates an obstacle at `x` with a fixed gap height.
    pub fn with_gap(x: f32, gap_height: i32, params: &Params) -> Self {
        let gap = gap_height as f32;
        Self {
            x,
            gap_height,
            top: gap - params.pipe_height,
            bot: gap + params.gap_size,
            passed: false,
        }
    }

    /// Scrolls the obstacle left by one tick.
    pub fn advance(&mut self, params: &Params) {
        self.x -= params.obstacle_velocity;
    }

    /// X coordinate of the pipes' right edge.
    pub fn right_edge(&self, params: &Params) -> f32 {
        self.x + params.pipe_width
    }

    /// Checks whether the obstacle has scrolled fully past the left world edge.
    pub fn is_offscreen(&self, params: &Params) -> bool {
        self.right_edge(params) < 0.0
    }

    /// Region covered by the top pipe piece.
    pub fn top_rect(&self, params: &Params) -> Rect<f32> {
        sprite_rect(self.x, self.top, params.pipe_width, params.pipe_height)
    }

    /// Region covered by the bottom pipe piece.
    pub fn bottom_rect(&self, params: &Params) -> Rect<f32> {
        sprite_rect(self.x, self.bot, params.pipe_width, params.pipe_height)
    }

    /// Checks whether the flyer touches either pipe piece under the engine's model.
    pub fn collides_with(
        &self,
        flyer: &Flyer,
        engine: &mut CollisionEngine,
        params: &Params,
    ) -> bool {
        engine.flyer_hits_obstacle(flyer, self, params)
    }
}

impl Locatable for Obstacle {
    fn pos(&self) -> Coord<f32> {
        Coord {
            x: self.x,
            y: self.top,
        }
    }

    fn update(&mut self, params: &Params) {
        self.advance(params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn drawn_gaps_stay_in_range() {
        let params = Params::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let obstacle = Obstacle::new(600.0, &mut rng, &params);
            assert!((params.gap_min..params.gap_max).contains(&obstacle.gap_height));
            assert_eq!(obstacle.top, obstacle.gap_height as f32 - params.pipe_height);
            assert_eq!(obstacle.bot, obstacle.gap_height as f32 + params.gap_size);
            assert!(!obstacle.passed);
        }
    }

    #[test]
    fn top_piece_ends_at_gap() {
        let params = Params::default();
        let obstacle = Obstacle::with_gap(700.0, 300, &params);
        assert_eq!(obstacle.top_rect(&params).max().y, 300.0);
        assert_eq!(obstacle.bottom_rect(&params).min().y, 500.0);
    }
}
