//! Scrolling floor made of two tiles that leapfrog each other.

use geo::Coord;
use serde::{Deserialize, Serialize};

use super::locatable::Locatable;
use super::params::Params;

/// Cosmetic floor ribbon; its `y` is the kill-plane for flyers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    /// Kill-plane height.
    pub y: f32,
    /// Left edge of the first tile.
    pub x1: f32,
    /// Left edge of the second tile.
    pub x2: f32,
    /// Width of one tile.
    pub width: f32,
}

impl Floor {
    /// Creates a floor at `y` with the two tiles laid end to end from `x = 0`.
    pub fn new(y: f32, width: f32) -> Self {
        Self {
            y,
            x1: 0.0,
            x2: width,
            width,
        }
    }

    /// Scrolls both tiles; a tile that left the screen moves behind the other.
    pub fn advance(&mut self, params: &Params) {
        self.x1 -= params.floor_velocity;
        self.x2 -= params.floor_velocity;

        if self.x1 + self.width < 0.0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0.0 {
            self.x2 = self.x1 + self.width;
        }
    }
}

impl Locatable for Floor {
    fn pos(&self) -> Coord<f32> {
        Coord {
            x: self.x1.min(self.x2),
            y: self.y,
        }
    }

    fn update(&mut self, params: &Params) {
        self.advance(params);
    }
}
