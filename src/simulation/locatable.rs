//! Trait for entities that have a position and advance once per tick.
//!
//! Flyers, obstacles and the floor all move in fixed per-tick steps; this
//! trait gives the simulator one way to move and inspect them.

use geo::Coord;

use super::params::Params;

/// Trait for entities with a position that advance in discrete ticks.
///
/// Any type that implements this trait:
/// - Has a top-left position in world coordinates (y grows downwards)
/// - Can be advanced by exactly one tick
pub trait Locatable {
    /// Returns the entity's top-left position.
    fn pos(&self) -> Coord<f32>;

    /// Advances the entity by one tick.
    ///
    /// # Arguments
    ///
    /// * `params` - Simulation parameters holding the per-tick constants.
    fn update(&mut self, params: &Params);
}
