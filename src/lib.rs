//! # Flapsim - Population Flyer Simulation
//!
//! A deterministic, tick-driven simulation of a population of flyers steering
//! through a side-scrolling course of pipe obstacles. Each flyer is driven by
//! an external policy that sees a three-value observation and answers with a
//! jump propensity; the engine reports survival, pass and collision rewards
//! back to it.
//!
//! ## Features
//!
//! - Ballistic flyer physics with terminal velocity and cosmetic tilt
//! - Procedural obstacles with seeded gap heights
//! - Bounding-box or pixel-mask collision
//! - Atomic, order-preserving removal of dead flyers and despawned obstacles
//! - Episode state machine with score threshold and cooperative stop
//! - Read-only per-tick frames for renderers, JSON-lines frame output
//! - Parallel headless evaluation of many seeds
//!
//! ## Core Modules
//!
//! - [`simulation::flyer`] - Flyer kinematics and tilt
//! - [`simulation::obstacle`] - Obstacle geometry and motion
//! - [`simulation::collision`] - Intersection tests
//! - [`simulation::population`] - One tick across the population
//! - [`simulation::episode`] - Episode lifecycle and batch evaluation
//! - [`simulation::policy`] - The decision capability and a reference network

/// Core simulation logic and data structures.
pub mod simulation {
    /// Feed-forward network used by the reference policy.
    pub mod brain;
    /// Flyer-vs-obstacle and flyer-vs-boundary tests.
    pub mod collision;
    /// Episode lifecycle, outcomes and batch evaluation.
    pub mod episode;
    /// Configuration and file errors.
    pub mod error;
    /// Bounded log of recent notable events.
    pub mod event_log;
    /// Tick events applied atomically at the end of each tick.
    pub mod events;
    /// Scrolling floor.
    pub mod floor;
    /// Flyer physics, tilt and animation.
    pub mod flyer;
    /// Geometric utility functions for sprite hulls and overlap.
    pub mod geometric_utils;
    /// Trait for entities that have a position and advance once per tick.
    ///
    /// The [`locatable::Locatable`] trait is implemented by every moving
    /// entity (Flyer, Obstacle, Floor).
    pub mod locatable;
    /// Obstacle geometry and motion.
    pub mod obstacle;
    /// Simulation parameters.
    pub mod params;
    /// The decision capability consumed by the simulator.
    pub mod policy;
    /// Population simulator running one tick at a time.
    pub mod population;
    /// Read-only frames for external renderers.
    pub mod presentation;
}

pub use simulation::episode::{
    Episode, EpisodeOutcome, EpisodeReport, EpisodeState, StopSignal, evaluate_batch,
};
pub use simulation::error::{ConfigError, Error};
pub use simulation::params::Params;
pub use simulation::policy::{NeuralPolicy, Observation, Policy};
pub use simulation::presentation::{Frame, NullPresenter, Presenter};
