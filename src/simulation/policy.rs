//! The decision capability the simulator consumes.
//!
//! A policy sees one [`Observation`] per tick and answers with a jump
//! propensity in `[0, 1]`; the simulator jumps when it exceeds
//! `jump_threshold`. Fitness deltas are reported back as they happen.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::brain::Brain;
use super::error::ConfigError;
use super::flyer::Flyer;
use super::obstacle::Obstacle;

/// What a policy sees of the world on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Flyer height.
    pub y: f32,
    /// Vertical distance to the gap's upper edge.
    pub gap_distance: f32,
    /// Vertical distance to the bottom piece's upper edge.
    pub bottom_distance: f32,
}

impl Observation {
    /// Builds the observation of a flyer facing an obstacle.
    pub fn new(flyer: &Flyer, obstacle: &Obstacle) -> Self {
        Self {
            y: flyer.y,
            gap_distance: (flyer.y - obstacle.gap_height as f32).abs(),
            bottom_distance: (flyer.y - obstacle.bot).abs(),
        }
    }

    /// The observation as a network input vector.
    pub fn to_array(&self) -> Array1<f32> {
        Array1::from_vec(vec![self.y, self.gap_distance, self.bottom_distance])
    }
}

/// Source of jump decisions and sink for fitness rewards.
pub trait Policy {
    /// Returns a jump propensity in `[0, 1]`.
    fn decide(&mut self, observation: &Observation) -> f32;

    /// Accumulates a fitness reward (negative for penalties).
    fn record_fitness_delta(&mut self, amount: f32);
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn decide(&mut self, observation: &Observation) -> f32 {
        (**self).decide(observation)
    }

    fn record_fitness_delta(&mut self, amount: f32) {
        (**self).record_fitness_delta(amount);
    }
}

/// A [`Brain`]-driven policy with its own fitness accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuralPolicy {
    /// Network mapping observations to a single output.
    pub brain: Brain,
    /// Fitness accumulated so far.
    pub fitness: f32,
}

impl NeuralPolicy {
    /// Number of observation inputs the network must accept.
    pub const INPUTS: usize = 3;

    /// Wraps a brain whose first layer takes the three observation values.
    pub fn new(brain: Brain) -> Result<Self, ConfigError> {
        if brain.input_size() != Self::INPUTS {
            let sizes = brain.layers.iter().map(|l| l.input_size()).collect();
            return Err(ConfigError::InvalidLayers(sizes));
        }
        Ok(Self {
            brain,
            fitness: 0.0,
        })
    }

    /// Creates a randomly initialised policy with `hidden` neurons in one hidden layer.
    pub fn random(hidden: usize, seed: u64) -> Result<Self, ConfigError> {
        Self::new(Brain::new(&[Self::INPUTS, hidden, 1], 1.0, seed)?)
    }
}

impl Policy for NeuralPolicy {
    /// The first output, a tanh value, with its negative half cut to zero.
    fn decide(&mut self, observation: &Observation) -> f32 {
        let output = self.brain.think(&observation.to_array());
        output.first().copied().unwrap_or(0.0).clamp(0.0, 1.0)
    }

    fn record_fitness_delta(&mut self, amount: f32) {
        self.fitness += amount;
    }
}
