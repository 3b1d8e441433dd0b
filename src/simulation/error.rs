//! Error types for configuration and file handling.
//!
//! Nothing inside a running episode can fail; every error here is raised
//! either while validating [`Params`](super::params::Params) or while
//! reading and writing JSON documents.

use thiserror::Error;

/// Reasons a configuration is rejected at episode construction.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The population has no members.
    #[error("population size must be positive")]
    EmptyPopulation,

    /// The number of supplied policies does not match the configured population.
    #[error("expected {expected} policies for the configured population, got {actual}")]
    PopulationMismatch {
        /// Configured population size.
        expected: usize,
        /// Number of policies handed to the episode.
        actual: usize,
    },

    /// A size, speed or period is zero, negative or not finite.
    #[error("{name} must be positive, got {value}")]
    NotPositive {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f32,
    },

    /// A parameter is NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NonFinite {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f32,
    },

    /// The gap height range `[min, max)` contains no value.
    #[error("gap range [{min}, {max}) is empty")]
    EmptyGapRange {
        /// Inclusive lower bound.
        min: i32,
        /// Exclusive upper bound.
        max: i32,
    },

    /// The tilt limits are inverted or not finite.
    #[error("tilt range [{min}, {max}] is invalid")]
    InvertedTiltRange {
        /// Nose-down limit.
        min: f32,
        /// Nose-up limit.
        max: f32,
    },

    /// A network topology has fewer than two layers or a zero-sized layer.
    #[error("invalid network layer sizes {0:?}")]
    InvalidLayers(Vec<usize>),
}

/// Errors raised while loading or saving JSON documents.
#[derive(Debug, Error)]
pub enum Error {
    /// The document parsed but holds an invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// File system errors.
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or encoding errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
