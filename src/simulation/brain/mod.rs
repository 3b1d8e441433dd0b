//! Feed-forward network used as the reference jump policy.
//!
//! The engine only needs something that maps an observation to a jump
//! propensity; this small tanh MLP fills that role for headless runs and
//! tests. Training happens outside this crate.

use ndarray::Array1;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

pub mod mlp;

pub use mlp::Mlp;

/// Multi-layer perceptron with tanh activation on every layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Ordered layers from input to output.
    pub layers: Vec<Mlp>,
}

impl Brain {
    /// Creates a brain with weights in `[-scale, scale)` drawn from a seeded generator.
    ///
    /// # Arguments
    ///
    /// * `layer_sizes` - Neuron counts from input to output, at least two entries
    /// * `scale` - Half-width of the uniform weight distribution, finite and positive
    /// * `seed` - Seed for the weight generator
    pub fn new(layer_sizes: &[usize], scale: f32, seed: u64) -> Result<Self, ConfigError> {
        if layer_sizes.len() < 2 || layer_sizes.contains(&0) {
            return Err(ConfigError::InvalidLayers(layer_sizes.to_vec()));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ConfigError::NotPositive {
                name: "scale",
                value: scale,
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let layers = layer_sizes
            .windows(2)
            .map(|pair| Mlp::new_random(pair[0], pair[1], scale, &mut rng))
            .collect();

        Ok(Self { layers })
    }

    /// Builds a brain from explicit layers.
    pub fn from_layers(layers: Vec<Mlp>) -> Result<Self, ConfigError> {
        let chained = layers
            .windows(2)
            .all(|pair| pair[0].output_size() == pair[1].input_size());
        if layers.is_empty() || !chained {
            let sizes = layers.iter().map(Mlp::output_size).collect();
            return Err(ConfigError::InvalidLayers(sizes));
        }
        Ok(Self { layers })
    }

    /// Number of inputs the first layer expects.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Mlp::input_size)
    }

    /// Runs a forward pass through the brain.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    fn same_seed_same_weights() {
        let a = Brain::new(&[3, 5, 1], 1.0, 42).unwrap();
        let b = Brain::new(&[3, 5, 1], 1.0, 42).unwrap();
        let c = Brain::new(&[3, 5, 1], 1.0, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.input_size(), 3);
    }

    #[test]
    fn rejects_degenerate_topologies() {
        assert!(Brain::new(&[3], 1.0, 0).is_err());
        assert!(Brain::new(&[3, 0, 1], 1.0, 0).is_err());
    }

    #[test]
    fn rejects_unusable_weight_scales() {
        for scale in [0.0, -1.0, f32::INFINITY] {
            assert!(matches!(
                Brain::new(&[3, 2, 1], scale, 1),
                Err(ConfigError::NotPositive { name: "scale", .. })
            ));
        }
        assert!(matches!(
            Brain::new(&[3, 2, 1], f32::NAN, 1),
            Err(ConfigError::NotPositive { name: "scale", value }) if value.is_nan()
        ));
    }

    #[test]
    fn forward_pass_applies_tanh() {
        let layer = Mlp {
            weights: Array2::from_shape_vec((1, 2), vec![1.0, -1.0]).unwrap(),
            biases: array![0.5],
        };
        let brain = Brain::from_layers(vec![layer]).unwrap();
        let out = brain.think(&array![2.0, 1.0]);
        assert!((out[0] - 1.5f32.tanh()).abs() < 1e-6);
    }
}
