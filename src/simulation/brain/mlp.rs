//! Multi-layer perceptron layer.

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::Uniform;
use serde::{Deserialize, Serialize};

/// A single fully connected layer with tanh activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Creates a new layer with weights and biases drawn from `[-scale, scale)`.
    ///
    /// `scale` must be finite and positive; [`Brain::new`](super::Brain::new) checks it.
    pub fn new_random<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        scale: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            weights: Array2::random_using(
                (output_size, input_size),
                Uniform::new(-scale, scale),
                rng,
            ),
            biases: Array1::random_using(output_size, Uniform::new(-scale, scale), rng),
        }
    }

    /// Number of inputs the layer expects.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs the layer produces.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Performs forward pass with tanh activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(f32::tanh);
        output
    }
}
