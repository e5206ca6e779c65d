use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Fully connected layer: `a = activation(x · W + b)`.
///
/// `weights` is `input_size × size`, `biases` is `1 × size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer{
    pub size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction
}

impl Layer {
    pub fn from_parts(weights: Matrix, biases: Matrix, activation: ActivationFunction) -> Layer {
        Layer { size: weights.cols, weights, biases, activator: activation }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Checks that weights, biases and `size` agree with each other.
    pub fn is_well_formed(&self) -> bool {
        self.weights.is_well_formed()
            && self.biases.is_well_formed()
            && self.weights.cols == self.size
            && self.biases.rows == 1
            && self.biases.cols == self.size
    }

    /// Forward step. Returns `None` if `input` does not match the fan-in.
    pub fn feed_from(&self, input: &[f64]) -> Option<Vec<f64>> {
        let mut z = self.weights.left_mul(input)?;
        for (zi, b) in z.iter_mut().zip(self.biases.data.first()?.iter()) {
            *zi += b;
        }
        self.activator.apply(&mut z);
        Some(z)
    }
}
