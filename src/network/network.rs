use crate::{activation::activation::ActivationFunction, layers::dense::Layer};
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    pub fn input_size(&self) -> Option<usize> {
        self.layers.first().map(Layer::input_size)
    }

    pub fn output_size(&self) -> Option<usize> {
        self.layers.last().map(|l| l.size)
    }

    pub fn output_activation(&self) -> Option<&ActivationFunction> {
        self.layers.last().map(|l| &l.activator)
    }

    /// Describes the first structural problem found, if any: malformed
    /// matrices or adjacent layers whose sizes do not chain.
    pub fn shape_error(&self) -> Option<String> {
        if self.layers.is_empty() {
            return Some("network has no layers".into());
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if !layer.is_well_formed() {
                return Some(format!("layer {} has inconsistent weight/bias shapes", i));
            }
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[0].size != pair[1].input_size() {
                return Some(format!(
                    "layer {} outputs {} values but layer {} expects {}",
                    i, pair[0].size, i + 1, pair[1].input_size()
                ));
            }
        }
        None
    }

    /// Forward pass. Returns `None` when `input` does not fit the first layer.
    pub fn forward(&self, input: &[f64]) -> Option<Vec<f64>> {
        let (first, rest) = self.layers.split_first()?;
        let mut current = first.feed_from(input)?;
        for layer in rest {
            current = layer.feed_from(&current)?;
        }
        Some(current)
    }
}
