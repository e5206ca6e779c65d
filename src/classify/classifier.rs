use std::collections::BTreeMap;
use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::activation::activation::{softmax, ActivationFunction};
use crate::classify::checkpoint::Checkpoint;
use crate::classify::prediction::{top_k, Prediction, Ranking};
use crate::classify::preprocess::{decode_oriented, image_to_chw_tensor};
use crate::error::{BloomError, Result};
use crate::network::Network;

/// Anything that can rank flower classes for an image.
pub trait Predictor: Send + Sync {
    /// The `k` most probable classes, highest first.
    fn predict_topk(&self, image: &DynamicImage, k: usize) -> Result<Ranking>;

    /// Single best class, as a one-element ranking.
    fn predict(&self, image: &DynamicImage) -> Result<Ranking> {
        self.predict_topk(image, 1)
    }
}

/// A loaded checkpoint ready for inference. Read-only after construction,
/// so one instance can serve any number of threads.
#[derive(Debug)]
pub struct FlowerClassifier {
    network: Network,
    class_names: Vec<String>,
    img_size: u32,
    class_info: BTreeMap<String, BTreeMap<String, String>>,
}

impl FlowerClassifier {
    pub fn load(path: impl AsRef<Path>) -> Result<FlowerClassifier> {
        FlowerClassifier::from_checkpoint(Checkpoint::load(path)?)
    }

    pub fn from_checkpoint(ckpt: Checkpoint) -> Result<FlowerClassifier> {
        ckpt.validate()?;
        let class_names = ckpt.class_names()?;
        Ok(FlowerClassifier {
            network: ckpt.network,
            class_names,
            img_size: ckpt.img_size,
            class_info: ckpt.class_info.unwrap_or_default(),
        })
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Side length images are resized to before the forward pass.
    pub fn img_size(&self) -> u32 {
        self.img_size
    }

    pub fn preprocess(&self, image: &DynamicImage) -> Vec<f64> {
        image_to_chw_tensor(image, self.img_size)
    }

    /// Class probabilities in output-index order.
    pub fn probabilities(&self, image: &DynamicImage) -> Result<Vec<f64>> {
        let input = self.preprocess(image);
        let output = self.network.forward(&input).ok_or_else(|| {
            BloomError::Inference(format!(
                "tensor of {} values does not fit network input of {}",
                input.len(),
                self.network.input_size().unwrap_or(0)
            ))
        })?;
        // A softmax output layer already yields probabilities.
        match self.network.output_activation() {
            Some(ActivationFunction::Softmax) => Ok(output),
            _ => Ok(softmax(&output)),
        }
    }

    /// Decodes (honoring EXIF orientation) and ranks in one step.
    pub fn predict_topk_bytes(&self, bytes: &[u8], k: usize) -> Result<Ranking> {
        let image = decode_oriented(bytes)?;
        self.predict_topk(&image, k)
    }
}

impl Predictor for FlowerClassifier {
    fn predict_topk(&self, image: &DynamicImage, k: usize) -> Result<Ranking> {
        let probs = self.probabilities(image)?;
        let ranking: Ranking = top_k(&probs, k)
            .into_iter()
            .map(|(idx, p)| {
                let label = self.class_names[idx].clone();
                let additional_info = self.class_info.get(&label).cloned();
                Prediction { label, confidence: p, additional_info }
            })
            .collect();
        if let Some(best) = ranking.first() {
            debug!(label = %best.label, confidence = best.confidence, "classified image");
        }
        Ok(ranking)
    }
}
