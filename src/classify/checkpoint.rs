use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BloomError, Result};
use crate::network::Network;

/// Input side assumed when a checkpoint does not record one.
pub const DEFAULT_IMG_SIZE: u32 = 128;

fn default_img_size() -> u32 {
    DEFAULT_IMG_SIZE
}

/// Frozen classifier artifact: trained weights, the label mapping, and the
/// input size used during training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Label → output index. Indices must cover `0..n` exactly once.
    pub class_to_idx: BTreeMap<String, usize>,
    #[serde(default = "default_img_size")]
    pub img_size: u32,
    pub network: Network,
    /// Optional per-label metadata surfaced with predictions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_info: Option<BTreeMap<String, BTreeMap<String, String>>>,
}

impl Checkpoint {
    /// Reads a checkpoint and checks it with [`Checkpoint::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Checkpoint> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            BloomError::Checkpoint(format!("cannot open '{}': {}", path.display(), e))
        })?;
        let ckpt: Checkpoint = serde_json::from_reader(std::io::BufReader::new(file))?;
        ckpt.validate()?;
        Ok(ckpt)
    }

    /// Writes the checkpoint as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)
            .map_err(|e| BloomError::Checkpoint(e.to_string()))
    }

    /// Labels ordered by output index.
    pub fn class_names(&self) -> Result<Vec<String>> {
        let n = self.class_to_idx.len();
        let mut names: Vec<Option<String>> = vec![None; n];
        for (label, &idx) in &self.class_to_idx {
            let slot = names.get_mut(idx).ok_or_else(|| {
                BloomError::Checkpoint(format!("class '{}' has index {} but only {} classes exist", label, idx, n))
            })?;
            if let Some(other) = slot.replace(label.clone()) {
                return Err(BloomError::Checkpoint(format!(
                    "classes '{}' and '{}' share index {}",
                    other, label, idx
                )));
            }
        }
        // n labels into n distinct slots leaves none empty.
        Ok(names.into_iter().flatten().collect())
    }

    /// Checks the label mapping and that the network fits
    /// `3 × img_size × img_size` inputs and one output per class.
    pub fn validate(&self) -> Result<()> {
        if self.class_to_idx.is_empty() {
            return Err(BloomError::Checkpoint("checkpoint declares no classes".into()));
        }
        if self.img_size == 0 {
            return Err(BloomError::Checkpoint("img_size must be positive".into()));
        }
        let names = self.class_names()?;

        if let Some(problem) = self.network.shape_error() {
            return Err(BloomError::Checkpoint(problem));
        }
        let side = self.img_size as usize;
        let expected_in = side
            .checked_mul(side)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| BloomError::Checkpoint(format!("img_size {} is too large", self.img_size)))?;
        let actual_in = self.network.input_size().unwrap_or(0);
        if actual_in != expected_in {
            return Err(BloomError::Checkpoint(format!(
                "network expects {} inputs but img_size {} needs {}",
                actual_in, self.img_size, expected_in
            )));
        }
        let actual_out = self.network.output_size().unwrap_or(0);
        if actual_out != names.len() {
            return Err(BloomError::Checkpoint(format!(
                "network has {} outputs for {} classes",
                actual_out,
                names.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::layers::dense::Layer;
    use crate::math::matrix::Matrix;

    fn tiny(classes: &[(&str, usize)], img_size: u32, outputs: usize) -> Checkpoint {
        let inputs = 3 * (img_size * img_size) as usize;
        Checkpoint {
            class_to_idx: classes.iter().map(|(l, i)| (l.to_string(), *i)).collect(),
            img_size,
            network: Network {
                layers: vec![Layer::from_parts(
                    Matrix::zeros(inputs, outputs),
                    Matrix::zeros(1, outputs),
                    ActivationFunction::Identity,
                )],
            },
            class_info: None,
        }
    }

    #[test]
    fn class_names_follow_indices() {
        let ckpt = tiny(&[("tulip", 1), ("rose", 2), ("daisy", 0)], 2, 3);
        assert_eq!(ckpt.class_names().unwrap(), vec!["daisy", "tulip", "rose"]);
        assert!(ckpt.validate().is_ok());
    }

    #[test]
    fn duplicate_index_is_rejected() {
        let ckpt = tiny(&[("tulip", 0), ("rose", 0)], 2, 2);
        assert!(matches!(ckpt.validate(), Err(BloomError::Checkpoint(_))));
    }

    #[test]
    fn gap_in_indices_is_rejected() {
        let ckpt = tiny(&[("tulip", 0), ("rose", 2)], 2, 2);
        assert!(matches!(ckpt.validate(), Err(BloomError::Checkpoint(_))));
    }

    #[test]
    fn output_count_must_match_classes() {
        let ckpt = tiny(&[("tulip", 0), ("rose", 1)], 2, 3);
        let err = ckpt.validate().unwrap_err();
        assert!(err.to_string().contains("3 outputs for 2 classes"));
    }

    #[test]
    fn input_size_must_match_img_size() {
        let mut ckpt = tiny(&[("tulip", 0)], 2, 1);
        ckpt.img_size = 3;
        assert!(matches!(ckpt.validate(), Err(BloomError::Checkpoint(_))));
    }

    #[test]
    fn oversized_img_size_is_an_error() {
        let mut ckpt = tiny(&[("tulip", 0)], 1, 1);
        ckpt.img_size = 4_000_000_000;
        assert!(matches!(ckpt.validate(), Err(BloomError::Checkpoint(_))));
    }

    #[test]
    fn img_size_defaults_when_missing() {
        let ckpt = tiny(&[("tulip", 0)], 1, 1);
        let mut json = serde_json::to_value(&ckpt).unwrap();
        json.as_object_mut().unwrap().remove("img_size");
        let back: Checkpoint = serde_json::from_value(json).unwrap();
        assert_eq!(back.img_size, DEFAULT_IMG_SIZE);
    }

    #[test]
    fn missing_file_is_a_checkpoint_error() {
        let err = Checkpoint::load("/nonexistent/flowers.json").unwrap_err();
        assert!(matches!(err, BloomError::Checkpoint(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ckpt.json");
        let ckpt = tiny(&[("tulip", 0), ("rose", 1)], 1, 2);
        ckpt.save(&path).unwrap();
        let back = Checkpoint::load(&path).unwrap();
        assert_eq!(back.class_to_idx, ckpt.class_to_idx);
        assert_eq!(back.img_size, 1);
        assert_eq!(back.network.output_size(), Some(2));
    }
}
