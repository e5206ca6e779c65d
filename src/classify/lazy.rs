use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

use image::DynamicImage;
use tracing::info;

use crate::classify::classifier::{FlowerClassifier, Predictor};
use crate::classify::prediction::Ranking;
use crate::error::Result;

/// Loads a [`FlowerClassifier`] on first use and keeps it for the life of
/// the value.
///
/// Initialization is serialized by a mutex, so concurrent first calls load
/// the checkpoint once. A failed load leaves the cell empty; the next call
/// tries again.
#[derive(Debug)]
pub struct LazyClassifier {
    path: PathBuf,
    cell: OnceLock<FlowerClassifier>,
    init: Mutex<()>,
}

impl LazyClassifier {
    pub fn new(path: impl Into<PathBuf>) -> LazyClassifier {
        LazyClassifier { path: path.into(), cell: OnceLock::new(), init: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the resident classifier, loading it if necessary.
    pub fn get(&self) -> Result<&FlowerClassifier> {
        if let Some(clf) = self.cell.get() {
            return Ok(clf);
        }
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(clf) = self.cell.get() {
            return Ok(clf);
        }

        let clf = FlowerClassifier::load(&self.path)?;
        info!(
            path = %self.path.display(),
            classes = clf.class_names().len(),
            img_size = clf.img_size(),
            "classifier loaded"
        );
        Ok(self.cell.get_or_init(|| clf))
    }
}

impl Predictor for LazyClassifier {
    fn predict_topk(&self, image: &DynamicImage, k: usize) -> Result<Ranking> {
        self.get()?.predict_topk(image, k)
    }
}
