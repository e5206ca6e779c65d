use std::path::PathBuf;
use std::sync::Arc;

use bloom::LazyClassifier;

use crate::config::Config;

/// Everything a handler needs. Immutable apart from the classifier's
/// one-time load, so it is shared without a lock.
#[derive(Debug)]
pub struct AppState {
    /// Flat directory of stored thumbnails.
    pub upload_dir: PathBuf,
    pub max_upload_mb: u64,
    /// Side length of stored thumbnails.
    pub target_size: u32,
    /// Loaded on the first prediction request.
    pub classifier: LazyClassifier,
}

impl AppState {
    pub fn new(upload_dir: impl Into<PathBuf>, max_upload_mb: u64, target_size: u32, ckpt_path: impl Into<PathBuf>) -> Self {
        AppState {
            upload_dir: upload_dir.into(),
            max_upload_mb,
            target_size,
            classifier: LazyClassifier::new(ckpt_path),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        AppState::new(&config.upload_dir, config.max_upload_mb, config.target_size, &config.ckpt_path)
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Shared state type, an `Arc<AppState>` passed to every handler.
pub type SharedState = Arc<AppState>;
