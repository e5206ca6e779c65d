pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod imaging;
pub mod classify;

// Convenience re-exports
pub use error::{BloomError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::Network;
pub use imaging::{
    normalize_image, normalize_image_default, validate_file_size, validate_image_bytes,
    validate_image_stream, DEFAULT_MAX_UPLOAD_MB, DEFAULT_TARGET_SIZE,
};
pub use classify::{Checkpoint, FlowerClassifier, LazyClassifier, Prediction, Predictor, Ranking};
