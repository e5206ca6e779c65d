pub mod checkpoint;
pub mod classifier;
pub mod lazy;
pub mod prediction;
pub mod preprocess;

pub use checkpoint::{Checkpoint, DEFAULT_IMG_SIZE};
pub use classifier::{FlowerClassifier, Predictor};
pub use lazy::LazyClassifier;
pub use prediction::{Prediction, Ranking};
