//! Error types for bloom

use thiserror::Error;

/// Main error type for bloom
#[derive(Error, Debug)]
pub enum BloomError {
    /// Upload exceeds the configured limit
    #[error("File is too large. Maximum size: {max_mb}MB")]
    PayloadTooLarge { max_mb: u64 },

    /// Bytes are not a recognizable image
    #[error("File is not a valid image: {0}")]
    InvalidImage(String),

    /// Bytes looked like an image but could not be decoded
    #[error("Could not decode image: {0}")]
    Decode(String),

    /// Normalization produced an unexpected result
    #[error("Image processing error: {0}")]
    Processing(String),

    /// Model artifact could not be loaded or is malformed
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    /// Forward pass failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bloom operations
pub type Result<T> = std::result::Result<T, BloomError>;

impl From<serde_json::Error> for BloomError {
    fn from(err: serde_json::Error) -> Self {
        BloomError::Checkpoint(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BloomError::PayloadTooLarge { max_mb: 10 };
        assert_eq!(err.to_string(), "File is too large. Maximum size: 10MB");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BloomError = io_err.into();
        assert!(matches!(err, BloomError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: BloomError = json_err.into();
        assert!(matches!(err, BloomError::Checkpoint(_)));
    }
}
