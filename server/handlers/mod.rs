pub mod capture;
pub mod files;
pub mod home;
pub mod predict;
pub mod upload;

use bloom::Prediction;
use serde::{Deserialize, Serialize};

/// Body returned by `/upload` and `/capture`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    /// URL path the stored image is served from.
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
}

impl UploadResponse {
    pub fn stored(filename: String, message: &str) -> Self {
        UploadResponse {
            success: true,
            message: message.to_owned(),
            file_path: format!("/uploads/{}", filename),
            filename,
            prediction: None,
        }
    }
}
