use std::io::Cursor;

use serde::Serialize;
use tiny_http::Response;
use tracing::{error, warn};

use bloom::{BloomError, Ranking};

use crate::routes::{json_response, ApiError};
use crate::state::AppState;
use crate::store;
use crate::util::form::{form_get, parse_form, path_decode};

/// Number of classes returned when the query does not say.
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub filename: String,
    pub predictions: Ranking,
}

/// `GET /uploads/{filename}/predict?k=N`
pub fn handle(raw_name: &str, query: &str, state: &AppState) -> Response<Cursor<Vec<u8>>> {
    let name = path_decode(raw_name);
    let pairs = parse_form(query);
    let k = match form_get(&pairs, "k") {
        None => DEFAULT_TOP_K,
        Some(v) => match v.trim().parse::<usize>() {
            Ok(k) => k,
            Err(_) => return ApiError::bad_request("Query parameter 'k' must be a non-negative integer").into_response(),
        },
    };

    match predict_stored(state, &name, k) {
        Ok(predictions) => json_response(200, &PredictResponse { filename: name, predictions }),
        Err(e) => e.into_response(),
    }
}

/// Ranks the classes for a stored image, loading the classifier on first use.
pub fn predict_stored(state: &AppState, name: &str, k: usize) -> Result<Ranking, ApiError> {
    let bytes = match store::load(&state.upload_dir, name) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Err(ApiError::new(404, "File not found")),
        Err(e) => {
            error!(filename = %name, error = %e, "could not read stored file");
            return Err(ApiError::new(500, "Could not read file"));
        }
    };

    let classifier = state.classifier.get().map_err(|e| {
        warn!(path = %state.classifier.path().display(), error = %e, "classifier unavailable");
        ApiError::new(503, format!("Classifier unavailable: {}", e))
    })?;

    classifier.predict_topk_bytes(&bytes, k).map_err(|e| match e {
        BloomError::Decode(_) => ApiError::bad_request(e.to_string()),
        other => ApiError::new(500, other.to_string()),
    })
}
