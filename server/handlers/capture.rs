use std::io::Cursor;
use tiny_http::{Request, Response};
use tracing::{info, warn};

use bloom::imaging::{normalize_image, validate_file_size, validate_image_bytes};
use bloom::BloomError;

use crate::handlers::UploadResponse;
use crate::routes::{content_type, json_response, read_body, ApiError};
use crate::state::AppState;
use crate::store;
use crate::util::data_url::decode_data_url;
use crate::util::form::{form_get, parse_form};
use crate::util::multipart::{extract_boundary, extract_text_field};

// ---------------------------------------------------------------------------
// POST /capture
// ---------------------------------------------------------------------------

pub fn handle(request: &mut Request, state: &AppState) -> Response<Cursor<Vec<u8>>> {
    match receive(request, state) {
        Ok(resp) => json_response(200, &resp),
        Err(e) => {
            warn!(status = e.status, detail = %e.detail, "capture rejected");
            e.into_response()
        }
    }
}

fn receive(request: &mut Request, state: &AppState) -> Result<UploadResponse, ApiError> {
    let content_type = content_type(request);
    // base64 inflates by 4/3; percent-encoding and headers add a little more.
    let limit = state.max_upload_bytes().saturating_mul(2).saturating_add(64 * 1024);
    let body = read_body(request, limit, state.max_upload_mb)?;

    let image_data = match extract_boundary(&content_type) {
        Some(boundary) => extract_text_field(&body, &boundary, "image_data"),
        None => {
            let text = String::from_utf8_lossy(&body);
            form_get(&parse_form(&text), "image_data").map(str::to_owned)
        }
    }
    .ok_or_else(|| ApiError::bad_request("Missing form field 'image_data'."))?;

    capture_image(state, &image_data)
}

/// Decodes, validates, normalizes and stores one camera frame.
pub fn capture_image(state: &AppState, image_data: &str) -> Result<UploadResponse, ApiError> {
    let bytes = decode_data_url(image_data).map_err(capture_error)?;
    validate_file_size(bytes.len() as u64, state.max_upload_mb).map_err(capture_error)?;
    validate_image_bytes(&bytes).map_err(capture_error)?;

    let processed = normalize_image(&bytes, state.target_size).map_err(capture_error)?;
    let filename = store::save(&state.upload_dir, store::DEFAULT_EXTENSION, &processed)
        .map_err(|e| capture_error(e.into()))?;

    info!(filename = %filename, "camera capture processed");
    Ok(UploadResponse::stored(filename, "Camera photo processed successfully"))
}

/// Every capture failure is reported as a bad request, except the size limit.
fn capture_error(err: BloomError) -> ApiError {
    match err {
        BloomError::PayloadTooLarge { .. } => ApiError::new(413, err.to_string()),
        other => ApiError::bad_request(format!("Could not process camera photo: {}", other)),
    }
}
