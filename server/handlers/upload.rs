use std::io::Cursor;
use tiny_http::{Request, Response};
use tracing::{info, warn};

use bloom::imaging::{normalize_image, validate_file_size, validate_image_bytes};
use bloom::BloomError;

use crate::handlers::UploadResponse;
use crate::routes::{content_type, json_response, read_body, ApiError};
use crate::state::AppState;
use crate::store;
use crate::util::form::parse_flag;
use crate::util::multipart::{extract_boundary, extract_text_field, find_part};

/// Room for multipart headers and boundaries on top of the file itself.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

// ---------------------------------------------------------------------------
// POST /upload
// ---------------------------------------------------------------------------

pub fn handle(request: &mut Request, state: &AppState) -> Response<Cursor<Vec<u8>>> {
    match receive(request, state) {
        Ok(resp) => json_response(200, &resp),
        Err(e) => {
            warn!(status = e.status, detail = %e.detail, "upload rejected");
            e.into_response()
        }
    }
}

fn receive(request: &mut Request, state: &AppState) -> Result<UploadResponse, ApiError> {
    let content_type = content_type(request);
    let boundary = extract_boundary(&content_type)
        .ok_or_else(|| ApiError::bad_request("Expected a multipart/form-data request."))?;

    let limit = state.max_upload_bytes().saturating_add(MULTIPART_OVERHEAD);
    let body = read_body(request, limit, state.max_upload_mb)?;

    let file = find_part(&body, &boundary, "file")
        .ok_or_else(|| ApiError::bad_request("Missing form field 'file'."))?;
    let use_camera = extract_text_field(&body, &boundary, "use_camera")
        .map(|v| parse_flag(&v))
        .unwrap_or(false);

    upload_image(state, &file.data, file.filename.as_deref(), use_camera)
}

/// Validates, normalizes and stores one uploaded image.
pub fn upload_image(
    state: &AppState,
    bytes: &[u8],
    original_name: Option<&str>,
    use_camera: bool,
) -> Result<UploadResponse, ApiError> {
    validate_file_size(bytes.len() as u64, state.max_upload_mb).map_err(upload_error)?;
    validate_image_bytes(bytes).map_err(upload_error)?;

    let extension = store::stored_extension(original_name);
    let processed = normalize_image(bytes, state.target_size).map_err(upload_error)?;
    let filename = store::save(&state.upload_dir, &extension, &processed)
        .map_err(|e| upload_error(e.into()))?;

    info!(filename = %filename, use_camera, "upload processed");
    Ok(UploadResponse::stored(filename, "Image uploaded and processed successfully"))
}

/// Validation problems are the client's fault; anything after that is ours.
fn upload_error(err: BloomError) -> ApiError {
    match err {
        BloomError::PayloadTooLarge { .. } => ApiError::new(413, err.to_string()),
        BloomError::InvalidImage(_) => ApiError::bad_request("File is not a valid image"),
        BloomError::Decode(_) => ApiError::bad_request(err.to_string()),
        other => ApiError::new(500, format!("Could not process image: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    fn state(dir: &std::path::Path, max_mb: u64) -> AppState {
        AppState::new(dir, max_mb, 224, dir.join("none.json"))
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 90])
        }));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn stores_normalized_jpeg_under_original_extension() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(dir.path(), 10);

        let resp = upload_image(&st, &png(500, 300), Some("garden.png"), false).unwrap();
        assert!(resp.success);
        assert!(resp.filename.ends_with(".png"));
        assert_eq!(resp.file_path, format!("/uploads/{}", resp.filename));

        let stored = std::fs::read(dir.path().join(&resp.filename)).unwrap();
        assert_eq!(image::guess_format(&stored).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&stored).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (224, 224));
    }

    #[test]
    fn missing_name_defaults_to_jpg() {
        let dir = tempfile::tempdir().unwrap();
        let resp = upload_image(&state(dir.path(), 10), &png(10, 10), None, true).unwrap();
        assert!(resp.filename.ends_with(".jpg"));
    }

    #[test]
    fn non_image_is_rejected_and_nothing_is_stored() {
        let dir = tempfile::tempdir().unwrap();
        let err = upload_image(&state(dir.path(), 10), b"just text", Some("a.jpg"), false).unwrap_err();
        assert_eq!(err.status, 400);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let big = vec![0u8; 1024 * 1024 + 1];
        let err = upload_image(&state(dir.path(), 1), &big, None, false).unwrap_err();
        assert_eq!(err.status, 413);
        assert!(err.detail.contains("1MB"));
    }

    #[test]
    fn truncated_image_is_a_client_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = png(50, 50);
        bytes.truncate(40);
        let err = upload_image(&state(dir.path(), 10), &bytes, None, false).unwrap_err();
        assert_eq!(err.status, 400);
    }

    #[test]
    fn unwritable_store_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(&dir.path().join("does-not-exist"), 10);
        let err = upload_image(&st, &png(8, 8), None, false).unwrap_err();
        assert_eq!(err.status, 500);
    }
}
