use std::io::Cursor;
use tiny_http::Response;
use tracing::error;

use crate::routes::{bytes_response, ApiError};
use crate::state::AppState;
use crate::store;
use crate::util::form::path_decode;

/// `GET /uploads/{filename}`
///
/// Serves a stored image verbatim. Names with path separators or `..` are
/// treated as missing.
pub fn handle_get(raw_name: &str, state: &AppState) -> Response<Cursor<Vec<u8>>> {
    let name = path_decode(raw_name);
    match store::load(&state.upload_dir, &name) {
        Ok(Some(bytes)) => bytes_response(200, "image/jpeg", bytes),
        Ok(None) => ApiError::new(404, "File not found").into_response(),
        Err(e) => {
            error!(filename = %name, error = %e, "could not read stored file");
            ApiError::new(500, "Could not read file").into_response()
        }
    }
}
