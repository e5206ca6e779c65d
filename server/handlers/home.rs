use std::io::Cursor;
use tiny_http::Response;

use crate::render::{render_home, SCRIPT};
use crate::state::AppState;

/// `GET /`
pub fn handle_get(state: &AppState) -> Response<Cursor<Vec<u8>>> {
    crate::routes::html_response(render_home(state.max_upload_mb, state.target_size))
}

/// `GET /static/script.js`
pub fn handle_script() -> Response<Cursor<Vec<u8>>> {
    crate::routes::bytes_response(200, "application/javascript; charset=utf-8", SCRIPT.as_bytes().to_vec())
}
