use std::io::{Cursor, Read};

use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::debug;

use crate::handlers;
use crate::state::SharedState;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap()
}

pub fn bytes_response(status: u16, content_type: &str, bytes: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    let len = bytes.len();
    Response::new(
        StatusCode(status),
        vec![header("Content-Type", content_type)],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    bytes_response(200, "text/html; charset=utf-8", body.into_bytes())
}

pub fn json_response<T: Serialize>(status: u16, value: &T) -> Response<Cursor<Vec<u8>>> {
    match serde_json::to_vec(value) {
        Ok(body) => bytes_response(status, "application/json", body),
        Err(e) => ApiError::new(500, format!("Could not serialize response: {}", e)).into_response(),
    }
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    ApiError::new(404, "Not Found").into_response()
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Client-facing failure: an HTTP status plus a textual reason, rendered as
/// `{"detail": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: u16,
    pub detail: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl ApiError {
    pub fn new(status: u16, detail: impl Into<String>) -> Self {
        ApiError { status, detail: detail.into() }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        ApiError::new(400, detail)
    }

    pub fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let body = serde_json::to_vec(&ErrorBody { detail: &self.detail })
            .unwrap_or_else(|_| b"{\"detail\":\"error\"}".to_vec());
        bytes_response(self.status, "application/json", body)
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub fn content_type(request: &Request) -> String {
    request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default()
}

/// Reads the request body, refusing anything longer than `limit` bytes.
pub fn read_body(request: &mut Request, limit: u64, max_mb: u64) -> Result<Vec<u8>, ApiError> {
    let mut body = Vec::new();
    request.as_reader()
        .take(limit.saturating_add(1))
        .read_to_end(&mut body)
        .map_err(|e| ApiError::bad_request(format!("Could not read request body: {}", e)))?;
    if body.len() as u64 > limit {
        return Err(ApiError::new(413, bloom::BloomError::PayloadTooLarge { max_mb }.to_string()));
    }
    Ok(body)
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
///
/// Handlers receive a `&mut Request` so that the dispatcher retains
/// ownership and can call `request.respond(response)` at the end.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();

    let (path, query) = match url.split_once('?') {
        Some((p, q)) => (p.to_owned(), q.to_owned()),
        None         => (url.clone(), String::new()),
    };
    debug!(method = %method, path = %path, "request");

    let response = match (&method, path.as_str()) {
        (Method::Get,  "/")                 => handlers::home::handle_get(&state),
        (Method::Get,  "/static/script.js") => handlers::home::handle_script(),
        (Method::Post, "/upload")           => handlers::upload::handle(&mut request, &state),
        (Method::Post, "/capture")          => handlers::capture::handle(&mut request, &state),

        // ── Stored files ─────────────────────────────────────────────────
        (Method::Get, p) if p.starts_with("/uploads/") => {
            let rest = &p["/uploads/".len()..];
            match rest.strip_suffix("/predict") {
                Some(name) => handlers::predict::handle(name, &query, &state),
                None       => handlers::files::handle_get(rest, &state),
            }
        }

        _ => not_found(),
    };

    let _ = request.respond(response);
}
