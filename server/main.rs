//! bloom server
//!
//! Accepts uploaded or camera-captured flower photos, normalizes them to a
//! square JPEG thumbnail, stores them in a flat directory, and can rank the
//! stored images with a lazily loaded classifier checkpoint.
//! Served by a synchronous tiny_http server.
//!
//! Run with:
//!   cargo run --bin bloom-server --release
//! Then open http://127.0.0.1:8000
//!
//! Routes:
//!   GET  /                          home page
//!   POST /upload                    multipart `file` (+ optional `use_camera`)
//!   POST /capture                   form field `image_data` (base64 / data URL)
//!   GET  /uploads/{name}            stored JPEG
//!   GET  /uploads/{name}/predict    top-k classes for a stored image

mod config;
mod handlers;
mod render;
mod routes;
mod state;
mod store;
mod util;


use std::sync::Arc;

use clap::Parser;
use tiny_http::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use state::{AppState, SharedState};

fn main() {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    if let Err(e) = run(&config) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    std::fs::create_dir_all(&config.upload_dir)
        .map_err(|e| format!("cannot create upload directory '{}': {}", config.upload_dir.display(), e))?;

    let server = Server::http(&config.addr)
        .map_err(|e| format!("failed to bind HTTP server on {}: {}", config.addr, e))?;
    let state = Arc::new(AppState::from_config(config));

    info!("Starting bloom server v{}", env!("CARGO_PKG_VERSION"));
    info!("Listening on http://{}", config.addr);
    info!(
        upload_dir = %state.upload_dir.display(),
        ckpt_path = %state.classifier.path().display(),
        max_upload_mb = state.max_upload_mb,
        target_size = state.target_size,
        "configuration"
    );

    serve(server, state);
    Ok(())
}

/// Accept loop. Each request is dispatched on its own thread.
fn serve(server: Server, state: SharedState) {
    for request in server.incoming_requests() {
        let state_clone = state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
}
