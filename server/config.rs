use std::path::PathBuf;

use bloom::{DEFAULT_MAX_UPLOAD_MB, DEFAULT_TARGET_SIZE};
use clap::Parser;

/// bloom-server - flower photo intake service
#[derive(Parser, Debug, Clone)]
#[command(name = "bloom-server")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Address to bind the HTTP server
    #[arg(long, env = "BLOOM_ADDR", default_value = "127.0.0.1:8000")]
    pub addr: String,

    /// Directory normalized images are written to
    #[arg(long, env = "BLOOM_UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Path to the frozen classifier checkpoint (JSON)
    #[arg(long, env = "CKPT_PATH", default_value = "checkpoints/flower_classifier.json")]
    pub ckpt_path: PathBuf,

    /// Largest accepted image, in megabytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    pub max_upload_mb: u64,

    /// Side length of stored thumbnails
    #[arg(long, default_value_t = DEFAULT_TARGET_SIZE,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub target_size: u32,
}
