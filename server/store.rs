//! Flat file store for normalized images. Names are fresh UUIDs, files are
//! written once and never touched again.

use std::io;
use std::path::Path;

use tracing::info;
use uuid::Uuid;

/// Extension used when the client supplies none we can trust.
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Rejects empty names and anything that could leave the store directory.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
        && !name.contains('\0')
}

/// Extension (with leading dot) of the client's filename, or
/// [`DEFAULT_EXTENSION`] when it is missing or not short ASCII alphanumerics.
pub fn stored_extension(original_name: Option<&str>) -> String {
    original_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_owned())
}

/// Writes `bytes` under a new random name and returns that name.
pub fn save(dir: &Path, extension: &str, bytes: &[u8]) -> io::Result<String> {
    let filename = format!("{}{}", Uuid::new_v4(), extension);
    std::fs::write(dir.join(&filename), bytes)?;
    info!(filename = %filename, bytes = bytes.len(), "stored image");
    Ok(filename)
}

/// Reads a stored file. `Ok(None)` when the name is unsafe or absent.
pub fn load(dir: &Path, name: &str) -> io::Result<Option<Vec<u8>>> {
    if !is_safe_name(name) {
        return Ok(None);
    }
    match std::fs::read(dir.join(name)) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
