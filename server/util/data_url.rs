use base64::{engine::general_purpose, Engine as _};

use bloom::BloomError;

/// Decodes a base64 image payload as sent by a browser canvas.
///
/// Everything up to and including the first `,` is a data-URL header
/// (`data:image/png;base64,`) and is dropped. Whitespace inside the payload
/// is ignored.
pub fn decode_data_url(data: &str) -> Result<Vec<u8>, BloomError> {
    let payload = data.split_once(',').map_or(data, |(_, rest)| rest);
    let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(BloomError::Decode("empty image payload".into()));
    }
    general_purpose::STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| BloomError::Decode(format!("invalid base64 payload: {}", e)))
}
