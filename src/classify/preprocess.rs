//! Image → tensor conversion matching the transform the flower classifier
//! was trained with: upright orientation, RGB, bicubic resize to the
//! checkpoint's `img_size`, channel-major floats in [0, 1].

use std::io::Cursor;

use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::error::{BloomError, Result};

/// Decodes `bytes` and rotates/flips the result according to any EXIF
/// orientation tag. Images without the tag are returned as stored.
pub fn decode_oriented(bytes: &[u8]) -> Result<DynamicImage> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| BloomError::Decode(e.to_string()))?
        .into_decoder()
        .map_err(|e| BloomError::Decode(e.to_string()))?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| BloomError::Decode(e.to_string()))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Resizes to `size × size` (Catmull-Rom) and flattens as all R values, then
/// all G, then all B, each normalized to [0, 1].
///
/// Returns a `Vec<f64>` of length `3 * size * size`.
pub fn image_to_chw_tensor(img: &DynamicImage, size: u32) -> Vec<f64> {
    let rgb = img.resize_exact(size, size, FilterType::CatmullRom).to_rgb8();
    let plane = (size * size) as usize;
    let mut tensor = vec![0.0; 3 * plane];
    for (i, p) in rgb.pixels().enumerate() {
        for c in 0..3 {
            tensor[c * plane + i] = p.0[c] as f64 / 255.0;
        }
    }
    tensor
}
