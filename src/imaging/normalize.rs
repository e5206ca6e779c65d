use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

use crate::error::{BloomError, Result};

/// Side length of the stored thumbnails unless the caller asks otherwise.
pub const DEFAULT_TARGET_SIZE: u32 = 224;

/// JPEG quality (0-100) used for every re-encode.
pub const JPEG_QUALITY: u8 = 85;

/// Pixel box `[left, right) x [top, bottom)` selected from a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Centered square box sized to the shorter side of a `width × height` image.
///
/// Offsets use floor division, so an odd margin leaves the extra pixel on the
/// right/bottom edge.
pub fn center_square_crop_box(width: u32, height: u32) -> CropBox {
    let size = width.min(height);
    let left = (width - size) / 2;
    let top = (height - size) / 2;
    CropBox { left, top, right: left + size, bottom: top + size }
}

/// Decodes `bytes` with format auto-detection.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(bytes).map_err(|e| BloomError::Decode(e.to_string()))?;
    if img.width() == 0 || img.height() == 0 {
        return Err(BloomError::Decode(format!(
            "image has zero area ({}x{})",
            img.width(),
            img.height()
        )));
    }
    Ok(img)
}

/// Drops alpha by converting to RGB. Grayscale stays single-channel; every
/// other layout becomes 8-bit RGB since JPEG only stores 8-bit L or RGB.
fn jpeg_compatible(img: &DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageLuma16(_) => DynamicImage::ImageLuma8(img.to_luma8()),
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}

/// Produces the `target × target` thumbnail of an already decoded image.
///
/// The result is 8-bit luma for grayscale sources and 8-bit RGB otherwise.
/// It is cropped to its centered square, then resampled with Lanczos3.
pub fn square_thumbnail(img: &DynamicImage, target: u32) -> Result<DynamicImage> {
    if target == 0 {
        return Err(BloomError::Processing("target size must be positive".into()));
    }

    let mut base = jpeg_compatible(img);
    let (width, height) = (base.width(), base.height());
    debug!(width, height, color = ?base.color(), "original size");

    if width != height {
        let crop = center_square_crop_box(width, height);
        debug!(?crop, "cropping to square");
        base = base.crop_imm(crop.left, crop.top, crop.width(), crop.height());
    }

    let (new_width, new_height) = (base.width(), base.height());
    if new_width != new_height {
        let side = new_width.min(new_height);
        tracing::warn!(new_width, new_height, "image still not square after crop");
        base = base.resize_exact(side, side, FilterType::Lanczos3);
    }

    debug!(target, "resizing to target size");
    let resized = base.resize_exact(target, target, FilterType::Lanczos3);

    let (final_width, final_height) = (resized.width(), resized.height());
    if final_width != target || final_height != target {
        return Err(BloomError::Processing(format!(
            "final image size is {}x{}, expected {}x{}",
            final_width, final_height, target, target
        )));
    }
    Ok(resized)
}

/// Encodes an 8-bit luma or RGB bitmap as JPEG at [`JPEG_QUALITY`].
pub fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY))
        .map_err(|e| BloomError::Processing(format!("JPEG encoding failed: {}", e)))?;
    Ok(buffer)
}

/// Turns raw encoded image bytes into a `target × target` JPEG thumbnail.
pub fn normalize_image(bytes: &[u8], target: u32) -> Result<Vec<u8>> {
    if target == 0 {
        return Err(BloomError::Processing("target size must be positive".into()));
    }
    let img = decode_image(bytes)?;
    let thumb = square_thumbnail(&img, target)?;
    encode_jpeg(&thumb)
}

/// [`normalize_image`] at [`DEFAULT_TARGET_SIZE`].
pub fn normalize_image_default(bytes: &[u8]) -> Result<Vec<u8>> {
    normalize_image(bytes, DEFAULT_TARGET_SIZE)
}
