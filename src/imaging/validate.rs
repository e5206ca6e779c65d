use std::io::{BufRead, Cursor, Seek, SeekFrom};

use image::ImageReader;

use crate::error::{BloomError, Result};

/// Upload limit applied when the caller does not configure one.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 10;

/// Fails with `PayloadTooLarge` when `len` exceeds `max_mb` mebibytes.
pub fn validate_file_size(len: u64, max_mb: u64) -> Result<()> {
    let max_bytes = max_mb.saturating_mul(1024 * 1024);
    if len > max_bytes {
        return Err(BloomError::PayloadTooLarge { max_mb });
    }
    Ok(())
}

/// Checks that `bytes` start with a recognizable image header and returns
/// its dimensions. Pixel data is not decoded.
pub fn validate_image_bytes(bytes: &[u8]) -> Result<(u32, u32)> {
    validate_image_stream(&mut Cursor::new(bytes))
}

/// Like [`validate_image_bytes`] but reads from a seekable stream.
///
/// The stream is returned to the position it had on entry whether or not
/// validation succeeds.
pub fn validate_image_stream<R: BufRead + Seek>(reader: &mut R) -> Result<(u32, u32)> {
    let start = reader.stream_position()?;
    let outcome = probe_dimensions(&mut *reader);
    reader.seek(SeekFrom::Start(start))?;
    outcome
}

fn probe_dimensions<R: BufRead + Seek>(reader: R) -> Result<(u32, u32)> {
    let probe = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(|e| BloomError::InvalidImage(e.to_string()))?;
    if probe.format().is_none() {
        return Err(BloomError::InvalidImage("unrecognized image format".into()));
    }
    let (width, height) = probe
        .into_dimensions()
        .map_err(|e| BloomError::InvalidImage(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(BloomError::InvalidImage(format!("image has zero area ({}x{})", width, height)));
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Read;

    fn tiny_png() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([1, 2, 3])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(validate_file_size(10 * 1024 * 1024, 10).is_ok());
        let err = validate_file_size(10 * 1024 * 1024 + 1, 10).unwrap_err();
        assert!(matches!(err, BloomError::PayloadTooLarge { max_mb: 10 }));
    }

    #[test]
    fn empty_payload_passes_size_check() {
        assert!(validate_file_size(0, DEFAULT_MAX_UPLOAD_MB).is_ok());
    }

    #[test]
    fn one_pixel_png_is_valid() {
        assert_eq!(validate_image_bytes(&tiny_png()).unwrap(), (1, 1));
    }

    #[test]
    fn webp_and_tiff_are_accepted() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(5, 4, Rgb([40, 120, 200])));
        for format in [ImageFormat::WebP, ImageFormat::Tiff] {
            let mut out = Cursor::new(Vec::new());
            img.write_to(&mut out, format).unwrap();
            let bytes = out.into_inner();
            assert_eq!(validate_image_bytes(&bytes).unwrap(), (5, 4), "{:?}", format);
            assert!(crate::imaging::normalize_image(&bytes, 8).is_ok(), "{:?}", format);
        }
    }

    #[test]
    fn text_is_not_an_image() {
        let err = validate_image_bytes(b"hello, this is plain text").unwrap_err();
        assert!(matches!(err, BloomError::InvalidImage(_)));
    }

    #[test]
    fn empty_bytes_are_not_an_image() {
        assert!(matches!(validate_image_bytes(&[]), Err(BloomError::InvalidImage(_))));
    }

    #[test]
    fn stream_position_is_restored() {
        let mut data = b"prefix".to_vec();
        data.extend_from_slice(&tiny_png());
        let mut cursor = Cursor::new(data);
        cursor.seek(SeekFrom::Start(6)).unwrap();

        validate_image_stream(&mut cursor).unwrap();
        assert_eq!(cursor.position(), 6);

        let mut rest = Vec::new();
        cursor.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, tiny_png());
    }

    #[test]
    fn stream_position_is_restored_on_failure() {
        let mut cursor = Cursor::new(b"not an image at all".to_vec());
        assert!(validate_image_stream(&mut cursor).is_err());
        assert_eq!(cursor.position(), 0);
    }
}
