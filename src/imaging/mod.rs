pub mod normalize;
pub mod validate;

pub use normalize::{
    center_square_crop_box, decode_image, encode_jpeg, normalize_image, normalize_image_default,
    square_thumbnail, CropBox, DEFAULT_TARGET_SIZE, JPEG_QUALITY,
};
pub use validate::{
    validate_file_size, validate_image_bytes, validate_image_stream, DEFAULT_MAX_UPLOAD_MB,
};
