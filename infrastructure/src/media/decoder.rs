//! Image upload decoding
//!
//! Uploaded bytes are fully decoded before a session is created, so a
//! payload that reaches the store is known to be a valid raster image.
//! Two entry points: raw bytes from a multipart upload, and the paste
//! path where the browser hands over a data URL or bare base64.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use glance_domain::ImagePayload;
use image::ImageFormat;
use thiserror::Error;

/// Default maximum accepted upload size (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Raster formats the service accepts
const SUPPORTED_FORMATS: [ImageFormat; 6] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::WebP,
    ImageFormat::Gif,
];

/// Errors raised while decoding an upload
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Empty image payload")]
    Empty,

    #[error("Image too large: {0} bytes (max: {1})")]
    TooLarge(usize, usize),

    #[error("Unsupported or unrecognized image format")]
    UnsupportedFormat,

    #[error("Malformed image data: {0}")]
    Malformed(String),

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// Decode raw upload bytes into a validated payload
pub fn decode_image(bytes: &[u8], max_bytes: usize) -> Result<ImagePayload, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(DecodeError::TooLarge(bytes.len(), max_bytes));
    }

    let format = image::guess_format(bytes).map_err(|_| DecodeError::UnsupportedFormat)?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(DecodeError::UnsupportedFormat);
    }

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    Ok(ImagePayload::new(
        bytes.to_vec(),
        format.to_mime_type(),
        decoded.width(),
        decoded.height(),
    ))
}

/// Decode a pasted data URL (`data:image/png;base64,...`) or bare base64
pub fn decode_data_url(data: &str, max_bytes: usize) -> Result<ImagePayload, DecodeError> {
    let trimmed = data.trim();
    let encoded = match trimmed.strip_prefix("data:") {
        Some(rest) => {
            rest.split_once(',')
                .ok_or_else(|| {
                    DecodeError::InvalidBase64("data URL missing ',' separator".to_string())
                })?
                .1
        }
        None => trimmed,
    };

    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
    decode_image(&bytes, max_bytes)
}
