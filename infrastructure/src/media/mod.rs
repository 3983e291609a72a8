//! Image upload handling

pub mod decoder;

pub use decoder::{DEFAULT_MAX_UPLOAD_BYTES, DecodeError, decode_data_url, decode_image};
