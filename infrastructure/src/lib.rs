//! Infrastructure layer for glance
//!
//! This crate contains adapters that implement the ports defined in
//! the application layer: the OpenAI-compatible vision gateway, image
//! upload decoding, and configuration file loading.

pub mod config;
pub mod media;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileModelConfig, FileServerConfig,
    FileSessionConfig,
};
pub use media::{DEFAULT_MAX_UPLOAD_BYTES, DecodeError, decode_data_url, decode_image};
pub use providers::OpenAiVisionGateway;
