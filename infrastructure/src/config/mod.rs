//! Configuration loading

pub mod file_config;
pub mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileModelConfig, FileServerConfig, FileSessionConfig,
};
pub use loader::ConfigLoader;
