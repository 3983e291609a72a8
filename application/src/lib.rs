//! Application layer for glance
//!
//! This crate contains the port definitions, the session store core,
//! and the background reaper. It depends only on the domain layer.

pub mod ports;
pub mod reaper;
pub mod store;

// Re-export commonly used types
pub use ports::{
    clock::{Clock, SystemClock},
    vision_gateway::{InferenceError, ModelStatus, VisionGateway},
};
pub use reaper::spawn_reaper;
pub use store::{SessionStore, StoreConfig, StoreError};
