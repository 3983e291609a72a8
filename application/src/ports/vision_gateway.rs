//! Vision gateway port
//!
//! Defines the interface for communicating with the vision-language
//! inference runtime. Calls are blocking from the caller's point of
//! view and may take seconds; the session store is careful never to
//! hold its table lock across them.

use async_trait::async_trait;
use glance_domain::{ImagePayload, Question, Turn};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during inference operations
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response from model runtime: {0}")]
    InvalidResponse(String),
}

/// Health snapshot reported by the inference runtime
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    /// Pretrained model identifier the runtime is serving
    pub model: String,
    /// Compute device the model runs on
    pub device: String,
    /// Whether the runtime answered the probe
    pub ready: bool,
}

/// Gateway for vision-language inference
///
/// This port defines how the session store reaches the model.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait VisionGateway: Send + Sync {
    /// Generate a caption for a freshly uploaded image
    async fn caption(&self, image: &ImagePayload) -> Result<String, InferenceError>;

    /// Answer a question about the image.
    ///
    /// `history` is the complete prior conversation, replayed to the
    /// model in the exact order the turns were recorded.
    async fn answer(
        &self,
        image: &ImagePayload,
        history: &[Turn],
        question: &Question,
    ) -> Result<String, InferenceError>;

    /// Probe the runtime for reachability and identity
    async fn status(&self) -> Result<ModelStatus, InferenceError>;
}
