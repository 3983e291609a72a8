//! Inference runtime adapters

pub mod openai_vision;

pub use openai_vision::OpenAiVisionGateway;
