//! Domain layer for glance
//!
//! This crate contains the core entities and value objects for the
//! visual question answering service. It has no dependencies on
//! infrastructure or transport concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A session binds one uploaded image to its generated caption and the
//! accumulated question/answer history. The image never changes after
//! creation, history only grows, and the session id is an unguessable
//! bearer capability for follow-up questions.
//!
//! ## Turn
//!
//! One question/answer exchange. Turns are replayed into the model in
//! insertion order, which is the one ordering guarantee the whole
//! system depends on.

pub mod core;
pub mod image;
pub mod session;

// Re-export commonly used types
pub use core::{error::DomainError, model::ModelSize, question::Question};
pub use image::ImagePayload;
pub use session::{
    entities::{Session, Turn},
    id::SessionId,
};
