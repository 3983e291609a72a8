//! Presentation layer for glance
//!
//! This crate contains the HTTP API: routing, request parsing, JSON
//! response shapes, and error-to-status mapping. It is a thin
//! transport over the session store; the store is the source of truth
//! and clients re-display what these endpoints return.

pub mod api;

pub use api::{AppState, router};
