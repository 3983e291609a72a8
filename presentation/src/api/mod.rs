//! HTTP API surface

pub mod dto;
pub mod error;
mod handlers;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use glance_application::{SessionStore, VisionGateway};
use std::sync::Arc;

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub gateway: Arc<dyn VisionGateway>,
    pub max_upload_bytes: usize,
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    // Leave headroom for multipart framing and base64 growth on top of
    // the raw image limit.
    let body_limit = state.max_upload_bytes * 2;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/vqa/init", post(handlers::init_session))
        .route("/api/vqa/ask", post(handlers::ask))
        .route("/api/vqa/session/{id}", delete(handlers::delete_session))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
