//! Request and response shapes

use serde::{Deserialize, Serialize};

/// Response for `POST /api/vqa/init`
#[derive(Debug, Serialize, Deserialize)]
pub struct InitResponse {
    pub session_id: String,
    pub caption: String,
}

/// Form body for `POST /api/vqa/ask`
#[derive(Debug, Serialize, Deserialize)]
pub struct AskRequest {
    pub session_id: String,
    pub question: String,
}

/// Response for `POST /api/vqa/ask`
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Response for `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub device: String,
}
