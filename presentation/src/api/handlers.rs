//! Request handlers

use crate::api::AppState;
use crate::api::dto::{AskRequest, AskResponse, HealthResponse, InitResponse};
use crate::api::error::ApiError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::{Form, Json};
use glance_domain::SessionId;
use glance_infrastructure::{decode_data_url, decode_image};
use tracing::debug;

/// `GET /health`: probe the inference runtime, no session store involved
pub(super) async fn health(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let status = state.gateway.status().await.map_err(ApiError::unavailable)?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        model: status.model,
        device: status.device,
    }))
}

/// `POST /api/vqa/init`: create a session from an uploaded image.
///
/// Accepts either a raw file in the `image` field or a pasted data
/// URL / base64 string in `image_data`.
pub(super) async fn init_session(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<InitResponse>, ApiError> {
    let mut payload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("image") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
                debug!("Received image upload ({} bytes)", bytes.len());
                payload = Some(decode_image(&bytes, state.max_upload_bytes)?);
                break;
            }
            Some("image_data") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
                payload = Some(decode_data_url(&text, state.max_upload_bytes)?);
                break;
            }
            _ => continue,
        }
    }

    let image = payload
        .ok_or_else(|| ApiError::bad_request("Missing 'image' or 'image_data' field"))?;

    let (session_id, caption) = state.store.create(image).await?;
    Ok(Json(InitResponse {
        session_id: session_id.to_string(),
        caption,
    }))
}

/// `POST /api/vqa/ask`: one question/answer turn
pub(super) async fn ask(
    State(state): State<AppState>,
    Form(request): Form<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let id = SessionId::from(request.session_id);
    let answer = state.store.ask(&id, &request.question).await?;
    Ok(Json(AskResponse { answer }))
}

/// `DELETE /api/vqa/session/{id}`: explicit session deletion
pub(super) async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.remove(&SessionId::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, header};
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use glance_application::ports::vision_gateway::{
        InferenceError, ModelStatus, VisionGateway,
    };
    use glance_application::{SessionStore, StoreConfig, SystemClock};
    use glance_domain::{ImagePayload, Question, Turn};
    use std::io::Cursor;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    // ==================== Test Mocks ====================

    struct ScriptedGateway {
        healthy: bool,
    }

    #[async_trait]
    impl VisionGateway for ScriptedGateway {
        async fn caption(&self, image: &ImagePayload) -> Result<String, InferenceError> {
            Ok(format!("a {}x{} test image", image.width(), image.height()))
        }

        async fn answer(
            &self,
            _image: &ImagePayload,
            history: &[Turn],
            question: &Question,
        ) -> Result<String, InferenceError> {
            Ok(format!(
                "turn {}: {}",
                history.len() + 1,
                question.content()
            ))
        }

        async fn status(&self) -> Result<ModelStatus, InferenceError> {
            if !self.healthy {
                return Err(InferenceError::Connection("refused".to_string()));
            }
            Ok(ModelStatus {
                model: "HuggingFaceTB/SmolVLM2-256M-Video-Instruct".to_string(),
                device: "cpu".to_string(),
                ready: true,
            })
        }
    }

    fn test_state(healthy: bool) -> AppState {
        let gateway: Arc<dyn VisionGateway> = Arc::new(ScriptedGateway { healthy });
        let store = Arc::new(SessionStore::new(
            gateway.clone(),
            Arc::new(SystemClock),
            StoreConfig::default(),
        ));
        AppState {
            store,
            gateway,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(3, 3, image::Rgba([0, 128, 255, 255]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> (String, Vec<u8>) {
        let boundary = "glance-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match filename {
            Some(name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        (
            format!("multipart/form-data; boundary={boundary}"),
            body,
        )
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_session(state: &AppState) -> String {
        let image = decode_image(&png_bytes(), state.max_upload_bytes).unwrap();
        let (id, _) = state.store.create(image).await.unwrap();
        id.to_string()
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_health_reports_model_and_device() {
        let response = router(test_state(true))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "HuggingFaceTB/SmolVLM2-256M-Video-Instruct");
        assert_eq!(body["device"], "cpu");
    }

    #[tokio::test]
    async fn test_health_unreachable_runtime() {
        let response = router(test_state(false))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["error"], "model_unavailable");
    }

    #[tokio::test]
    async fn test_init_with_file_upload() {
        let (content_type, body) = multipart_body("image", Some("square.png"), &png_bytes());
        let response = router(test_state(true))
            .oneshot(
                Request::post("/api/vqa/init")
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(!body["session_id"].as_str().unwrap().is_empty());
        assert_eq!(body["caption"], "a 3x3 test image");
    }

    #[tokio::test]
    async fn test_init_with_pasted_data_url() {
        let data_url = format!("data:image/png;base64,{}", BASE64.encode(png_bytes()));
        let (content_type, body) = multipart_body("image_data", None, data_url.as_bytes());
        let response = router(test_state(true))
            .oneshot(
                Request::post("/api/vqa/init")
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_init_rejects_garbage_bytes() {
        let (content_type, body) =
            multipart_body("image", Some("fake.png"), b"this is not an image");
        let response = router(test_state(true))
            .oneshot(
                Request::post("/api/vqa/init")
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "decode_error");
    }

    #[tokio::test]
    async fn test_init_missing_image_field() {
        let (content_type, body) = multipart_body("unrelated", None, b"whatever");
        let response = router(test_state(true))
            .oneshot(
                Request::post("/api/vqa/init")
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_ask_roundtrip() {
        let state = test_state(true);
        let id = create_session(&state).await;

        let response = router(state)
            .oneshot(
                Request::post("/api/vqa/ask")
                    .header(
                        header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(Body::from(format!(
                        "session_id={id}&question=What+color+is+the+shape%3F"
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["answer"], "turn 1: What color is the shape?");
    }

    #[tokio::test]
    async fn test_ask_unknown_session() {
        let response = router(test_state(true))
            .oneshot(
                Request::post("/api/vqa/ask")
                    .header(
                        header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(Body::from("session_id=nonexistent&question=hello"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"], "session_not_found");
    }

    #[tokio::test]
    async fn test_ask_blank_question() {
        let state = test_state(true);
        let id = create_session(&state).await;

        let response = router(state)
            .oneshot(
                Request::post("/api/vqa/ask")
                    .header(
                        header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(Body::from(format!("session_id={id}&question=+++")))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_delete_session() {
        let state = test_state(true);
        let id = create_session(&state).await;
        let app = router(state);

        let response = app
            .clone()
            .oneshot(
                Request::delete(format!("/api/vqa/session/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // A second delete reports the session as gone
        let response = app
            .oneshot(
                Request::delete(format!("/api/vqa/session/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
