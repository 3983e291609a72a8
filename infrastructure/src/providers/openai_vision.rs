//! OpenAI-compatible vision gateway
//!
//! Talks to a local inference runtime (llama.cpp server, vLLM, or any
//! other host exposing `/v1/chat/completions`) serving a SmolVLM-class
//! model. The session image travels as a base64 data URL content part
//! on the first user message; prior turns are replayed as alternating
//! user/assistant messages in recording order.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use glance_application::ports::vision_gateway::{InferenceError, ModelStatus, VisionGateway};
use glance_domain::{ImagePayload, Question, Turn};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

/// Prompt used to generate the initial caption
const CAPTION_PROMPT: &str = "Describe this image in detail.";

/// Gateway adapter for OpenAI-compatible inference runtimes
pub struct OpenAiVisionGateway {
    client: reqwest::Client,
    base_url: String,
    model: String,
    device: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl OpenAiVisionGateway {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        device: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Connection(e.to_string()))?;

        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            device: device.into(),
        })
    }

    /// Model identifier this gateway was configured with
    pub fn model(&self) -> &str {
        &self.model
    }

    fn image_part(image: &ImagePayload) -> Value {
        json!({
            "type": "image_url",
            "image_url": {
                "url": format!("data:{};base64,{}", image.mime(), BASE64.encode(image.bytes())),
            }
        })
    }

    /// Build the message sequence: image + first prompt, then the
    /// history replayed in order, then the trailing question if the
    /// history is non-empty.
    fn build_messages(image: &ImagePayload, history: &[Turn], prompt: &str) -> Vec<Value> {
        let mut messages = Vec::with_capacity(history.len() * 2 + 1);

        let first_text = history.first().map_or(prompt, |turn| turn.question.as_str());
        messages.push(json!({
            "role": "user",
            "content": [
                Self::image_part(image),
                { "type": "text", "text": first_text },
            ]
        }));

        for (i, turn) in history.iter().enumerate() {
            messages.push(json!({ "role": "assistant", "content": turn.answer }));
            if let Some(next) = history.get(i + 1) {
                messages.push(json!({ "role": "user", "content": next.question }));
            }
        }

        if !history.is_empty() {
            messages.push(json!({ "role": "user", "content": prompt }));
        }

        messages
    }

    async fn complete(&self, messages: Vec<Value>) -> Result<String, InferenceError> {
        debug!(
            "Dispatching chat completion ({} messages) to {}",
            messages.len(),
            self.base_url
        );

        let body = json!({
            "model": self.model,
            "messages": messages,
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(InferenceError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                detail.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(InferenceError::InvalidResponse(
                "empty completion".to_string(),
            ));
        }
        Ok(text.trim().to_string())
    }
}

fn classify_transport_error(e: reqwest::Error) -> InferenceError {
    if e.is_timeout() {
        InferenceError::Timeout
    } else if e.is_connect() {
        InferenceError::Connection(e.to_string())
    } else {
        InferenceError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl VisionGateway for OpenAiVisionGateway {
    async fn caption(&self, image: &ImagePayload) -> Result<String, InferenceError> {
        let messages = Self::build_messages(image, &[], CAPTION_PROMPT);
        self.complete(messages).await
    }

    async fn answer(
        &self,
        image: &ImagePayload,
        history: &[Turn],
        question: &Question,
    ) -> Result<String, InferenceError> {
        let messages = Self::build_messages(image, history, question.content());
        self.complete(messages).await
    }

    async fn status(&self) -> Result<ModelStatus, InferenceError> {
        self.client
            .get(format!("{}/v1/models", self.base_url))
            .send()
            .await
            .map_err(classify_transport_error)?
            .error_for_status()
            .map_err(|e| InferenceError::RequestFailed(e.to_string()))?;

        Ok(ModelStatus {
            model: self.model.clone(),
            device: self.device.clone(),
            ready: true,
        })
    }
}
