//! OpenAI-compatible vision client with optional retry

use super::model_client::{ModelError, VisionModel, VisionPrompt};
use super::openai_config::OpenAiConfig;
use crate::metrics::METRICS;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Longest upstream error body kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Chat-completions client for vision prompts
pub struct OpenAiVisionClient {
    http: Client,
    config: OpenAiConfig,
}

impl OpenAiVisionClient {
    /// Create a new client
    pub fn new(config: OpenAiConfig) -> Result<Self, ModelError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ModelError::RequestFailed(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Single chat-completions round trip
    async fn call_api(&self, prompt: &VisionPrompt) -> Result<Option<String>, ModelError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(ModelError::MissingCredentials)?;

        let request_body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage::System {
                    content: &prompt.system_text,
                },
                ChatMessage::User {
                    content: vec![
                        ContentPart::Text {
                            text: &prompt.user_text,
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: &prompt.image_data_uri,
                                detail: &self.config.image_detail,
                            },
                        },
                    ],
                },
            ],
            max_tokens: prompt.max_output_tokens,
            temperature: prompt.temperature,
            response_format: ResponseFormat { kind: "json_object" },
        };

        debug!(
            "Calling vision model {} at {}",
            self.config.model, self.config.api_url
        );

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key.expose_secret())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(e.to_string())
                } else if e.is_connect() {
                    ModelError::Connection(e.to_string())
                } else {
                    ModelError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ModelError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ModelError::Upstream {
                status: status.as_u16(),
                message: truncate(&error_text, MAX_ERROR_BODY_CHARS),
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }

    /// Calculate exponential backoff
    fn calculate_backoff(&self, attempt: usize) -> Duration {
        let base = self.config.retry_backoff();
        let multiplier = 2_u32.saturating_pow(attempt.saturating_sub(1) as u32);
        base.saturating_mul(multiplier)
    }
}

#[async_trait]
impl VisionModel for OpenAiVisionClient {
    async fn complete_vision_prompt(&self, prompt: &VisionPrompt) -> Result<Option<String>, ModelError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let start = Instant::now();

            match self.call_api(prompt).await {
                Ok(text) => {
                    METRICS.record_model_call("success", start.elapsed().as_secs_f64());
                    return Ok(text);
                }
                Err(e) => {
                    METRICS.record_model_call(e.kind(), start.elapsed().as_secs_f64());

                    if !e.is_transient() || attempt > self.config.retry_attempts {
                        error!("Vision model call failed after {} attempt(s): {}", attempt, e);
                        return Err(e);
                    }

                    let backoff = self.calculate_backoff(attempt);
                    warn!(
                        "Vision model attempt {} failed: {}, retrying in {:?}",
                        attempt, e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

// Request/response types for the chat completions API
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
enum ChatMessage<'a> {
    System { content: &'a str },
    User { content: Vec<ContentPart<'a>> },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
    detail: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
