//! Damage assessment orchestration
//!
//! validate -> vision model -> parse JSON -> normalize. Syntactically broken
//! model output fails the request; field-level sloppiness is repaired by the
//! normalizer.

use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::model_client::{ModelError, VisionModel, VisionPrompt};
use super::models::DamageEstimate;
use super::normalizer::Normalizer;
use super::prompts::{SYSTEM_PROMPT, USER_PROMPT};
use super::validators::{parse_image_data_uri, ImageValidator};
use crate::config::AssessmentConfig;
use crate::metrics::METRICS;

const PREVIEW_CHARS: usize = 80;

/// Assessment failure classes
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("Invalid image payload")]
    InvalidInput,

    #[error("Empty response from vision model")]
    EmptyModelResponse,

    #[error("Invalid JSON response from vision model: {0}")]
    MalformedModelOutput(String),

    #[error("Vision model unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Vision model configuration error: {0}")]
    ConfigurationError(String),

    #[error("{0}")]
    UnknownFailure(String),
}

impl AssessmentError {
    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::EmptyModelResponse => "empty_model_response",
            Self::MalformedModelOutput(_) => "malformed_model_output",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::ConfigurationError(_) => "configuration_error",
            Self::UnknownFailure(_) => "unknown_failure",
        }
    }
}

impl From<ModelError> for AssessmentError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Timeout(_) | ModelError::Connection(_) => {
                Self::UpstreamUnavailable(err.to_string())
            }
            ModelError::Unauthorized(_) | ModelError::MissingCredentials => {
                Self::ConfigurationError(err.to_string())
            }
            other => Self::UnknownFailure(other.to_string()),
        }
    }
}

/// Orchestrates one assessment per call; holds no per-request state
pub struct DamageAssessor {
    model: Arc<dyn VisionModel>,
    validator: ImageValidator,
    normalizer: Normalizer,
    max_output_tokens: u32,
    temperature: f32,
    request_timeout: Duration,
}

impl DamageAssessor {
    pub fn new(model: Arc<dyn VisionModel>, config: &AssessmentConfig) -> Self {
        Self {
            model,
            validator: ImageValidator::new(config.min_image_length),
            normalizer: Normalizer::new(config.labor_rate),
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
            request_timeout: config.request_timeout(),
        }
    }

    /// Override the upper bound on the model call
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn validator(&self) -> &ImageValidator {
        &self.validator
    }

    /// Assess the damage shown in an image data URI
    pub async fn assess(&self, image_payload: &str) -> Result<DamageEstimate, AssessmentError> {
        let start = Instant::now();
        let request_id = Uuid::new_v4();

        let result = self.run(request_id, image_payload).await;

        let elapsed = start.elapsed();
        match &result {
            Ok(estimate) => {
                METRICS.record_assessment("success", elapsed.as_secs_f64());
                METRICS.record_estimate_cost(estimate.total_cost);
                info!(
                    "Assessment {} complete in {:?}: {} damages, total cost ${:.2}, confidence {:.1}%",
                    request_id,
                    elapsed,
                    estimate.damages.len(),
                    estimate.total_cost,
                    estimate.confidence * 100.0
                );
                debug!(
                    "Assessment {} estimate: {}",
                    request_id,
                    serde_json::to_string_pretty(estimate).unwrap_or_default()
                );
            }
            Err(AssessmentError::InvalidInput) => {
                METRICS.record_assessment(AssessmentError::InvalidInput.kind(), elapsed.as_secs_f64());
                warn!("Assessment {} rejected: invalid image payload", request_id);
            }
            Err(e) => {
                METRICS.record_assessment(e.kind(), elapsed.as_secs_f64());
                error!("Assessment {} failed after {:?}: {}", request_id, elapsed, e);
            }
        }

        result
    }

    async fn run(&self, request_id: Uuid, image_payload: &str) -> Result<DamageEstimate, AssessmentError> {
        if !self.validator.validate(image_payload) {
            return Err(AssessmentError::InvalidInput);
        }

        info!(
            "Assessment {} request: format={}, size={} bytes, preview={}...",
            request_id,
            parse_image_data_uri(image_payload).map_or("unknown", |f| f.as_str()),
            image_payload.len(),
            image_payload.chars().take(PREVIEW_CHARS).collect::<String>()
        );

        let prompt = VisionPrompt {
            system_text: SYSTEM_PROMPT.to_string(),
            user_text: USER_PROMPT.to_string(),
            image_data_uri: image_payload.to_string(),
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        };

        let text = tokio::time::timeout(self.request_timeout, self.model.complete_vision_prompt(&prompt))
            .await
            .map_err(|_| {
                AssessmentError::UpstreamUnavailable(format!(
                    "no response within {:?}",
                    self.request_timeout
                ))
            })??;

        let text = match text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(AssessmentError::EmptyModelResponse),
        };

        let raw: Value = serde_json::from_str(&text).map_err(|e| {
            error!(
                "Assessment {} model output is not JSON ({}): {}",
                request_id,
                e,
                text.chars().take(200).collect::<String>()
            );
            AssessmentError::MalformedModelOutput(e.to_string())
        })?;

        if !raw.is_object() {
            return Err(AssessmentError::MalformedModelOutput(
                "expected a JSON object".to_string(),
            ));
        }

        Ok(self.normalizer.normalize(&raw))
    }
}
