//! Wiring of configured services into router state

use std::sync::Arc;
use tracing::{info, warn};

use crate::assessment::{AssessmentState, DamageAssessor, OpenAiVisionClient, VisionModel};
use crate::config::Config;
use crate::error::{EstimatorError, Result};

/// Initialize the assessment service from configuration
pub fn init_assessment_service(config: &Config) -> Result<AssessmentState> {
    let client = OpenAiVisionClient::new(config.openai.clone())
        .map_err(|e| EstimatorError::Internal(format!("Failed to create OpenAiVisionClient: {}", e)))?;

    if config.openai.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; assessments will fail with a configuration error");
    }
    info!(
        "Vision model: {} at {} (timeout {}s, retries {})",
        config.openai.model,
        config.openai.api_url,
        config.openai.timeout_secs,
        config.openai.retry_attempts
    );

    Ok(with_model(Arc::new(client), config))
}

/// Build assessment state around any vision model
pub fn with_model(model: Arc<dyn VisionModel>, config: &Config) -> AssessmentState {
    AssessmentState {
        assessor: Arc::new(DamageAssessor::new(model, &config.assessment)),
    }
}
