//! Seam between the assessment pipeline and the vision model provider

use async_trait::async_trait;

/// One vision prompt: instructions plus a single embedded image
#[derive(Debug, Clone)]
pub struct VisionPrompt {
    pub system_text: String,
    pub user_text: String,
    pub image_data_uri: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// Vision model provider errors
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    /// Rejected credentials. Carries no upstream body so keys never leak.
    #[error("Unauthorized: upstream returned status {0}")]
    Unauthorized(u16),

    #[error("API key is not configured")]
    MissingCredentials,

    #[error("Upstream error: status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

impl ModelError {
    /// Whether a provider-side retry could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Connection(_) => "connection",
            Self::Unauthorized(_) | Self::MissingCredentials => "unauthorized",
            Self::Upstream { .. } => "upstream",
            Self::InvalidResponse(_) => "invalid_response",
            Self::RequestFailed(_) => "request_failed",
        }
    }
}

/// A vision-capable language model
///
/// Returns the model's text output, or `None` when the provider answered
/// without any text.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn complete_vision_prompt(&self, prompt: &VisionPrompt) -> Result<Option<String>, ModelError>;
}
