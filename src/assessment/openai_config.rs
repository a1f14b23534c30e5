//! Configuration for the OpenAI-compatible vision client

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// OpenAI vision client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// Chat completions endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key (read from env OPENAI_API_KEY if not set)
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Vision-capable model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Image detail hint sent with the image part
    #[serde(default = "default_image_detail")]
    pub image_detail: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transient failures (0 disables retrying)
    #[serde(default)]
    pub retry_attempts: usize,

    /// Base backoff in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_api_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_model() -> String { "gpt-4o".to_string() }
fn default_image_detail() -> String { "high".to_string() }
fn default_timeout_secs() -> u64 { 300 }
fn default_retry_backoff_ms() -> u64 { 500 }

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            image_detail: default_image_detail(),
            timeout_secs: default_timeout_secs(),
            retry_attempts: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl OpenAiConfig {
    /// Override with the provider's conventional environment variables
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            if !val.is_empty() {
                self.api_key = Some(SecretString::new(val));
            }
        }

        if let Ok(val) = std::env::var("OPENAI_API_URL") {
            self.api_url = val;
        }

        if let Ok(val) = std::env::var("OPENAI_MODEL") {
            self.model = val;
        }

        if let Ok(val) = std::env::var("OPENAI_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.timeout_secs = secs;
            }
        }

        if let Ok(val) = std::env::var("OPENAI_MAX_RETRIES") {
            if let Ok(retries) = val.parse() {
                self.retry_attempts = retries;
            }
        }

        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
