//! Application configuration
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML
//! file, `ESTIMATOR__*` environment variables, then the provider's own
//! variables (`OPENAI_API_KEY` and friends).

use serde::Deserialize;
use std::time::Duration;

use crate::assessment::openai_config::OpenAiConfig;
use crate::assessment::prompts::{AVERAGE_LABOR_RATE, MAX_OUTPUT_TOKENS, MIN_IMAGE_LENGTH, TEMPERATURE};
use crate::error::{EstimatorError, Result};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "ESTIMATOR_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
const ENV_PREFIX: &str = "ESTIMATOR";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub assessment: AssessmentConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body; images arrive base64-encoded
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_max_body_bytes() -> usize { 20 * 1024 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; RUST_LOG takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> LogFormat { LogFormat::Pretty }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Assessment pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentConfig {
    /// Minimum image data URI length in characters
    #[serde(default = "default_min_image_length")]
    pub min_image_length: usize,

    /// Hourly labor rate used to reconstruct missing totals
    #[serde(default = "default_labor_rate")]
    pub labor_rate: f64,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on one model call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_min_image_length() -> usize { MIN_IMAGE_LENGTH }
fn default_labor_rate() -> f64 { AVERAGE_LABOR_RATE }
fn default_max_output_tokens() -> u32 { MAX_OUTPUT_TOKENS }
fn default_temperature() -> f32 { TEMPERATURE }
fn default_request_timeout_secs() -> u64 { 300 }

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            min_image_length: default_min_image_length(),
            labor_rate: default_labor_rate(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AssessmentConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    /// Load from the file named by `ESTIMATOR_CONFIG` (or `config.toml`)
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(&path)
    }

    /// Load from a TOML file, which may be absent, plus the environment
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_settings(settings)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
            .build()?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: ::config::Config) -> Result<Self> {
        let mut config: Config = settings.try_deserialize()?;
        config.openai = config.openai.from_env();
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(EstimatorError::Configuration("server.port must be non-zero".to_string()));
        }
        if self.server.max_body_bytes == 0 {
            return Err(EstimatorError::Configuration(
                "server.max_body_bytes must be non-zero".to_string(),
            ));
        }
        if !self.assessment.labor_rate.is_finite() || self.assessment.labor_rate < 0.0 {
            return Err(EstimatorError::Configuration(format!(
                "assessment.labor_rate must be a non-negative number, got {}",
                self.assessment.labor_rate
            )));
        }
        if !(0.0..=2.0).contains(&self.assessment.temperature) {
            return Err(EstimatorError::Configuration(format!(
                "assessment.temperature must be within [0, 2], got {}",
                self.assessment.temperature
            )));
        }
        if self.assessment.max_output_tokens == 0 {
            return Err(EstimatorError::Configuration(
                "assessment.max_output_tokens must be non-zero".to_string(),
            ));
        }
        if self.assessment.request_timeout_secs == 0 || self.openai.timeout_secs == 0 {
            return Err(EstimatorError::Configuration("timeouts must be non-zero".to_string()));
        }
        Ok(())
    }
}
