//! Crate-level error type for configuration and server startup

/// Result alias used by startup and configuration code
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Errors raised outside the per-request assessment pipeline
#[derive(Debug, thiserror::Error)]
pub enum EstimatorError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to load configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
