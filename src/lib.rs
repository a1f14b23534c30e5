//! Vehicle damage estimation service
//!
//! Accepts a photo of a damaged vehicle as an image data URI, asks a vision
//! language model for an itemized repair estimate, and returns a normalized
//! [`assessment::DamageEstimate`].

pub mod api;
pub mod assessment;
pub mod config;
pub mod error;
pub mod metrics;

pub use crate::config::Config;
pub use crate::error::{EstimatorError, Result};
