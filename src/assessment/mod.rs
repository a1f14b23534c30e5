//! Vehicle damage assessment
//!
//! - POST /api/analyze-damage - Estimate repair costs from a photo

pub mod assessor;
pub mod coerce;
pub mod handlers;
pub mod model_client;
pub mod models;
pub mod normalizer;
pub mod openai_client;
pub mod openai_config;
pub mod prompts;
pub mod validators;

pub use assessor::{AssessmentError, DamageAssessor};
pub use handlers::{analyze_damage, AssessmentState};
pub use model_client::{ModelError, VisionModel, VisionPrompt};
pub use models::{AnalyzeRequest, ApiError, DamageEstimate, DamageItem, Severity};
pub use normalizer::{normalize, Normalizer};
pub use openai_client::OpenAiVisionClient;
pub use openai_config::OpenAiConfig;
pub use validators::{validate_image_data, ImageFormat, ImageValidator};
