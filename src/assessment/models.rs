//! Data models for damage assessment

use serde::{Deserialize, Serialize};

/// Damage severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl Default for Severity {
    fn default() -> Self {
        Self::Moderate
    }
}

impl Severity {
    /// All accepted severity levels, mildest first
    pub const ALL: [Severity; 3] = [Self::Minor, Self::Moderate, Self::Severe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

/// One identified defect on the vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageItem {
    #[serde(rename = "type")]
    pub damage_type: String,
    pub severity: Severity,
    pub estimated_cost: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Full damage estimate for a single image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageEstimate {
    pub damages: Vec<DamageItem>,
    pub labor_hours: f64,
    pub parts_needed: Vec<String>,
    pub confidence: f64,
    pub total_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
}

/// Body of `POST /api/analyze-damage`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// Error body returned by the assessment endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub details: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}
