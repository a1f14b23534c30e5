//! Repair of untrusted model output into a consistent `DamageEstimate`
//!
//! The model's JSON is treated as an arbitrary tree. Every field degrades to
//! a default instead of failing, so any parsed value yields an estimate that
//! satisfies the model invariants (bounded confidence, non-negative amounts,
//! totals rounded to cents).

use serde_json::{Map, Value};

use super::coerce::{
    as_enum_or_default, as_non_empty_string, as_non_negative_number, as_number,
    as_optional_string, as_sequence, as_sequence_or_empty,
};
use super::models::{DamageEstimate, DamageItem, Severity};
use super::prompts::{AVERAGE_LABOR_RATE, MAX_CONFIDENCE, MISSING_DESCRIPTION, UNKNOWN_DAMAGE_TYPE};

/// Estimate normalizer parameterized by the hourly labor rate
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    labor_rate: f64,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(AVERAGE_LABOR_RATE)
    }
}

impl Normalizer {
    pub fn new(labor_rate: f64) -> Self {
        Self { labor_rate }
    }

    /// Build an estimate from raw model output. Never fails.
    pub fn normalize(&self, raw: &Value) -> DamageEstimate {
        let empty = Map::new();
        let fields = raw.as_object().unwrap_or(&empty);

        let damages: Vec<DamageItem> = match fields.get("damages") {
            Some(Value::Array(items)) => items.iter().map(repair_item).collect(),
            _ => Vec::new(),
        };

        let damages_cost: f64 = damages.iter().map(|d| d.estimated_cost).sum();
        let labor_hours = as_non_negative_number(fields.get("laborHours"), 0.0);
        let labor_cost = labor_hours * self.labor_rate;

        // A supplied total only counts if it survives rounding as a positive amount
        let total_cost = match as_number(fields.get("totalCost")).map(round_to_cents) {
            Some(total) if total > 0.0 => total,
            _ => round_to_cents(finite_amount(damages_cost + labor_cost)),
        };

        let raw_confidence = as_number(fields.get("confidence")).unwrap_or(0.0);

        DamageEstimate {
            damages,
            labor_hours,
            parts_needed: as_sequence_or_empty(fields.get("partsNeeded")),
            confidence: normalize_confidence(raw_confidence),
            total_cost,
            summary: as_optional_string(fields.get("summary")),
            recommendations: as_sequence(fields.get("recommendations")),
        }
    }
}

/// Normalize with the default labor rate
pub fn normalize(raw: &Value) -> DamageEstimate {
    Normalizer::default().normalize(raw)
}

fn repair_item(raw: &Value) -> DamageItem {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    DamageItem {
        damage_type: as_non_empty_string(fields.get("type"), UNKNOWN_DAMAGE_TYPE),
        severity: as_enum_or_default(
            fields.get("severity"),
            &Severity::ALL,
            Severity::as_str,
            Severity::Moderate,
        ),
        estimated_cost: as_non_negative_number(fields.get("estimatedCost"), 0.0),
        description: as_non_empty_string(fields.get("description"), MISSING_DESCRIPTION),
        location: as_optional_string(fields.get("location")),
    }
}

/// Read values above 1 as percentages, then clamp to [0, 1]
pub fn normalize_confidence(confidence: f64) -> f64 {
    if !confidence.is_finite() || confidence <= 0.0 {
        return 0.0;
    }
    let fraction = if confidence > MAX_CONFIDENCE {
        confidence / 100.0
    } else {
        confidence
    };
    fraction.clamp(0.0, MAX_CONFIDENCE)
}

/// Round half away from zero to two decimal places
pub fn round_to_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

fn finite_amount(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else if value.is_infinite() {
        f64::MAX
    } else {
        value
    }
}
