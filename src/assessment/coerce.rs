//! Coercion primitives for untrusted JSON fields
//!
//! Each function takes the field as looked up on its parent object
//! (`None` when the key is missing) and never fails.

use serde_json::Value;

/// Loose numeric cast
///
/// Numbers pass through, numeric strings are parsed (surrounding whitespace
/// ignored, blank is zero), booleans map to 1/0 and null to 0. Anything
/// else, and any non-finite result, yields `None`.
pub fn as_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Array(_) | Value::Object(_) => return None,
    };

    number.is_finite().then_some(number)
}

/// Numeric cast clamped at zero, with `default` for missing or unusable input
pub fn as_non_negative_number(value: Option<&Value>, default: f64) -> f64 {
    match as_number(value) {
        Some(n) if n > 0.0 => n,
        Some(_) => 0.0,
        None => default,
    }
}

/// Text that is never empty
///
/// Non-empty strings pass through and non-zero numbers are rendered as text;
/// everything else falls back to `default`.
pub fn as_non_empty_string(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) if n.as_f64().map_or(false, |f| f != 0.0) => n.to_string(),
        _ => default.to_string(),
    }
}

/// Text if the field is a string, otherwise absent
pub fn as_optional_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// String elements of an array, or `None` if the field is not an array
pub fn as_sequence(value: Option<&Value>) -> Option<Vec<String>> {
    match value {
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        ),
        _ => None,
    }
}

/// String elements of an array, or an empty list for anything else
pub fn as_sequence_or_empty(value: Option<&Value>) -> Vec<String> {
    as_sequence(value).unwrap_or_default()
}

/// Case-insensitive match of a string against a closed set of variants
///
/// `label` must return the lowercase wire name of each variant.
pub fn as_enum_or_default<T, F>(value: Option<&Value>, variants: &[T], label: F, default: T) -> T
where
    T: Copy,
    F: Fn(&T) -> &'static str,
{
    let Some(text) = value.and_then(Value::as_str) else {
        return default;
    };
    let lowered = text.to_lowercase();
    variants
        .iter()
        .find(|variant| label(*variant) == lowered)
        .copied()
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::models::Severity;
    use serde_json::json;

    fn severity(value: Value) -> Severity {
        as_enum_or_default(Some(&value), &Severity::ALL, Severity::as_str, Severity::Moderate)
    }

    #[test]
    fn test_as_number_variants() {
        assert_eq!(as_number(Some(&json!(300))), Some(300.0));
        assert_eq!(as_number(Some(&json!(12.5))), Some(12.5));
        assert_eq!(as_number(Some(&json!("450"))), Some(450.0));
        assert_eq!(as_number(Some(&json!(" 7.25 "))), Some(7.25));
        assert_eq!(as_number(Some(&json!(""))), Some(0.0));
        assert_eq!(as_number(Some(&json!(true))), Some(1.0));
        assert_eq!(as_number(Some(&json!(false))), Some(0.0));
        assert_eq!(as_number(Some(&Value::Null)), Some(0.0));
    }

    #[test]
    fn test_as_number_rejects_garbage() {
        assert_eq!(as_number(None), None);
        assert_eq!(as_number(Some(&json!("about $500"))), None);
        assert_eq!(as_number(Some(&json!("1,200"))), None);
        assert_eq!(as_number(Some(&json!("NaN"))), None);
        assert_eq!(as_number(Some(&json!("inf"))), None);
        assert_eq!(as_number(Some(&json!([5]))), None);
        assert_eq!(as_number(Some(&json!({ "amount": 5 }))), None);
    }

    #[test]
    fn test_as_non_negative_number() {
        assert_eq!(as_non_negative_number(Some(&json!(42)), 0.0), 42.0);
        assert_eq!(as_non_negative_number(Some(&json!(-10)), 0.0), 0.0);
        assert_eq!(as_non_negative_number(Some(&json!("junk")), 0.0), 0.0);
        assert_eq!(as_non_negative_number(None, 3.0), 3.0);
    }

    #[test]
    fn test_as_non_empty_string() {
        assert_eq!(as_non_empty_string(Some(&json!("Dent")), "x"), "Dent");
        assert_eq!(as_non_empty_string(Some(&json!("")), "x"), "x");
        assert_eq!(as_non_empty_string(Some(&Value::Null), "x"), "x");
        assert_eq!(as_non_empty_string(None, "x"), "x");
        assert_eq!(as_non_empty_string(Some(&json!(0)), "x"), "x");
        assert_eq!(as_non_empty_string(Some(&json!(42)), "x"), "42");
        assert_eq!(as_non_empty_string(Some(&json!(["a"])), "x"), "x");
    }

    #[test]
    fn test_as_sequence() {
        assert_eq!(
            as_sequence(Some(&json!(["Hood", 3, null, "Grille"]))),
            Some(vec!["Hood".to_string(), "Grille".to_string()])
        );
        assert_eq!(as_sequence(Some(&json!([]))), Some(vec![]));
        assert_eq!(as_sequence(Some(&json!("Hood"))), None);
        assert_eq!(as_sequence(None), None);
        assert!(as_sequence_or_empty(Some(&json!({ "0": "Hood" }))).is_empty());
    }

    #[test]
    fn test_severity_coercion() {
        assert_eq!(severity(json!("SEVERE")), Severity::Severe);
        assert_eq!(severity(json!("Minor")), Severity::Minor);
        assert_eq!(severity(json!("moderate")), Severity::Moderate);
        assert_eq!(severity(json!("catastrophic")), Severity::Moderate);
        assert_eq!(severity(json!(3)), Severity::Moderate);
        assert_eq!(severity(Value::Null), Severity::Moderate);
    }

    #[test]
    fn test_severity_coercion_is_idempotent() {
        for input in ["SEVERE", "minor", "Moderate", "", "high", "sévère"] {
            let once = severity(json!(input));
            let twice = severity(json!(once.as_str()));
            assert_eq!(once, twice);
            assert!(Severity::ALL.contains(&once));
        }
    }
}
