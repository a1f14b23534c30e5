use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::warn;

use super::assessor::{AssessmentError, DamageAssessor};
use super::models::{AnalyzeRequest, ApiError};

/// Assessment API state
#[derive(Clone)]
pub struct AssessmentState {
    pub assessor: Arc<DamageAssessor>,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

/// Estimate the damage shown in an uploaded vehicle photo
///
/// POST /api/analyze-damage
pub async fn analyze_damage(
    State(state): State<AssessmentState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected damage analysis body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ApiError::new("Image too large", rejection.body_text())),
            )
        } else {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiError::new("Invalid request body", rejection.body_text())),
            )
        }
    })?;

    let image = match request.image_base64 {
        Some(image) if !image.is_empty() => image,
        _ => {
            warn!("Damage analysis request without imageBase64");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError::new("Image data is required", "Missing imageBase64 field")),
            ));
        }
    };

    match state.assessor.assess(&image).await {
        Ok(estimate) => Ok(([(header::CACHE_CONTROL, "no-store")], Json(estimate))),
        Err(e) => Err(error_response(&e)),
    }
}

/// Map an assessment failure to its HTTP status and public body
pub fn error_response(err: &AssessmentError) -> (StatusCode, Json<ApiError>) {
    let (status, error, details) = match err {
        AssessmentError::InvalidInput => (
            StatusCode::BAD_REQUEST,
            "Invalid image format",
            "Expected base64-encoded image with data URI scheme".to_string(),
        ),
        AssessmentError::UpstreamUnavailable(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Service temporarily unavailable",
            "Unable to connect to AI service".to_string(),
        ),
        AssessmentError::ConfigurationError(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Configuration error",
            "Invalid API credentials".to_string(),
        ),
        AssessmentError::EmptyModelResponse
        | AssessmentError::MalformedModelOutput(_)
        | AssessmentError::UnknownFailure(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to analyze damage",
            err.to_string(),
        ),
    };

    (status, Json(ApiError::new(error, details)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_statuses() {
        let cases = [
            (AssessmentError::InvalidInput, StatusCode::BAD_REQUEST),
            (AssessmentError::UpstreamUnavailable("t".into()), StatusCode::SERVICE_UNAVAILABLE),
            (AssessmentError::ConfigurationError("k".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AssessmentError::EmptyModelResponse, StatusCode::INTERNAL_SERVER_ERROR),
            (AssessmentError::MalformedModelOutput("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AssessmentError::UnknownFailure("y".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let (status, _) = error_response(&err);
            assert_eq!(status, expected, "{:?}", err);
        }
    }

    #[test]
    fn test_configuration_error_hides_details() {
        let err = AssessmentError::ConfigurationError("Unauthorized: upstream returned status 401".into());
        let (_, Json(body)) = error_response(&err);
        assert_eq!(body.error, "Configuration error");
        assert_eq!(body.details, "Invalid API credentials");
    }

    #[test]
    fn test_unknown_failure_carries_diagnostic() {
        let err = AssessmentError::UnknownFailure("Upstream error: status 500: boom".into());
        let (_, Json(body)) = error_response(&err);
        assert_eq!(body.error, "Failed to analyze damage");
        assert!(body.details.contains("boom"));
    }
}
