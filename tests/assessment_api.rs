//! End-to-end tests of the HTTP API with a stubbed vision model

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use damage_estimator::api::{build_router, with_model};
use damage_estimator::assessment::model_client::{ModelError, VisionModel, VisionPrompt};
use damage_estimator::config::Config;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct StubModel {
    reply: fn() -> Result<Option<String>, ModelError>,
}

#[async_trait]
impl VisionModel for StubModel {
    async fn complete_vision_prompt(&self, _prompt: &VisionPrompt) -> Result<Option<String>, ModelError> {
        (self.reply)()
    }
}

fn app(reply: fn() -> Result<Option<String>, ModelError>) -> Router {
    let config = Config::default();
    let state = with_model(Arc::new(StubModel { reply }), &config);
    build_router(state, config.server.max_body_bytes)
}

fn image() -> String {
    format!("data:image/png;base64,{}", "iVBORw0KGgo".repeat(20))
}

async fn post_json(app: Router, body: String) -> (StatusCode, Option<String>, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze-damage")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let cache_control = response
        .headers()
        .get(header::CACHE_CONTROL)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, cache_control, body)
}

fn analyze(image: &str) -> String {
    json!({ "imageBase64": image }).to_string()
}

#[tokio::test]
async fn test_analyze_damage_success() {
    let app = app(|| {
        Ok(Some(
            json!({
                "damages": [
                    { "type": "Bumper Scratch", "severity": "minor", "estimatedCost": 200, "description": "Surface scratch", "location": "rear bumper" },
                    { "type": "Door Dent", "severity": "moderate", "estimatedCost": "450.5" }
                ],
                "laborHours": 2.5,
                "partsNeeded": ["bumper clip", 7],
                "confidence": 85,
                "summary": "Light rear damage"
            })
            .to_string(),
        ))
    });

    let (status, cache_control, body) = post_json(app, analyze(&image())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_control.as_deref(), Some("no-store"));
    assert_eq!(body["damages"].as_array().unwrap().len(), 2);
    assert_eq!(body["damages"][0]["type"], "Bumper Scratch");
    assert_eq!(body["damages"][0]["location"], "rear bumper");
    assert_eq!(body["damages"][1]["estimatedCost"], 450.5);
    assert_eq!(body["damages"][1]["description"], "No description provided");
    assert!(body["damages"][1].get("location").is_none());
    assert_eq!(body["partsNeeded"], json!(["bumper clip"]));
    assert_eq!(body["confidence"], 0.85);
    assert_eq!(body["totalCost"], 900.5);
    assert_eq!(body["summary"], "Light rear damage");
    assert!(body.get("recommendations").is_none());
}

#[tokio::test]
async fn test_missing_image_is_bad_request() {
    for payload in [json!({}), json!({ "imageBase64": "" }), json!({ "imageBase64": null })] {
        let (status, _, body) = post_json(app(|| Ok(Some("{}".into()))), payload.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Image data is required");
        assert_eq!(body["details"], "Missing imageBase64 field");
    }
}

#[tokio::test]
async fn test_invalid_image_is_bad_request() {
    let candidates = [
        "hello".to_string(),
        format!("data:image/gif;base64,{}", "A".repeat(200)),
        format!("data:text/plain;base64,{}", "A".repeat(200)),
        format!("data:image/png,{}", "A".repeat(200)),
    ];

    for candidate in candidates {
        let (status, _, body) = post_json(app(|| Ok(Some("{}".into()))), analyze(&candidate)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", candidate);
        assert_eq!(body["error"], "Invalid image format");
        assert_eq!(body["details"], "Expected base64-encoded image with data URI scheme");
    }
}

#[tokio::test]
async fn test_unparseable_body_is_bad_request() {
    let (status, _, body) = post_json(app(|| Ok(Some("{}".into()))), "not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_upstream_timeout_is_unavailable() {
    let app = app(|| Err(ModelError::Timeout("operation timed out".into())));
    let (status, cache_control, body) = post_json(app, analyze(&image())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(cache_control.is_none());
    assert_eq!(body["error"], "Service temporarily unavailable");
    assert_eq!(body["details"], "Unable to connect to AI service");
}

#[tokio::test]
async fn test_bad_credentials_do_not_leak() {
    let app = app(|| Err(ModelError::Unauthorized(401)));
    let (status, _, body) = post_json(app, analyze(&image())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Configuration error");
    assert_eq!(body["details"], "Invalid API credentials");
}

#[tokio::test]
async fn test_malformed_model_output_is_server_error() {
    let app = app(|| Ok(Some("Sure! Here is the estimate: ...".into())));
    let (status, _, body) = post_json(app, analyze(&image())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to analyze damage");
    assert!(body["details"].as_str().unwrap().contains("Invalid JSON"));
}

#[tokio::test]
async fn test_empty_model_output_is_server_error() {
    let app = app(|| Ok(None));
    let (status, _, body) = post_json(app, analyze(&image())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to analyze damage");
}

#[tokio::test]
async fn test_large_image_is_accepted() {
    let large = format!("data:image/jpeg;base64,{}", "A".repeat(4 * 1024 * 1024));
    let (status, _, _) = post_json(app(|| Ok(Some("{}".into()))), analyze(&large)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let body = analyze(&format!("data:image/jpeg;base64,{}", "A".repeat(8 * 1024)));

    for declare_length in [true, false] {
        let config = Config::default();
        let state = with_model(Arc::new(StubModel { reply: || Ok(Some("{}".into())) }), &config);
        let app = build_router(state, 1024);

        let mut request = Request::builder()
            .method("POST")
            .uri("/api/analyze-damage")
            .header(header::CONTENT_TYPE, "application/json");
        if declare_length {
            request = request.header(header::CONTENT_LENGTH, body.len());
        }

        let response = app
            .oneshot(request.body(Body::from(body.clone())).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error["error"], "Image too large");
        assert!(error["details"].is_string());
    }
}

#[tokio::test]
async fn test_health() {
    let response = app(|| Ok(None))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_metrics_exposes_assessment_counters() {
    let _ = post_json(app(|| Ok(Some("{}".into()))), analyze(&image())).await;

    let response = app(|| Ok(None))
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("damage_assessment_requests_total"));
}
