//! Integration tests for the prediction service endpoints

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{
    build_report, encode, health::components, predictor::prediction_from_probabilities, Classifier,
    ComponentStatus, ExpectedSchema, FeatureVector, HealthRegistry, InputForm, Prediction,
    PredictionError, RawInput,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;
use tower::ServiceExt;

#[derive(Clone)]
struct AppState {
    schema: Arc<ExpectedSchema>,
    classifier: Arc<dyn Classifier>,
    health_registry: HealthRegistry,
}

/// Stub standing in for the ONNX model: checks arity like the real adapter,
/// then returns a fixed class distribution.
struct FixedClassifier {
    probabilities: [f32; 2],
    fail: bool,
}

impl Classifier for FixedClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Prediction, PredictionError> {
        if self.fail {
            return Err(PredictionError::Inference("stubbed failure".to_string()));
        }
        assert!(!features.is_empty());
        prediction_from_probabilities(&self.probabilities)
    }
}

async fn predict(State(state): State<Arc<AppState>>, Json(form): Json<InputForm>) -> Response {
    let raw = match RawInput::from_form(&form) {
        Ok(raw) => raw,
        Err(err) => return reject(err),
    };
    let vector = match encode(&raw, &state.schema) {
        Ok(vector) => vector,
        Err(err) => return reject(err),
    };
    match state.classifier.predict(&vector) {
        Ok(prediction) => (StatusCode::OK, Json(build_report(&prediction))).into_response(),
        Err(err) => reject(err),
    }
}

fn reject(err: PredictionError) -> Response {
    match err {
        PredictionError::Validation {
            attribute,
            value,
            reason,
        } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": "validation_failed",
                "attribute": attribute,
                "value": value,
                "reason": reason,
            })),
        )
            .into_response(),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "prediction_failed" })),
        )
            .into_response(),
    }
}

async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;
    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;
    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(readiness))
}

async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

fn trained_schema() -> ExpectedSchema {
    ExpectedSchema::from_columns(
        [
            "year",
            "household_size",
            "age_of_respondent",
            "country_Rwanda",
            "country_Tanzania",
            "country_Uganda",
            "location_type_Urban",
            "cellphone_access_Yes",
            "gender_of_respondent_Male",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
    )
    .unwrap()
}

async fn test_state(probabilities: [f32; 2], fail: bool) -> Arc<AppState> {
    let health_registry = HealthRegistry::new();
    health_registry.register(components::SCHEMA_REGISTRY).await;
    health_registry.register(components::MODEL).await;
    health_registry.set_ready(true).await;

    Arc::new(AppState {
        schema: Arc::new(trained_schema()),
        classifier: Arc::new(FixedClassifier {
            probabilities,
            fail,
        }),
        health_registry,
    })
}

fn test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

fn sample_form() -> serde_json::Value {
    serde_json::json!({
        "country": "Kenya",
        "year": 2016,
        "location_type": "Rural",
        "cellphone_access": "Yes",
        "household_size": 5,
        "age_of_respondent": 30,
        "gender_of_respondent": "Female",
        "relationship_with_head": "Head of Household",
        "marital_status": "Married/Living together",
        "education_level": "Primary education",
        "job_type": "Self employed",
    })
}

async fn post_json(router: Router, path: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_predict_returns_report() {
    let state = test_state([0.1384, 0.8616], false).await;
    let (status, body) = post_json(test_router(state), "/predict", sample_form()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "has_account");
    assert_eq!(body["label_text"], "has a bank account");
    assert_eq!(body["percent_has_account"], "86.16%");
    assert_eq!(body["percent_no_account"], "13.84%");
}

#[tokio::test]
async fn test_predict_rejects_unknown_category() {
    let state = test_state([0.5, 0.5], false).await;
    let mut form = sample_form();
    form["country"] = serde_json::json!("Wakanda");

    let (status, body) = post_json(test_router(state), "/predict", form).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_failed");
    assert_eq!(body["attribute"], "country");
    assert_eq!(body["value"], "Wakanda");
}

#[tokio::test]
async fn test_predict_rejects_out_of_range_household_size() {
    let state = test_state([0.5, 0.5], false).await;
    let mut form = sample_form();
    form["household_size"] = serde_json::json!(21);

    let (status, body) = post_json(test_router(state), "/predict", form).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["attribute"], "household_size");
}

#[tokio::test]
async fn test_inference_failure_stays_generic() {
    let state = test_state([0.5, 0.5], true).await;
    let (status, body) = post_json(test_router(state), "/predict", sample_form()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "prediction_failed");
    // No schema or attribute details in the generic failure body
    assert!(body.get("attribute").is_none());
}

#[tokio::test]
async fn test_healthz_reports_components() {
    let state = test_state([0.5, 0.5], false).await;
    let response = test_router(state)
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["components"]["schema_registry"].is_object());
    assert!(json["components"]["model"].is_object());
}

#[tokio::test]
async fn test_readyz_depends_on_initialization() {
    let state = test_state([0.5, 0.5], false).await;
    state.health_registry.set_ready(false).await;

    let response = test_router(state.clone())
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    state.health_registry.set_ready(true).await;
    let response = test_router(state)
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_text_format() {
    let state = test_state([0.5, 0.5], false).await;
    let response = test_router(state)
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}
