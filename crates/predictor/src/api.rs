//! HTTP API for predictions, health checks, and Prometheus metrics

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{
    build_report, encode, AccountLabel, Classifier, ComponentStatus, ExpectedSchema,
    HealthRegistry, InputForm, PredictionError, PredictorMetrics, RawInput,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub schema: Arc<ExpectedSchema>,
    pub classifier: Arc<dyn Classifier>,
    pub health_registry: HealthRegistry,
    pub metrics: PredictorMetrics,
}

impl AppState {
    pub fn new(
        schema: Arc<ExpectedSchema>,
        classifier: Arc<dyn Classifier>,
        health_registry: HealthRegistry,
        metrics: PredictorMetrics,
    ) -> Self {
        Self {
            schema,
            classifier,
            health_registry,
            metrics,
        }
    }
}

/// Error body returned for rejected inputs
#[derive(Debug, Serialize)]
struct ValidationBody {
    error: &'static str,
    attribute: &'static str,
    value: String,
    reason: String,
}

/// Run one prediction request end-to-end: validate, encode, infer, report
async fn predict(State(state): State<Arc<AppState>>, Json(form): Json<InputForm>) -> Response {
    let start = Instant::now();

    let raw = match RawInput::from_form(&form) {
        Ok(raw) => raw,
        Err(err) => return reject(&state, err),
    };
    let vector = match encode(&raw, &state.schema) {
        Ok(vector) => vector,
        Err(err) => return reject(&state, err),
    };

    match state.classifier.predict(&vector) {
        Ok(prediction) => {
            state
                .metrics
                .observe_inference_latency(start.elapsed().as_secs_f64());

            let report = build_report(&prediction);
            let outcome = match report.label {
                AccountLabel::HasAccount => "has_account",
                AccountLabel::NoAccount => "no_account",
            };
            state.metrics.inc_prediction(outcome);

            (StatusCode::OK, Json(report)).into_response()
        }
        Err(err) => reject(&state, err),
    }
}

/// Map pipeline errors to responses. Validation failures identify the
/// offending attribute; inference failures stay generic so schema internals
/// never leak to callers.
fn reject(state: &AppState, err: PredictionError) -> Response {
    match err {
        PredictionError::Validation {
            attribute,
            value,
            reason,
        } => {
            state.metrics.inc_validation_failure(attribute);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationBody {
                    error: "validation_failed",
                    attribute,
                    value,
                    reason,
                }),
            )
                .into_response()
        }
        other => {
            state.metrics.inc_inference_error();
            error!(error = %other, "Unexpected prediction failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "prediction_failed" })),
            )
                .into_response()
        }
    }
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
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

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
