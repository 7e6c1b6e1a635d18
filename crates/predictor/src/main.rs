//! Financial inclusion prediction service
//!
//! Serves bank-account-usage predictions over HTTP. The trained schema and
//! ONNX classifier are loaded once during startup and shared read-only
//! across requests.

use std::sync::Arc;

use anyhow::{Context, Result};
use predictor_lib::{
    health::components, ExpectedSchema, HealthRegistry, OnnxClassifier, PredictorMetrics,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const PREDICTOR_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!(version = PREDICTOR_VERSION, "Starting inclusion-predictor");

    let config = config::PredictorConfig::load()?;

    // Both artifacts are startup-fatal: the process cannot serve correct
    // predictions without the trained schema and the matching model.
    let schema = Arc::new(
        ExpectedSchema::load(&config.schema_path).context("Schema artifact required at startup")?,
    );
    let model_bytes = std::fs::read(&config.model_path)
        .with_context(|| format!("Failed to read model file {}", config.model_path))?;
    let classifier = Arc::new(
        OnnxClassifier::from_bytes(&model_bytes, schema.len())
            .context("Model artifact required at startup")?,
    );
    info!(
        schema = %config.schema_path,
        model = %config.model_path,
        columns = schema.len(),
        "Loaded prediction artifacts"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(components::SCHEMA_REGISTRY).await;
    health_registry.register(components::MODEL).await;

    let metrics = PredictorMetrics::new();
    metrics.set_schema_columns(schema.len() as i64);

    let app_state = Arc::new(api::AppState::new(
        schema,
        classifier,
        health_registry.clone(),
        metrics,
    ));

    // Ready only once both artifacts are loaded
    health_registry.set_ready(true).await;

    let api_handle = tokio::spawn(api::serve(config.listen_port, app_state));

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    api_handle.abort();

    Ok(())
}
