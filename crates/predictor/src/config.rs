//! Service configuration

use anyhow::Result;
use serde::Deserialize;

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PredictorConfig {
    /// HTTP port for the prediction and health endpoints
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Path to the persisted column list the model was trained on
    #[serde(default = "default_schema_path")]
    pub schema_path: String,

    /// Path to the trained ONNX classifier
    #[serde(default = "default_model_path")]
    pub model_path: String,
}

fn default_listen_port() -> u16 {
    8080
}

fn default_schema_path() -> String {
    "models/model_columns.json".to_string()
}

fn default_model_path() -> String {
    "models/financial_inclusion.onnx".to_string()
}

impl PredictorConfig {
    /// Load configuration from the environment (PREDICTOR_ prefix)
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PREDICTOR"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| PredictorConfig {
            listen_port: default_listen_port(),
            schema_path: default_schema_path(),
            model_path: default_model_path(),
        }))
    }
}
