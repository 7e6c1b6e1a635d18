//! Core library for the financial inclusion predictor
//!
//! This crate provides the core functionality for:
//! - Loading the trained model's expected column schema
//! - Deterministic feature encoding with schema alignment
//! - ONNX model inference via tract
//! - Result interpretation and presentation formatting
//! - Health checks and observability

pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod schema;

pub use error::{PredictionError, Result};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::PredictorMetrics;
pub use predictor::{build_report, encode, format_percent, Classifier, OnnxClassifier};
pub use schema::ExpectedSchema;
