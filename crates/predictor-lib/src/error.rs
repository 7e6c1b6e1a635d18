//! Error taxonomy for the prediction pipeline

use thiserror::Error;

/// Errors surfaced by the schema registry, encoder, and inference adapter
#[derive(Error, Debug)]
pub enum PredictionError {
    /// Startup-fatal: the process cannot serve predictions without a valid
    /// expected schema.
    #[error("failed to load expected schema from {source_name}: {reason}")]
    SchemaLoad { source_name: String, reason: String },

    /// Per-request and recoverable: the caller is told which attribute was
    /// rejected and must resubmit.
    #[error("invalid value {value:?} for {attribute}: {reason}")]
    Validation {
        attribute: &'static str,
        value: String,
        reason: String,
    },

    /// Contract mismatch between the encoder and the model. The encoder is
    /// supposed to make this unreachable by construction, so occurrences are
    /// logged as unexpected at the request boundary.
    #[error("inference failed: {0}")]
    Inference(String),
}

pub type Result<T> = std::result::Result<T, PredictionError>;
