//! ONNX inference using tract
//!
//! Loads the trained classifier as an opaque ONNX blob and runs single-row
//! inference over schema-aligned feature vectors.

use std::time::Instant;

use anyhow::Context;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

use super::Classifier;
use crate::error::{PredictionError, Result};
use crate::models::{AccountLabel, FeatureVector, Prediction};

/// Number of output classes
const NUM_CLASSES: usize = 2;

/// Tolerance for the probability-sum contract check
const PROBABILITY_SUM_TOLERANCE: f32 = 1e-3;

/// Maximum inference latency before warning
const MAX_INFERENCE_MS: u128 = 10;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Classifier backed by a tract-optimized ONNX plan
///
/// The plan is built once at startup with the input pinned to one row of
/// schema width, and is never mutated afterwards, so it is shared across
/// requests without locking.
pub struct OnnxClassifier {
    model: TractModel,
    num_features: usize,
}

impl OnnxClassifier {
    /// Load and optimize an ONNX model from bytes. `num_features` is the
    /// width of the expected schema.
    pub fn from_bytes(model_bytes: &[u8], num_features: usize) -> anyhow::Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, num_features]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;

        Ok(Self {
            model,
            num_features,
        })
    }

    fn vector_to_tensor(&self, features: &FeatureVector) -> Result<Tensor> {
        if features.len() != self.num_features {
            return Err(PredictionError::Inference(format!(
                "feature vector has {} columns, model expects {}",
                features.len(),
                self.num_features
            )));
        }

        let array = tract_ndarray::Array2::from_shape_vec(
            (1, self.num_features),
            features.values().to_vec(),
        )
        .map_err(|e| PredictionError::Inference(e.to_string()))?;
        Ok(array.into())
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        let start = Instant::now();
        let input = self.vector_to_tensor(features)?;

        let outputs = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| PredictionError::Inference(e.to_string()))?;

        // Classifier exports commonly emit (label, probabilities); the class
        // distribution is the final output tensor either way.
        let output = outputs
            .last()
            .ok_or_else(|| PredictionError::Inference("model produced no output".to_string()))?;
        let probabilities: Vec<f32> = output
            .to_array_view::<f32>()
            .map_err(|e| PredictionError::Inference(e.to_string()))?
            .iter()
            .copied()
            .collect();

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(
                elapsed_ms = elapsed.as_millis(),
                "Inference exceeded {}ms target", MAX_INFERENCE_MS
            );
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        prediction_from_probabilities(&probabilities)
    }
}

/// Interpret a model's class distribution. The label is derived as argmax,
/// so it always agrees with the probabilities.
pub fn prediction_from_probabilities(probabilities: &[f32]) -> Result<Prediction> {
    if probabilities.len() != NUM_CLASSES {
        return Err(PredictionError::Inference(format!(
            "model emitted {} class probabilities, expected {}",
            probabilities.len(),
            NUM_CLASSES
        )));
    }

    let sum: f32 = probabilities.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(PredictionError::Inference(format!(
            "class probabilities sum to {sum}, expected 1.0"
        )));
    }

    let label = if probabilities[1] >= probabilities[0] {
        AccountLabel::HasAccount
    } else {
        AccountLabel::NoAccount
    };

    Ok(Prediction {
        label,
        probabilities: [probabilities[0], probabilities[1]],
    })
}
