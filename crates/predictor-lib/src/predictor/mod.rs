//! Prediction pipeline: feature encoding, model inference, and result
//! interpretation

mod features;
mod inference;
mod output;

pub use features::{encode, AGE_COLUMN, HOUSEHOLD_SIZE_COLUMN, YEAR_COLUMN};
pub use inference::{prediction_from_probabilities, OnnxClassifier};
pub use output::{build_report, format_percent};

use crate::error::Result;
use crate::models::{FeatureVector, Prediction};

/// Trait for classifier implementations
///
/// The trained model is an opaque capability: given a schema-aligned feature
/// vector it returns a class label and the two-class probability
/// distribution.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<Prediction>;
}
