//! Result interpretation and presentation formatting
//!
//! Maps a classifier outcome into the caller-facing report. Pure
//! presentation: label text and percentage rounding, no business logic.

use crate::models::{AccountLabel, Prediction, PredictionReport};

/// Format a probability as a percentage with two decimal places
pub fn format_percent(probability: f32) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Build the caller-facing report for a prediction
pub fn build_report(prediction: &Prediction) -> PredictionReport {
    let probability_no_account = prediction.class_probability(AccountLabel::NoAccount);
    let probability_has_account = prediction.class_probability(AccountLabel::HasAccount);

    PredictionReport {
        label: prediction.label,
        label_text: prediction.label.text().to_string(),
        probability_no_account,
        probability_has_account,
        percent_no_account: format_percent(probability_no_account),
        percent_has_account: format_percent(probability_has_account),
        generated_at: chrono::Utc::now().timestamp(),
    }
}
