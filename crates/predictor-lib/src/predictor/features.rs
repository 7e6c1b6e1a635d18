//! Feature encoding and schema alignment
//!
//! Turns a validated raw input into the fixed-width numeric vector the
//! trained classifier expects. A column-set or column-order mismatch here
//! would silently corrupt predictions, so the final vector is built by
//! projecting through the schema's own column order rather than trusting
//! accumulator insertion order.

use std::collections::HashMap;

use tracing::warn;

use crate::error::Result;
use crate::models::{Categorical, FeatureVector, RawInput};
use crate::schema::ExpectedSchema;

/// Canonical names of the numeric passthrough columns
pub const YEAR_COLUMN: &str = "year";
pub const HOUSEHOLD_SIZE_COLUMN: &str = "household_size";
pub const AGE_COLUMN: &str = "age_of_respondent";

/// Encode a raw input against the trained schema.
///
/// Numeric attributes pass through under their canonical names. Categorical
/// attributes one-hot encode under the drop-first convention: the reference
/// level contributes nothing, every other level contributes a single 1 in
/// its `{attribute}_{category}` column. The output's column set and order
/// equal the schema by construction; columns the input never touches are 0.
pub fn encode(raw: &RawInput, schema: &ExpectedSchema) -> Result<FeatureVector> {
    raw.validate()?;

    let mut accumulator: HashMap<String, f32> = HashMap::with_capacity(schema.len());
    accumulator.insert(YEAR_COLUMN.to_string(), f32::from(raw.year));
    accumulator.insert(
        HOUSEHOLD_SIZE_COLUMN.to_string(),
        f32::from(raw.household_size),
    );
    accumulator.insert(AGE_COLUMN.to_string(), f32::from(raw.age_of_respondent));

    mark_level(&mut accumulator, schema, raw.country);
    mark_level(&mut accumulator, schema, raw.location_type);
    mark_level(&mut accumulator, schema, raw.cellphone_access);
    mark_level(&mut accumulator, schema, raw.gender_of_respondent);
    mark_level(&mut accumulator, schema, raw.relationship_with_head);
    mark_level(&mut accumulator, schema, raw.marital_status);
    mark_level(&mut accumulator, schema, raw.education_level);
    mark_level(&mut accumulator, schema, raw.job_type);

    // Projection pass: the schema decides both membership and order.
    // Accumulator entries the schema does not know are dropped; schema
    // columns that were never marked default to 0.
    let values = schema
        .columns()
        .iter()
        .map(|column| accumulator.get(column).copied().unwrap_or(0.0))
        .collect();

    Ok(FeatureVector::new(values))
}

/// Contribute the one-hot column for a non-reference level. A level whose
/// column the trained schema lacks encodes as the reference level.
fn mark_level<C: Categorical>(
    accumulator: &mut HashMap<String, f32>,
    schema: &ExpectedSchema,
    level: C,
) {
    if level.is_reference() {
        return;
    }

    let column = level.column_name();
    if !schema.contains(&column) {
        warn!(
            attribute = C::ATTRIBUTE,
            column = %column,
            "category not present in trained schema, encoding as reference level"
        );
        return;
    }

    accumulator.insert(column, 1.0);
}
