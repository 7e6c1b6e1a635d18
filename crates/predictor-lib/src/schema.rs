//! Expected-schema registry
//!
//! Holds the ordered list of feature-column names the classifier was trained
//! on. The list is loaded once at startup and is immutable afterwards, so it
//! can be shared across concurrent prediction requests without locking.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::error::{PredictionError, Result};

/// Ordered, duplicate-free list of trained feature columns
#[derive(Debug, Clone)]
pub struct ExpectedSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl ExpectedSchema {
    /// Build a schema from an ordered column list, rejecting empty and
    /// duplicated inputs.
    pub fn from_columns(columns: Vec<String>) -> Result<Self> {
        Self::build(columns, "inline column list")
    }

    /// Load the persisted column list, a JSON array of strings, from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source_name = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|e| PredictionError::SchemaLoad {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;
        let columns: Vec<String> =
            serde_json::from_str(&raw).map_err(|e| PredictionError::SchemaLoad {
                source_name: source_name.clone(),
                reason: format!("not a JSON array of strings: {e}"),
            })?;

        let schema = Self::build(columns, &source_name)?;
        info!(path = %source_name, columns = schema.len(), "Loaded expected schema");
        Ok(schema)
    }

    fn build(columns: Vec<String>, source_name: &str) -> Result<Self> {
        if columns.is_empty() {
            return Err(PredictionError::SchemaLoad {
                source_name: source_name.to_string(),
                reason: "schema contains no columns".to_string(),
            });
        }

        let mut index = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if index.insert(column.clone(), position).is_some() {
                return Err(PredictionError::SchemaLoad {
                    source_name: source_name.to_string(),
                    reason: format!("duplicate column {column:?}"),
                });
            }
        }

        Ok(Self { columns, index })
    }

    /// Column names in training order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    /// Position of a column in training order
    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }
}
