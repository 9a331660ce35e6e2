//! Canonical feature schema.
//!
//! The canonical schema is the ordered list of column names the models
//! were trained against. It is produced once at training time, shipped
//! as an artifact, and treated as immutable configuration here: every
//! inference-time vector must match its length and order exactly.

use serde::{Deserialize, Serialize};

/// Schema/scaler consistency errors.
///
/// These indicate corrupted training artifacts and are fatal at load
/// time; they are never raised per request.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The canonical column list was empty.
    #[error("canonical schema has no columns")]
    EmptySchema,
    /// The scaler names a column the schema does not contain.
    #[error("scaler column {0:?} is not present in the canonical schema")]
    UnknownScalingColumn(String),
}

/// Ordered list of training-time feature column names.
///
/// # Example
///
/// ```
/// use admitcast::schema::CanonicalSchema;
///
/// let schema = CanonicalSchema::new(vec!["AGE".into(), "GENDER_M".into()]).unwrap();
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.position("GENDER_M"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalSchema {
    columns: Vec<String>,
}

impl CanonicalSchema {
    /// Create a schema from an ordered column list.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptySchema`] for an empty list.
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::EmptySchema);
        }
        Ok(Self { columns })
    }

    /// Number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// A non-empty schema is an invariant, but keep the idiomatic pair.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in canonical order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column by name, if present.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether the schema contains a column with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}
