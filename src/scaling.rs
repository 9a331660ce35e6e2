//! Per-column standardization parameters.
//!
//! Mirrors the pre-fit standard scaler shipped with the models: parallel
//! arrays of column names, means, and scales. Loaded once, validated
//! once, never mutated.

use serde::{Deserialize, Serialize};

/// Structural errors in the scaler artifact.
#[derive(Debug, thiserror::Error)]
pub enum ScalingError {
    /// `feature_names`, `mean`, and `scale` must be parallel arrays.
    #[error("scaler arrays disagree in length: {names} names, {means} means, {scales} scales")]
    LengthMismatch {
        names: usize,
        means: usize,
        scales: usize,
    },
    /// A zero scale would divide by zero at assembly time.
    #[error("scaler column {0:?} has zero scale")]
    ZeroScale(String),
}

/// Pre-fit `(mean, scale)` pairs for the numeric feature columns.
///
/// A column present here is standardized to `(value - mean) / scale`
/// during assembly; columns absent here pass through unscaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingParameters {
    /// Column names, in the scaler's own order.
    pub feature_names: Vec<String>,
    /// Per-column means, parallel to `feature_names`.
    pub mean: Vec<f32>,
    /// Per-column scales, parallel to `feature_names`.
    pub scale: Vec<f32>,
}

impl ScalingParameters {
    /// Create validated scaling parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ScalingError`] if the arrays are not parallel or any
    /// scale is exactly zero.
    pub fn new(
        feature_names: Vec<String>,
        mean: Vec<f32>,
        scale: Vec<f32>,
    ) -> Result<Self, ScalingError> {
        let params = Self {
            feature_names,
            mean,
            scale,
        };
        params.validate()?;
        Ok(params)
    }

    /// An empty scaler: every column passes through unscaled.
    pub fn empty() -> Self {
        Self {
            feature_names: Vec::new(),
            mean: Vec::new(),
            scale: Vec::new(),
        }
    }

    /// Check structural invariants.
    ///
    /// Deserialized parameters must be validated before use; the plan
    /// resolver does this once at load time.
    pub fn validate(&self) -> Result<(), ScalingError> {
        if self.feature_names.len() != self.mean.len()
            || self.feature_names.len() != self.scale.len()
        {
            return Err(ScalingError::LengthMismatch {
                names: self.feature_names.len(),
                means: self.mean.len(),
                scales: self.scale.len(),
            });
        }
        for (name, &scale) in self.feature_names.iter().zip(&self.scale) {
            if scale == 0.0 {
                return Err(ScalingError::ZeroScale(name.clone()));
            }
        }
        Ok(())
    }

    /// Number of scaled columns.
    pub fn len(&self) -> usize {
        self.feature_names.len()
    }

    /// Whether no column is scaled.
    pub fn is_empty(&self) -> bool {
        self.feature_names.is_empty()
    }

    /// The `(mean, scale)` pair for a column, if it is scaled.
    pub fn lookup(&self, column: &str) -> Option<(f32, f32)> {
        self.feature_names
            .iter()
            .position(|n| n == column)
            .map(|i| (self.mean[i], self.scale[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_pairs() {
        let params = ScalingParameters::new(
            vec!["AGE".into(), "HB".into()],
            vec![60.0, 12.0],
            vec![15.0, 2.0],
        )
        .unwrap();
        assert_eq!(params.lookup("HB"), Some((12.0, 2.0)));
        assert_eq!(params.lookup("TLC"), None);
    }

    #[test]
    fn rejects_unparallel_arrays() {
        let err = ScalingParameters::new(vec!["AGE".into()], vec![60.0, 1.0], vec![15.0])
            .unwrap_err();
        assert!(matches!(err, ScalingError::LengthMismatch { .. }));
    }

    #[test]
    fn rejects_zero_scale() {
        let err = ScalingParameters::new(vec!["AGE".into()], vec![60.0], vec![0.0])
            .unwrap_err();
        assert!(matches!(err, ScalingError::ZeroScale(ref c) if c == "AGE"));
    }

    #[test]
    fn empty_scaler_is_valid() {
        assert!(ScalingParameters::empty().validate().is_ok());
    }
}
