//! Pre-trained estimators.
//!
//! The pipeline treats its two models as black boxes behind the
//! [`Estimator`] trait: given a feature vector of the trained width,
//! return one score. Two concrete artifact-backed implementations are
//! provided: [`LinearEstimator`] (weights + bias) and
//! [`ForestEstimator`] (additive scalar-leaf decision trees).
//!
//! Estimators are deterministic and read-only; all structural
//! validation happens at construction, so prediction itself is
//! infallible.

mod forest;
mod linear;

pub use forest::{ForestError, ForestEstimator, Tree};
pub use linear::LinearEstimator;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Type of task an estimator was trained for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Continuous target (duration of stay, in days).
    Regression,
    /// Binary target (admission type).
    BinaryClassification,
}

/// Transform applied to the raw margin score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTransform {
    /// Pass the margin through unchanged (regression).
    #[default]
    Identity,
    /// Logistic sigmoid: margin to probability (binary classification).
    Sigmoid,
}

impl OutputTransform {
    /// Apply the transform to a margin score.
    #[inline]
    pub fn apply(&self, margin: f32) -> f32 {
        match self {
            Self::Identity => margin,
            Self::Sigmoid => 1.0 / (1.0 + (-margin).exp()),
        }
    }
}

/// A pre-trained, read-only scoring function.
///
/// Implementations must be pure: the same features always produce the
/// same score, with no hidden state.
pub trait Estimator: Send + Sync {
    /// Width of the feature vector the estimator was trained on.
    fn n_features(&self) -> usize;

    /// Task the estimator was trained for.
    fn task(&self) -> TaskKind;

    /// Score one feature vector.
    ///
    /// Callers guarantee `features.len() == self.n_features()`; the
    /// pipeline enforces this once at load time.
    fn predict(&self, features: ArrayView1<'_, f32>) -> f32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_centered_and_bounded() {
        assert_eq!(OutputTransform::Sigmoid.apply(0.0), 0.5);
        assert!(OutputTransform::Sigmoid.apply(10.0) > 0.99);
        assert!(OutputTransform::Sigmoid.apply(-10.0) < 0.01);
    }

    #[test]
    fn identity_passes_through() {
        assert_eq!(OutputTransform::Identity.apply(3.25), 3.25);
    }
}
