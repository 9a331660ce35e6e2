//! Linear estimator (weights + bias).

use ndarray::{Array1, ArrayView1};

use super::{Estimator, OutputTransform, TaskKind};

/// Linear scoring function: `transform(features · weights + bias)`.
///
/// # Example
///
/// ```
/// use admitcast::estimator::{Estimator, LinearEstimator, OutputTransform, TaskKind};
/// use ndarray::array;
///
/// let model = LinearEstimator::new(
///     array![0.5, -1.0],
///     2.0,
///     TaskKind::Regression,
///     OutputTransform::Identity,
/// );
/// assert_eq!(model.predict(array![4.0, 1.0].view()), 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct LinearEstimator {
    weights: Array1<f32>,
    bias: f32,
    task: TaskKind,
    transform: OutputTransform,
}

impl LinearEstimator {
    /// Create a linear estimator.
    pub fn new(
        weights: Array1<f32>,
        bias: f32,
        task: TaskKind,
        transform: OutputTransform,
    ) -> Self {
        Self {
            weights,
            bias,
            task,
            transform,
        }
    }

    /// Coefficients, one per feature.
    pub fn weights(&self) -> ArrayView1<'_, f32> {
        self.weights.view()
    }

    /// Intercept term.
    pub fn bias(&self) -> f32 {
        self.bias
    }
}

impl Estimator for LinearEstimator {
    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn task(&self) -> TaskKind {
        self.task
    }

    fn predict(&self, features: ArrayView1<'_, f32>) -> f32 {
        debug_assert_eq!(
            features.len(),
            self.weights.len(),
            "feature vector width must match trained width"
        );
        self.transform.apply(features.dot(&self.weights) + self.bias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn dot_plus_bias() {
        let model = LinearEstimator::new(
            array![1.0, 2.0, 3.0],
            0.5,
            TaskKind::Regression,
            OutputTransform::Identity,
        );
        assert_eq!(model.n_features(), 3);
        assert_abs_diff_eq!(
            model.predict(array![1.0, 1.0, 1.0].view()),
            6.5,
            epsilon = 1e-6
        );
    }

    #[test]
    fn sigmoid_transform_yields_probability() {
        let model = LinearEstimator::new(
            array![1.0],
            0.0,
            TaskKind::BinaryClassification,
            OutputTransform::Sigmoid,
        );
        assert_eq!(model.predict(array![0.0].view()), 0.5);
        assert!(model.predict(array![5.0].view()) > 0.5);
        assert!(model.predict(array![-5.0].view()) < 0.5);
    }
}
