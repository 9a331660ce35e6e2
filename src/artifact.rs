//! Artifact bundle loading.
//!
//! The training process ships four read-only JSON files in one
//! directory: the canonical column list, the fitted scaler, and the two
//! estimators. Everything here is loaded and validated once at process
//! start; a bundle that loads successfully cannot fail at predict time.
//!
//! The estimator files use a stable, tagged on-disk schema
//! ([`EstimatorSchema`]) kept separate from the runtime types so the
//! format can evolve independently of them.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ndarray::Array1;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::estimator::{
    Estimator, ForestError, ForestEstimator, LinearEstimator, OutputTransform, TaskKind, Tree,
};
use crate::scaling::ScalingError;
use crate::schema::SchemaError;

/// File name of the canonical column list inside a bundle directory.
pub const ENCODER_COLUMNS_FILE: &str = "encoder_columns.json";
/// File name of the fitted scaler inside a bundle directory.
pub const SCALER_FILE: &str = "scaler.json";
/// File name of the duration-of-stay regressor inside a bundle directory.
pub const REGRESSOR_FILE: &str = "regressor.json";
/// File name of the admission-type classifier inside a bundle directory.
pub const CLASSIFIER_FILE: &str = "classifier.json";

/// Errors while loading or validating the artifact bundle.
///
/// All of these are fatal configuration errors: the process cannot
/// serve any request against a bundle that fails to load.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse artifact {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Schema/scaler inconsistency (see [`SchemaError`]).
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Structurally invalid scaler arrays.
    #[error(transparent)]
    Scaling(#[from] ScalingError),
    /// Structurally invalid forest.
    #[error(transparent)]
    Forest(#[from] ForestError),
    /// An estimator was trained on a different feature width than the
    /// canonical schema provides.
    #[error("{role} expects {expected} features but the canonical schema has {got}")]
    FeatureCountMismatch {
        role: &'static str,
        expected: usize,
        got: usize,
    },
    /// An estimator artifact declares the wrong task for its role.
    #[error("{role} must be a {expected:?} model, found {got:?}")]
    WrongTask {
        role: &'static str,
        expected: TaskKind,
        got: TaskKind,
    },
}

/// Read and parse one JSON artifact file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// On-disk estimator schema.
///
/// Tagged by `kind` so a bundle can mix estimator families freely; the
/// runtime types are constructed (and validated) via
/// [`EstimatorSchema::into_estimator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorSchema {
    /// Weights-plus-bias linear model.
    Linear {
        weights: Vec<f32>,
        bias: f32,
        task: TaskKind,
        #[serde(default)]
        transform: OutputTransform,
    },
    /// Additive ensemble of scalar-leaf decision trees.
    Forest {
        trees: Vec<Tree>,
        base_score: f32,
        n_features: usize,
        task: TaskKind,
        #[serde(default)]
        transform: OutputTransform,
    },
}

impl EstimatorSchema {
    /// Declared task of the serialized estimator.
    pub fn task(&self) -> TaskKind {
        match self {
            Self::Linear { task, .. } | Self::Forest { task, .. } => *task,
        }
    }

    /// Declared feature width of the serialized estimator.
    pub fn n_features(&self) -> usize {
        match self {
            Self::Linear { weights, .. } => weights.len(),
            Self::Forest { n_features, .. } => *n_features,
        }
    }

    /// Convert into a validated runtime estimator.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Forest`] if a forest fails structural
    /// validation.
    pub fn into_estimator(self) -> Result<Box<dyn Estimator>, ArtifactError> {
        match self {
            Self::Linear {
                weights,
                bias,
                task,
                transform,
            } => Ok(Box::new(LinearEstimator::new(
                Array1::from_vec(weights),
                bias,
                task,
                transform,
            ))),
            Self::Forest {
                trees,
                base_score,
                n_features,
                task,
                transform,
            } => Ok(Box::new(ForestEstimator::new(
                trees, base_score, n_features, task, transform,
            )?)),
        }
    }
}

/// Load one estimator file and check it against its role.
///
/// `role` is the bundle slot ("regressor" or "classifier"); the
/// estimator must declare the matching task and the canonical feature
/// width. Both checks happen here, at load time.
pub fn load_estimator(
    path: &Path,
    role: &'static str,
    expected_task: TaskKind,
    n_features: usize,
) -> Result<Box<dyn Estimator>, ArtifactError> {
    let schema: EstimatorSchema = read_json(path)?;
    if schema.task() != expected_task {
        return Err(ArtifactError::WrongTask {
            role,
            expected: expected_task,
            got: schema.task(),
        });
    }
    if schema.n_features() != n_features {
        return Err(ArtifactError::FeatureCountMismatch {
            role,
            expected: schema.n_features(),
            got: n_features,
        });
    }
    schema.into_estimator()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn linear_schema_roundtrip() {
        let schema = EstimatorSchema::Linear {
            weights: vec![1.0, 2.0],
            bias: 0.5,
            task: TaskKind::Regression,
            transform: OutputTransform::Identity,
        };
        let json = serde_json::to_string(&schema).unwrap();
        let parsed: EstimatorSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schema);

        let estimator = parsed.into_estimator().unwrap();
        assert_eq!(estimator.n_features(), 2);
        assert_eq!(estimator.predict(array![1.0, 1.0].view()), 3.5);
    }

    #[test]
    fn transform_defaults_to_identity() {
        let parsed: EstimatorSchema = serde_json::from_str(
            r#"{"kind": "linear", "weights": [1.0], "bias": 0.0, "task": "regression"}"#,
        )
        .unwrap();
        assert!(matches!(
            parsed,
            EstimatorSchema::Linear {
                transform: OutputTransform::Identity,
                ..
            }
        ));
    }

    #[test]
    fn forest_schema_validates_on_conversion() {
        let schema = EstimatorSchema::Forest {
            trees: vec![Tree::stump(5, 1.0, 0.0, 0.0)],
            base_score: 0.0,
            n_features: 2,
            task: TaskKind::Regression,
            transform: OutputTransform::Identity,
        };
        assert!(matches!(
            schema.into_estimator(),
            Err(ArtifactError::Forest(ForestError::FeatureOutOfRange { .. }))
        ));
    }

    #[test]
    fn read_json_reports_missing_file() {
        let err =
            read_json::<EstimatorSchema>(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }
}
