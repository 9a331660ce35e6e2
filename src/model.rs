//! Admission prediction pipeline.
//!
//! [`AdmissionModel`] ties the resolved assemble plan to the two
//! pre-trained estimators. It is built once at process start from the
//! artifact bundle and is immutable afterwards: `Send + Sync`, safe to
//! share across concurrent readers without locking.

use std::fmt;
use std::path::Path;

use crate::artifact::{
    self, ArtifactError, CLASSIFIER_FILE, ENCODER_COLUMNS_FILE, REGRESSOR_FILE, SCALER_FILE,
};
use crate::assemble::AssemblePlan;
use crate::estimator::{Estimator, TaskKind};
use crate::record::{PatientRecord, RecordError};
use crate::scaling::ScalingParameters;
use crate::schema::CanonicalSchema;

/// Predicted admission type.
///
/// The classifier's positive class maps to `Emergency` and the negative
/// class to `Opd`. This label convention is fixed by the training
/// process and carried here as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionType {
    /// Emergency admission (classifier output 1).
    Emergency,
    /// Outpatient department admission (classifier output 0).
    Opd,
}

impl AdmissionType {
    /// Map a classifier probability to a label at the 0.5 threshold.
    pub fn from_score(score: f32) -> Self {
        if score >= 0.5 {
            Self::Emergency
        } else {
            Self::Opd
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Emergency => "Emergency",
            Self::Opd => "OPD",
        }
    }
}

impl fmt::Display for AdmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of one prediction request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Expected duration of stay, in days.
    pub duration_of_stay: f32,
    /// Predicted admission type.
    pub admission: AdmissionType,
}

/// Per-request prediction failures.
///
/// Once a model has loaded, the only way a request can fail is a
/// malformed input record; estimator invocation itself is infallible
/// after load-time validation.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// The input record violated a declared constraint.
    #[error(transparent)]
    InvalidInput(#[from] RecordError),
}

/// The loaded prediction pipeline.
///
/// # Example
///
/// ```no_run
/// use admitcast::model::AdmissionModel;
/// use admitcast::record::PatientRecord;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let model = AdmissionModel::from_dir("artifacts")?;
/// let json = std::fs::read_to_string("record.json")?;
/// let record: PatientRecord = serde_json::from_str(&json)?;
/// let prediction = model.predict(&record)?;
/// println!("{:.2} days, {}", prediction.duration_of_stay, prediction.admission);
/// # Ok(())
/// # }
/// ```
pub struct AdmissionModel {
    plan: AssemblePlan,
    regressor: Box<dyn Estimator>,
    classifier: Box<dyn Estimator>,
}

impl std::fmt::Debug for AdmissionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionModel").finish_non_exhaustive()
    }
}

impl AdmissionModel {
    /// Build a model from already-loaded parts.
    ///
    /// Validates everything the artifact formats cannot express on
    /// their own: scaler structure, scaler/schema consistency, each
    /// estimator's task and feature width. A model that constructs
    /// successfully cannot fail at predict time.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError`] on any validation failure.
    pub fn from_parts(
        schema: &CanonicalSchema,
        scaling: &ScalingParameters,
        regressor: Box<dyn Estimator>,
        classifier: Box<dyn Estimator>,
    ) -> Result<Self, ArtifactError> {
        scaling.validate()?;
        let plan = AssemblePlan::resolve(schema, scaling)?;

        for (role, expected, estimator) in [
            ("regressor", TaskKind::Regression, &regressor),
            ("classifier", TaskKind::BinaryClassification, &classifier),
        ] {
            if estimator.task() != expected {
                return Err(ArtifactError::WrongTask {
                    role,
                    expected,
                    got: estimator.task(),
                });
            }
            if estimator.n_features() != plan.n_features() {
                return Err(ArtifactError::FeatureCountMismatch {
                    role,
                    expected: estimator.n_features(),
                    got: plan.n_features(),
                });
            }
        }

        Ok(Self {
            plan,
            regressor,
            classifier,
        })
    }

    /// Load a model from an artifact bundle directory.
    ///
    /// Expects `encoder_columns.json`, `scaler.json`, `regressor.json`,
    /// and `classifier.json` (see the [`artifact`] module).
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError`] if any file is missing, unparseable,
    /// or inconsistent with the rest of the bundle.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        let schema: CanonicalSchema = artifact::read_json(&dir.join(ENCODER_COLUMNS_FILE))?;
        let scaling: ScalingParameters = artifact::read_json(&dir.join(SCALER_FILE))?;
        let regressor = artifact::load_estimator(
            &dir.join(REGRESSOR_FILE),
            "regressor",
            TaskKind::Regression,
            schema.len(),
        )?;
        let classifier = artifact::load_estimator(
            &dir.join(CLASSIFIER_FILE),
            "classifier",
            TaskKind::BinaryClassification,
            schema.len(),
        )?;
        Self::from_parts(&schema, &scaling, regressor, classifier)
    }

    /// The resolved assemble plan.
    pub fn plan(&self) -> &AssemblePlan {
        &self.plan
    }

    /// Predict duration of stay and admission type for one record.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::InvalidInput`] if the record violates a
    /// declared input constraint (age out of `[0, 120]`).
    pub fn predict(&self, record: &PatientRecord) -> Result<Prediction, PredictError> {
        record.validate()?;
        let features = self.plan.assemble(record);
        let duration_of_stay = self.regressor.predict(features.view());
        let score = self.classifier.predict(features.view());
        Ok(Prediction {
            duration_of_stay,
            admission: AdmissionType::from_score(score),
        })
    }
}

// The plan is plain data and both estimators are Send + Sync by trait
// bound, but keep the guarantee explicit.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AdmissionModel>();
};
