//! admitcast: hospital admission inference against pre-trained artifacts.
//!
//! Turns one patient record into a feature vector that exactly matches
//! the column schema the models were trained on, then invokes two
//! pre-trained estimators: duration of stay (regression, days) and
//! admission type (binary, Emergency vs OPD).
//!
//! # Key Types
//!
//! - [`AdmissionModel`] - The loaded pipeline: assemble + predict
//! - [`PatientRecord`] - One request's clinical inputs
//! - [`AssemblePlan`] - Schema and scaler resolved into a fixed fill plan
//! - [`Prediction`] / [`AdmissionType`] - Request output
//!
//! # Loading and predicting
//!
//! ```no_run
//! use admitcast::AdmissionModel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = AdmissionModel::from_dir("artifacts")?;
//! let record = serde_json::from_str(r#"{"AGE": 45, "GENDER": "M", "RURAL": "U", "OUTCOME": "DISCHARGE"}"#)?;
//! let prediction = model.predict(&record)?;
//! println!("{:.2} days, {}", prediction.duration_of_stay, prediction.admission);
//! # Ok(())
//! # }
//! ```
//!
//! The artifact bundle format is described in the [`artifact`] module.
//! All artifacts are loaded and cross-validated once at startup; a
//! model that loads cannot fail at predict time except on malformed
//! input.

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod artifact;
pub mod assemble;
pub mod estimator;
pub mod model;
pub mod record;
pub mod scaling;
pub mod schema;
pub mod testing;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// The pipeline (most users want only these)
pub use model::{AdmissionModel, AdmissionType, PredictError, Prediction};

// Input record types
pub use record::{ClinicalFlag, ClinicalFlags, Gender, LabValues, Outcome, PatientRecord, Residence};

// Feature assembly
pub use assemble::{AssemblePlan, ColumnSource};
pub use scaling::ScalingParameters;
pub use schema::CanonicalSchema;

// Estimator seam
pub use estimator::{Estimator, OutputTransform, TaskKind};

// Errors
pub use artifact::ArtifactError;
pub use record::RecordError;
pub use scaling::ScalingError;
pub use schema::SchemaError;
