//! Feature assembly: one patient record to one model-ready vector.
//!
//! The canonical schema and scaler are resolved once, at load time, into
//! an [`AssemblePlan`]: a fixed-size fill plan with one slot per output
//! position. Per-request assembly is then a single pass over the slots
//! with no name lookups and no failure paths, so schema/scaler
//! inconsistencies surface at startup instead of at predict time.

use ndarray::Array1;

use crate::record::{ClinicalFlag, Gender, Outcome, PatientRecord, Residence};
use crate::scaling::ScalingParameters;
use crate::schema::{CanonicalSchema, SchemaError};

/// Where a single output column takes its value from.
///
/// Unknown schema columns resolve to [`ColumnSource::Zero`]: reindexing
/// against the canonical schema zero-fills columns the record cannot
/// supply. The raw `GENDER`/`RURAL`/`OUTCOME` columns are dropped after
/// one-hot expansion, so those names resolve to `Zero` as well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnSource {
    /// Patient age.
    Age,
    /// Duration of intensive unit stay.
    IcuStay,
    /// Hemoglobin.
    Hb,
    /// Total leukocyte count.
    Tlc,
    /// Platelet count.
    Platelets,
    /// Blood glucose level.
    Glucose,
    /// Urea level.
    Urea,
    /// Creatinine level.
    Creatinine,
    /// Ejection fraction.
    Ef,
    /// One of the binary clinical flags.
    Flag(ClinicalFlag),
    /// One-hot indicator: 1 when the record's gender matches.
    GenderIs(Gender),
    /// One-hot indicator: 1 when the record's residence matches.
    ResidenceIs(Residence),
    /// One-hot indicator: 1 when the record's outcome matches.
    OutcomeIs(Outcome),
    /// Column unknown to the input surface; always 0.
    Zero,
}

impl ColumnSource {
    /// Resolve a schema column name to its source.
    pub fn from_column(name: &str) -> Self {
        match name {
            "AGE" => Self::Age,
            "DURATION OF INTENSIVE UNIT STAY" => Self::IcuStay,
            "HB" => Self::Hb,
            "TLC" => Self::Tlc,
            "PLATELETS" => Self::Platelets,
            "GLUCOSE" => Self::Glucose,
            "UREA" => Self::Urea,
            "CREATININE" => Self::Creatinine,
            "EF" => Self::Ef,
            "GENDER_M" => Self::GenderIs(Gender::M),
            "GENDER_F" => Self::GenderIs(Gender::F),
            "RURAL_R" => Self::ResidenceIs(Residence::R),
            "RURAL_U" => Self::ResidenceIs(Residence::U),
            "OUTCOME_DISCHARGE" => Self::OutcomeIs(Outcome::Discharge),
            "OUTCOME_EXPIRY" => Self::OutcomeIs(Outcome::Expiry),
            "OUTCOME_DAMA" => Self::OutcomeIs(Outcome::Dama),
            _ => match ClinicalFlag::from_column(name) {
                Some(flag) => Self::Flag(flag),
                None => Self::Zero,
            },
        }
    }

    /// Read this source's raw (unscaled) value from a record.
    #[inline]
    pub fn extract(&self, record: &PatientRecord) -> f32 {
        match *self {
            Self::Age => record.age,
            Self::IcuStay => record.icu_stay,
            Self::Hb => record.labs.hb,
            Self::Tlc => record.labs.tlc,
            Self::Platelets => record.labs.platelets,
            Self::Glucose => record.labs.glucose,
            Self::Urea => record.labs.urea,
            Self::Creatinine => record.labs.creatinine,
            Self::Ef => record.labs.ef,
            Self::Flag(flag) => record.flags.get(flag),
            Self::GenderIs(g) => (record.gender == g) as u8 as f32,
            Self::ResidenceIs(r) => (record.residence == r) as u8 as f32,
            Self::OutcomeIs(o) => (record.outcome == o) as u8 as f32,
            Self::Zero => 0.0,
        }
    }
}

/// One output position: value source plus optional standardization.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slot {
    source: ColumnSource,
    /// `(mean, scale)` when this column is standardized.
    scaling: Option<(f32, f32)>,
}

/// Resolved, immutable fill plan for the canonical schema.
///
/// # Example
///
/// ```
/// use admitcast::assemble::AssemblePlan;
/// use admitcast::record::PatientRecord;
/// use admitcast::scaling::ScalingParameters;
/// use admitcast::schema::CanonicalSchema;
///
/// let schema = CanonicalSchema::new(vec!["AGE".into(), "GENDER_M".into()]).unwrap();
/// let plan = AssemblePlan::resolve(&schema, &ScalingParameters::empty()).unwrap();
///
/// let record = PatientRecord { age: 45.0, ..Default::default() };
/// let features = plan.assemble(&record);
/// assert_eq!(features.to_vec(), vec![45.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct AssemblePlan {
    columns: Vec<String>,
    slots: Vec<Slot>,
}

impl AssemblePlan {
    /// Resolve a schema and scaler into a fill plan.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptySchema`] for a schema with no
    /// columns, or [`SchemaError::UnknownScalingColumn`] if the scaler
    /// names a column the schema does not contain. The scaler is
    /// expected to be structurally valid already (see
    /// [`ScalingParameters::validate`]).
    pub fn resolve(
        schema: &CanonicalSchema,
        scaling: &ScalingParameters,
    ) -> Result<Self, SchemaError> {
        if schema.is_empty() {
            return Err(SchemaError::EmptySchema);
        }
        for name in &scaling.feature_names {
            if !schema.contains(name) {
                return Err(SchemaError::UnknownScalingColumn(name.clone()));
            }
        }

        let slots = schema
            .columns()
            .iter()
            .map(|name| Slot {
                source: ColumnSource::from_column(name),
                scaling: scaling.lookup(name),
            })
            .collect();

        Ok(Self {
            columns: schema.columns().to_vec(),
            slots,
        })
    }

    /// Number of output columns.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.slots.len()
    }

    /// Output column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of an output column by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Assemble one record into a model-ready feature vector.
    ///
    /// Pure and deterministic: the output length and order match the
    /// resolved schema exactly, every time.
    pub fn assemble(&self, record: &PatientRecord) -> Array1<f32> {
        Array1::from_iter(self.slots.iter().map(|slot| {
            let raw = slot.source.extract(record);
            match slot.scaling {
                Some((mean, scale)) => (raw - mean) / scale,
                None => raw,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ClinicalFlags, LabValues};

    fn schema(columns: &[&str]) -> CanonicalSchema {
        CanonicalSchema::new(columns.iter().map(|c| c.to_string()).collect()).unwrap()
    }

    fn sample_record() -> PatientRecord {
        PatientRecord {
            age: 45.0,
            gender: Gender::M,
            residence: Residence::U,
            outcome: Outcome::Discharge,
            flags: ClinicalFlags {
                smoking: 1.0,
                ..Default::default()
            },
            icu_stay: 2.0,
            labs: LabValues {
                hb: 13.5,
                tlc: 7000.0,
                platelets: 250_000.0,
                glucose: 100.0,
                urea: 30.0,
                creatinine: 1.0,
                ef: 55.0,
            },
        }
    }

    #[test]
    fn output_matches_schema_length_and_order() {
        let schema = schema(&["HB", "AGE", "GENDER_F", "SMOKING"]);
        let plan = AssemblePlan::resolve(&schema, &ScalingParameters::empty()).unwrap();
        let v = plan.assemble(&sample_record());
        assert_eq!(v.len(), 4);
        assert_eq!(v.to_vec(), vec![13.5, 45.0, 0.0, 1.0]);
    }

    #[test]
    fn one_hot_is_exclusive_per_categorical() {
        let schema = schema(&[
            "GENDER_M",
            "GENDER_F",
            "RURAL_R",
            "RURAL_U",
            "OUTCOME_DISCHARGE",
            "OUTCOME_EXPIRY",
            "OUTCOME_DAMA",
        ]);
        let plan = AssemblePlan::resolve(&schema, &ScalingParameters::empty()).unwrap();

        for gender in [Gender::M, Gender::F] {
            for residence in [Residence::R, Residence::U] {
                for outcome in [Outcome::Discharge, Outcome::Expiry, Outcome::Dama] {
                    let record = PatientRecord {
                        gender,
                        residence,
                        outcome,
                        ..Default::default()
                    };
                    let v = plan.assemble(&record);
                    assert_eq!(v.slice(ndarray::s![0..2]).sum(), 1.0);
                    assert_eq!(v.slice(ndarray::s![2..4]).sum(), 1.0);
                    assert_eq!(v.slice(ndarray::s![4..7]).sum(), 1.0);
                }
            }
        }
    }

    #[test]
    fn unknown_schema_columns_zero_fill() {
        let schema = schema(&["AGE", "SOME FUTURE COLUMN", "GENDER"]);
        let plan = AssemblePlan::resolve(&schema, &ScalingParameters::empty()).unwrap();
        let v = plan.assemble(&sample_record());
        assert_eq!(v[0], 45.0);
        assert_eq!(v[1], 0.0);
        // raw categorical column is dropped after expansion
        assert_eq!(v[2], 0.0);
    }

    #[test]
    fn scaling_standardizes_named_columns_only() {
        let schema = schema(&["AGE", "HB", "SMOKING"]);
        let scaling = ScalingParameters::new(
            vec!["AGE".into(), "HB".into()],
            vec![60.0, 12.0],
            vec![15.0, 2.0],
        )
        .unwrap();
        let plan = AssemblePlan::resolve(&schema, &scaling).unwrap();
        let v = plan.assemble(&sample_record());
        assert_eq!(v[0], (45.0 - 60.0) / 15.0);
        assert_eq!(v[1], (13.5 - 12.0) / 2.0);
        // indicator/binary columns pass through unscaled
        assert_eq!(v[2], 1.0);
    }

    #[test]
    fn raw_equal_to_mean_encodes_zero() {
        let schema = schema(&["AGE"]);
        let scaling =
            ScalingParameters::new(vec!["AGE".into()], vec![45.0], vec![15.0]).unwrap();
        let plan = AssemblePlan::resolve(&schema, &scaling).unwrap();
        assert_eq!(plan.assemble(&sample_record())[0], 0.0);
    }

    #[test]
    fn assembly_is_idempotent() {
        let schema = schema(&["AGE", "HB", "GENDER_M", "OUTCOME_DAMA", "VT"]);
        let scaling =
            ScalingParameters::new(vec!["HB".into()], vec![12.0], vec![2.0]).unwrap();
        let plan = AssemblePlan::resolve(&schema, &scaling).unwrap();
        let record = sample_record();
        let first = plan.assemble(&record);
        let second = plan.assemble(&record);
        assert_eq!(first, second);
    }

    #[test]
    fn scaler_column_missing_from_schema_fails_resolution() {
        let schema = schema(&["AGE"]);
        let scaling =
            ScalingParameters::new(vec!["HB".into()], vec![12.0], vec![2.0]).unwrap();
        let err = AssemblePlan::resolve(&schema, &scaling).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownScalingColumn(ref c) if c == "HB"));
    }

    #[test]
    fn every_flag_column_resolves_to_its_flag() {
        for &flag in ClinicalFlag::ALL {
            assert_eq!(
                ColumnSource::from_column(flag.column_name()),
                ColumnSource::Flag(flag)
            );
        }
    }
}
