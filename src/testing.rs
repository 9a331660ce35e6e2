//! Testing utilities.
//!
//! Shared fixtures for unit and integration tests: the full training
//! column layout and a representative patient record. Usable from
//! `tests/` as well as `#[cfg(test)]` modules.

use crate::record::{
    ClinicalFlag, ClinicalFlags, Gender, LabValues, Outcome, PatientRecord, Residence,
};
use crate::schema::CanonicalSchema;

/// The full 52-column training layout: age, the 36 clinical flags, ICU
/// stay, the lab values, then the 7 one-hot indicator columns.
pub fn training_columns() -> Vec<String> {
    let mut columns = vec!["AGE".to_string()];
    columns.extend(
        ClinicalFlag::ALL
            .iter()
            .map(|f| f.column_name().to_string()),
    );
    for name in [
        "DURATION OF INTENSIVE UNIT STAY",
        "HB",
        "TLC",
        "PLATELETS",
        "GLUCOSE",
        "UREA",
        "CREATININE",
        "EF",
        "RURAL_R",
        "RURAL_U",
        "GENDER_M",
        "GENDER_F",
        "OUTCOME_DISCHARGE",
        "OUTCOME_EXPIRY",
        "OUTCOME_DAMA",
    ] {
        columns.push(name.to_string());
    }
    columns
}

/// [`training_columns`] as a validated schema.
pub fn training_schema() -> CanonicalSchema {
    CanonicalSchema::new(training_columns()).expect("training columns are non-empty")
}

/// A representative, valid patient record: 45-year-old urban male,
/// discharged, no clinical flags set, unremarkable labs.
pub fn sample_record() -> PatientRecord {
    PatientRecord {
        age: 45.0,
        gender: Gender::M,
        residence: Residence::U,
        outcome: Outcome::Discharge,
        flags: ClinicalFlags::default(),
        icu_stay: 0.0,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_layout_is_complete() {
        let columns = training_columns();
        assert_eq!(columns.len(), 52);
        // every clinical flag appears exactly once
        for &flag in ClinicalFlag::ALL {
            assert_eq!(
                columns.iter().filter(|c| *c == flag.column_name()).count(),
                1
            );
        }
    }

    #[test]
    fn sample_record_is_valid() {
        assert!(sample_record().validate().is_ok());
    }
}
