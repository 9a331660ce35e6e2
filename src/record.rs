//! Patient input record.
//!
//! The input surface is a closed set of named clinical fields: three
//! categorical attributes, 36 clinical flags, and a handful of numeric
//! measurements. Field names mirror the column headers the models were
//! trained against, so a record can be deserialized straight from the
//! upstream JSON payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors for a single malformed input record.
///
/// These are per-request failures: the record is rejected and the caller
/// may correct and resubmit. They never poison loaded model state.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A categorical field carried a value outside its declared set.
    #[error("invalid value {value:?} for field {field}: expected one of {allowed}")]
    InvalidCategory {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },
    /// Age must lie in [0, 120].
    #[error("age {0} is outside the accepted range [0, 120]")]
    AgeOutOfRange(f32),
}

/// Patient gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl FromStr for Gender {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Self::M),
            "F" => Ok(Self::F),
            _ => Err(RecordError::InvalidCategory {
                field: "GENDER",
                value: s.to_string(),
                allowed: "M, F",
            }),
        }
    }
}

/// Rural/urban residence indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Residence {
    R,
    U,
}

impl FromStr for Residence {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R" => Ok(Self::R),
            "U" => Ok(Self::U),
            _ => Err(RecordError::InvalidCategory {
                field: "RURAL",
                value: s.to_string(),
                allowed: "R, U",
            }),
        }
    }
}

/// Recorded outcome category of the prior episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Discharge,
    Expiry,
    Dama,
}

impl FromStr for Outcome {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DISCHARGE" => Ok(Self::Discharge),
            "EXPIRY" => Ok(Self::Expiry),
            "DAMA" => Ok(Self::Dama),
            _ => Err(RecordError::InvalidCategory {
                field: "OUTCOME",
                value: s.to_string(),
                allowed: "DISCHARGE, EXPIRY, DAMA",
            }),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Discharge => "DISCHARGE",
            Self::Expiry => "EXPIRY",
            Self::Dama => "DAMA",
        };
        f.write_str(s)
    }
}

macro_rules! clinical_flags {
    ($(($variant:ident, $field:ident, $column:literal)),+ $(,)?) => {
        /// One of the 36 binary clinical flags.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum ClinicalFlag {
            $($variant,)+
        }

        impl ClinicalFlag {
            /// Every flag, in canonical (training-column) order.
            pub const ALL: &'static [ClinicalFlag] = &[$(Self::$variant,)+];

            /// The training-time column name for this flag.
            pub fn column_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $column,)+
                }
            }

            /// Resolve a training-time column name back to a flag.
            pub fn from_column(name: &str) -> Option<Self> {
                match name {
                    $($column => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        /// Values of the 36 clinical flags.
        ///
        /// Stored as `f32` and passed through without range validation:
        /// the upstream contract does not restrict these to {0, 1}, so
        /// out-of-range values flow to the model unchanged.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
        pub struct ClinicalFlags {
            $(
                #[serde(rename = $column, default)]
                pub $field: f32,
            )+
        }

        impl ClinicalFlags {
            /// Value of a single flag.
            pub fn get(&self, flag: ClinicalFlag) -> f32 {
                match flag {
                    $(ClinicalFlag::$variant => self.$field,)+
                }
            }
        }
    };
}

clinical_flags! {
    (Smoking, smoking, "SMOKING"),
    (Alcohol, alcohol, "ALCOHOL"),
    (Dm, dm, "DM"),
    (Htn, htn, "HTN"),
    (Cad, cad, "CAD"),
    (PriorCmp, prior_cmp, "PRIOR CMP"),
    (Ckd, ckd, "CKD"),
    (RaisedCardiacEnzymes, raised_cardiac_enzymes, "RAISED CARDIAC ENZYMES"),
    (SevereAnaemia, severe_anaemia, "SEVERE ANAEMIA"),
    (Anaemia, anaemia, "ANAEMIA"),
    (StableAngina, stable_angina, "STABLE ANGINA"),
    (Stemi, stemi, "STEMI"),
    (AtypicalChestPain, atypical_chest_pain, "ATYPICAL CHEST PAIN"),
    (HeartFailure, heart_failure, "HEART FAILURE"),
    (Hfref, hfref, "HFREF"),
    (Hfnef, hfnef, "HFNEF"),
    (Acs, acs, "ACS"),
    (Valvular, valvular, "VALVULAR"),
    (Chb, chb, "CHB"),
    (Sss, sss, "SSS"),
    (Aki, aki, "AKI"),
    (CvaBleed, cva_bleed, "CVA BLEED"),
    (CvaInfract, cva_infract, "CVA INFRACT"),
    (Af, af, "AF"),
    (Vt, vt, "VT"),
    (Psvt, psvt, "PSVT"),
    (Congenital, congenital, "CONGENITAL"),
    (Uti, uti, "UTI"),
    (NeuroCardiogenicSyncope, neuro_cardiogenic_syncope, "NEURO CARDIOGENIC SYNCOPE"),
    (Orthostatic, orthostatic, "ORTHOSTATIC"),
    (InfectiveEndocarditis, infective_endocarditis, "INFECTIVE ENDOCARDITIS"),
    (Dvt, dvt, "DVT"),
    (CardiogenicShock, cardiogenic_shock, "CARDIOGENIC SHOCK"),
    (Shock, shock, "SHOCK"),
    (PulmonaryEmbolism, pulmonary_embolism, "PULMONARY EMBOLISM"),
    (ChestInfection, chest_infection, "CHEST INFECTION"),
}

/// Laboratory measurements.
///
/// Unbounded: plausibility checks are a UI concern, values pass through
/// to scaling as entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabValues {
    /// Hemoglobin.
    #[serde(rename = "HB", default)]
    pub hb: f32,
    /// Total leukocyte count.
    #[serde(rename = "TLC", default)]
    pub tlc: f32,
    /// Platelet count.
    #[serde(rename = "PLATELETS", default)]
    pub platelets: f32,
    /// Blood glucose level.
    #[serde(rename = "GLUCOSE", default)]
    pub glucose: f32,
    /// Urea level.
    #[serde(rename = "UREA", default)]
    pub urea: f32,
    /// Creatinine level.
    #[serde(rename = "CREATININE", default)]
    pub creatinine: f32,
    /// Ejection fraction.
    #[serde(rename = "EF", default)]
    pub ef: f32,
}

/// One patient's inputs for a single prediction request.
///
/// Created fresh per request and discarded after the derived feature
/// vector is consumed. The field set is closed; there are no dynamic
/// fields.
///
/// # Example
///
/// ```
/// use admitcast::record::{Gender, Outcome, PatientRecord, Residence};
///
/// let record = PatientRecord {
///     age: 45.0,
///     gender: Gender::M,
///     residence: Residence::U,
///     outcome: Outcome::Discharge,
///     ..Default::default()
/// };
/// assert!(record.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "AGE")]
    pub age: f32,
    #[serde(rename = "GENDER")]
    pub gender: Gender,
    #[serde(rename = "RURAL")]
    pub residence: Residence,
    #[serde(rename = "OUTCOME")]
    pub outcome: Outcome,
    #[serde(flatten)]
    pub flags: ClinicalFlags,
    #[serde(rename = "DURATION OF INTENSIVE UNIT STAY", default)]
    pub icu_stay: f32,
    #[serde(flatten)]
    pub labs: LabValues,
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self {
            age: 0.0,
            gender: Gender::M,
            residence: Residence::U,
            outcome: Outcome::Discharge,
            flags: ClinicalFlags::default(),
            icu_stay: 0.0,
            labs: LabValues::default(),
        }
    }
}

impl PatientRecord {
    /// Check the bounded input constraints.
    ///
    /// Only age carries a declared range; every other numeric field is
    /// deliberately permissive.
    pub fn validate(&self) -> Result<(), RecordError> {
        if !(0.0..=120.0).contains(&self.age) {
            return Err(RecordError::AgeOutOfRange(self.age));
        }
        Ok(())
    }
}
