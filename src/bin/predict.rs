//! One-shot prediction driver.
//!
//! Loads an artifact bundle, reads one patient record from a JSON file,
//! and prints the predicted duration of stay and admission type:
//!
//! `cargo run --bin predict -- <artifact-dir> <record.json>`
//!
//! This stands in for the interactive form layer: the record file uses
//! the same column names the form collects.

use std::fs;
use std::process::ExitCode;

use admitcast::{AdmissionModel, PatientRecord};

fn run(artifact_dir: &str, record_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let model = AdmissionModel::from_dir(artifact_dir)?;

    let json = fs::read_to_string(record_path)?;
    let record: PatientRecord = serde_json::from_str(&json)?;

    let prediction = model.predict(&record)?;
    println!(
        "Predicted Duration of Stay: {:.2} days",
        prediction.duration_of_stay
    );
    println!("Predicted Type of Admission: {}", prediction.admission);
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let (artifact_dir, record_path) = match args.as_slice() {
        [_, dir, record] => (dir.as_str(), record.as_str()),
        _ => {
            eprintln!("usage: predict <artifact-dir> <record.json>");
            return ExitCode::from(2);
        }
    };

    match run(artifact_dir, record_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
