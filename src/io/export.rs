//! Export the observation table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts, and it can be fed back into `hubble fit -f` to rebuild a session.
//! Floats are written with Rust's shortest round-trip formatting.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{Observation, ObservationInput};
use crate::error::AppError;

/// Header row of the results CSV.
pub const RESULTS_HEADER: [&str; 7] = [
    "Galaxy",
    "Object",
    "Apparent Magnitude",
    "delta_k (Å)",
    "delta_h (Å)",
    "Velocity (km/s)",
    "Distance (Mpc)",
];

/// Write the table to a CSV file.
pub fn write_results_csv(path: &Path, observations: &[Observation]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, observations)
}

/// Write the table as CSV to any writer.
pub fn write_results<W: Write>(writer: W, observations: &[Observation]) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(RESULTS_HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for o in observations {
        out.write_record([
            o.galaxy.clone(),
            o.object.clone(),
            o.m.to_string(),
            o.delta_k.to_string(),
            o.delta_h.to_string(),
            o.velocity.to_string(),
            o.distance.to_string(),
        ])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Header row of a raw observation CSV (what the form collects).
pub const RAW_HEADER: [&str; 5] = ["galaxy", "object", "m", "k_measured", "h_measured"];

/// Write raw submissions (e.g. a synthetic sample) as CSV.
pub fn write_raw_csv(path: &Path, inputs: &[ObservationInput]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))?;
    write_raw(file, inputs)
}

/// Write raw submissions as CSV to any writer.
pub fn write_raw<W: Write>(writer: W, inputs: &[ObservationInput]) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(RAW_HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;
    for i in inputs {
        out.write_record([
            i.galaxy.clone(),
            i.object.clone(),
            i.m.to_string(),
            i.k_measured.to_string(),
            i.h_measured.to_string(),
        ])
        .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

/// Render the table as an in-memory CSV string.
pub fn results_csv_string(observations: &[Observation]) -> Result<String, AppError> {
    let mut buf = Vec::new();
    write_results(&mut buf, observations)?;
    String::from_utf8(buf).map_err(|e| AppError::new(4, format!("Export CSV is not UTF-8: {e}")))
}
