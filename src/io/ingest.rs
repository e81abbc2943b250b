//! CSV ingest for batch sessions.
//!
//! Two layouts are accepted:
//!
//! - **raw**: `galaxy,object,m,k_measured,h_measured`, i.e. exactly what the
//!   form collects
//! - **results**: the table written by `io::export` (`Galaxy,Object,Apparent
//!   Magnitude,delta_k (Å),...`). Measured wavelengths are rebuilt from the
//!   shifts; velocity and distance are recomputed on submission, never trusted.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Order preserving**: rows come back in file order

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::warn;

use crate::domain::ObservationInput;
use crate::error::AppError;
use crate::physics::{H_REST, K_REST};

/// Which column layout a file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    Raw,
    Results,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: accepted submissions in file order plus rejected rows.
#[derive(Debug, Clone)]
pub struct IngestedObservations {
    pub layout: CsvLayout,
    pub inputs: Vec<ObservationInput>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load observation submissions from a CSV file.
pub fn load_observations(path: &Path) -> Result<IngestedObservations, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_observations(file)
}

/// Parse observation submissions from any CSV reader.
pub fn read_observations<R: Read>(reader: R) -> Result<IngestedObservations, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let layout = resolve_layout(&header_map)?;

    let mut inputs = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header; lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let parsed = parse_row(&record, &header_map, layout)
            .and_then(|input| input.validate().map(|()| input).map_err(|e| e.to_string()));
        match parsed {
            Ok(input) => inputs.push(input),
            Err(message) => {
                warn!(line, %message, "skipping CSV row");
                row_errors.push(RowError { line, message });
            }
        }
    }

    Ok(IngestedObservations {
        layout,
        inputs,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

/// `"\u{feff}Velocity (km/s)"` -> `"velocity"`, `"Apparent Magnitude"` -> `"apparent_magnitude"`.
fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    let name = name.split('(').next().unwrap_or(name).trim();
    name.to_lowercase().replace(' ', "_")
}

fn resolve_layout(header_map: &HashMap<String, usize>) -> Result<CsvLayout, AppError> {
    let has = |cols: &[&str]| cols.iter().all(|c| header_map.contains_key(*c));

    if has(&["m", "k_measured", "h_measured"]) {
        return Ok(CsvLayout::Raw);
    }
    if has(&["apparent_magnitude", "delta_k", "delta_h"]) {
        return Ok(CsvLayout::Results);
    }

    Err(AppError::new(
        2,
        "Unrecognized CSV columns: expected `galaxy,object,m,k_measured,h_measured` \
         or an exported results table (`Apparent Magnitude`, `delta_k (Å)`, `delta_h (Å)`).",
    ))
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    layout: CsvLayout,
) -> Result<ObservationInput, String> {
    let galaxy = get_optional(record, header_map, "galaxy").unwrap_or_default().to_string();
    let object = get_optional(record, header_map, "object").unwrap_or_default().to_string();

    let (m, k_measured, h_measured) = match layout {
        CsvLayout::Raw => (
            parse_f64(get_required(record, header_map, "m")?, "m")?,
            parse_f64(get_required(record, header_map, "k_measured")?, "k_measured")?,
            parse_f64(get_required(record, header_map, "h_measured")?, "h_measured")?,
        ),
        CsvLayout::Results => (
            parse_f64(get_required(record, header_map, "apparent_magnitude")?, "Apparent Magnitude")?,
            parse_f64(get_required(record, header_map, "delta_k")?, "delta_k")? + K_REST,
            parse_f64(get_required(record, header_map, "delta_h")?, "delta_h")? + H_REST,
        ),
    };

    Ok(ObservationInput {
        galaxy,
        object,
        m,
        k_measured,
        h_measured,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(s: &str, name: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid number for `{name}`: '{s}'"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite value for `{name}`: '{s}'"))
    }
}
