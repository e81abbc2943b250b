//! Read/write fit JSON files.
//!
//! A fit file is the portable record of one "compute fit" request:
//! - Hubble constant, intercept and the implied age (or why it was withheld)
//! - quality diagnostics
//! - the `(distance, velocity)` points and fitted-line endpoints, so the plot
//!   can be redrawn without the original table

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{FitQuality, FitResult, LinearFit, Observation};
use crate::error::AppError;
use crate::plot::{PlotSeries, padded_bounds};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    /// km/s/Mpc.
    pub hubble_constant: f64,
    /// km/s.
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_years: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_warning: Option<String>,
    pub quality: FitQuality,
    pub points: Vec<(f64, f64)>,
    pub line: [(f64, f64); 2],
}

impl FitFile {
    pub fn new(fit: &FitResult, observations: &[Observation], generated_at: DateTime<Utc>) -> Self {
        let (d0, d1) = fit.distance_range;
        Self {
            tool: "hubble".to_string(),
            generated_at,
            hubble_constant: fit.line.slope,
            intercept: fit.line.intercept,
            age_years: fit.age_years.as_ref().ok().copied(),
            age_warning: fit.age_years.as_ref().err().map(ToString::to_string),
            quality: fit.quality.clone(),
            points: observations.iter().map(Observation::point).collect(),
            line: [(d0, fit.line.predict(d0)), (d1, fit.line.predict(d1))],
        }
    }

    pub fn line(&self) -> LinearFit {
        LinearFit {
            slope: self.hubble_constant,
            intercept: self.intercept,
        }
    }

    /// Plot series for redrawing a saved fit.
    pub fn plot_series(&self) -> PlotSeries {
        let xs = self.points.iter().map(|p| p.0).chain(self.line.iter().map(|p| p.0));
        let ys = self.points.iter().map(|p| p.1).chain(self.line.iter().map(|p| p.1));
        PlotSeries {
            points: self.points.clone(),
            line: Some(self.line),
            x_bounds: padded_bounds(xs, 0.05),
            y_bounds: padded_bounds(ys, 0.05),
        }
    }
}

/// Write a fit JSON file.
pub fn write_fit_json(path: &Path, fit: &FitResult, observations: &[Observation]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create fit JSON '{}': {e}", path.display())))?;

    let record = FitFile::new(fit, observations, Utc::now());
    serde_json::to_writer_pretty(file, &record)
        .map_err(|e| AppError::new(2, format!("Failed to write fit JSON: {e}")))?;

    Ok(())
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open fit JSON '{}': {e}", path.display())))?;
    let record: FitFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid fit JSON: {e}")))?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FitError;

    fn sample_fit(age_years: Result<f64, FitError>) -> FitResult {
        FitResult {
            line: LinearFit { slope: 72.5, intercept: -15.0 },
            age_years,
            quality: FitQuality { n: 2, sse: 0.0, rmse: 0.0, r_squared: Some(1.0) },
            residuals: vec![0.0, 0.0],
            distance_range: (20.0, 120.0),
        }
    }

    #[test]
    fn json_round_trip() {
        let fit = sample_fit(Ok(1.35e10));
        let generated_at = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let record = FitFile::new(&fit, &[], generated_at);

        let text = serde_json::to_string(&record).unwrap();
        assert!(!text.contains("age_warning"));
        let back: FitFile = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.line(), fit.line);
        assert_eq!(back.line[1], (120.0, 72.5 * 120.0 - 15.0));
    }

    #[test]
    fn degenerate_age_is_stored_as_warning() {
        let fit = sample_fit(Err(FitError::NonPositiveSlope { slope: -3.0 }));
        let record = FitFile::new(&fit, &[], Utc::now());
        assert_eq!(record.age_years, None);
        assert!(record.age_warning.unwrap().contains("non-positive"));
    }

    #[test]
    fn saved_plot_series_includes_line() {
        let record = FitFile::new(&sample_fit(Ok(1.0)), &[], Utc::now());
        let series = record.plot_series();
        assert!(series.points.is_empty());
        assert!(series.x_bounds[0] < 20.0 && series.x_bounds[1] > 120.0);
        assert!(series.line.is_some());
    }
}
