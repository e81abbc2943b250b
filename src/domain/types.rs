//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - accumulated in-memory during a session
//! - exported to CSV/JSON
//! - re-imported later for another fit

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FitError, InputError};

/// Lowest apparent magnitude the form accepts.
pub const MAGNITUDE_MIN: f64 = -30.0;
/// Highest apparent magnitude the form accepts.
pub const MAGNITUDE_MAX: f64 = 50.0;
/// Lowest measured wavelength (Å) the form accepts.
pub const WAVELENGTH_MIN: f64 = 0.0;
/// Highest measured wavelength (Å) the form accepts.
pub const WAVELENGTH_MAX: f64 = 6000.0;

/// One form submission, before anything is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationInput {
    pub galaxy: String,
    pub object: String,
    /// Apparent magnitude.
    pub m: f64,
    /// Measured Ca II K-line wavelength (Å).
    pub k_measured: f64,
    /// Measured Ca II H-line wavelength (Å).
    pub h_measured: f64,
}

impl ObservationInput {
    /// Range checks applied at the boundary.
    ///
    /// The physics formulas accept anything numeric; this is the only place a
    /// submission can be rejected.
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.m.is_finite() {
            return Err(InputError::NonFinite { field: "Apparent magnitude" });
        }
        if !(MAGNITUDE_MIN..=MAGNITUDE_MAX).contains(&self.m) {
            return Err(InputError::MagnitudeOutOfRange {
                value: self.m,
                min: MAGNITUDE_MIN,
                max: MAGNITUDE_MAX,
            });
        }
        check_wavelength("K-line", self.k_measured)?;
        check_wavelength("H-line", self.h_measured)?;
        Ok(())
    }
}

fn check_wavelength(field: &'static str, value: f64) -> Result<(), InputError> {
    if !value.is_finite() {
        return Err(InputError::NonFinite { field });
    }
    if !(WAVELENGTH_MIN..=WAVELENGTH_MAX).contains(&value) {
        return Err(InputError::WavelengthOutOfRange {
            field,
            value,
            min: WAVELENGTH_MIN,
            max: WAVELENGTH_MAX,
        });
    }
    Ok(())
}

/// An accepted observation: raw inputs plus everything derived from them.
///
/// Built once by `physics::observe` and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub galaxy: String,
    pub object: String,
    pub m: f64,
    pub k_measured: f64,
    pub h_measured: f64,
    /// K-line shift from rest (Å).
    pub delta_k: f64,
    /// H-line shift from rest (Å).
    pub delta_h: f64,
    /// Recession velocity (km/s).
    pub velocity: f64,
    /// Distance (Mpc).
    pub distance: f64,
}

impl Observation {
    /// `(distance, velocity)` as used by the regression and the plots.
    pub fn point(&self) -> (f64, f64) {
        (self.distance, self.velocity)
    }
}

/// A straight line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Goodness-of-fit summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub n: usize,
    pub sse: f64,
    pub rmse: f64,
    /// Coefficient of determination. `None` when every velocity is identical.
    pub r_squared: Option<f64>,
}

/// Result of one "compute fit" request.
///
/// Never stored: it is rebuilt from the whole session every time.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    /// Hubble's law line; the slope is H0 in km/s/Mpc.
    pub line: LinearFit,
    /// Implied age in years, or why it is withheld.
    pub age_years: Result<f64, FitError>,
    pub quality: FitQuality,
    /// `velocity - fitted velocity`, in store order.
    pub residuals: Vec<f64>,
    /// Observed distance range, for drawing the fitted line.
    pub distance_range: (f64, f64),
}

impl FitResult {
    pub fn hubble_constant(&self) -> f64 {
        self.line.slope
    }
}

/// Run configuration derived from CLI flags.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub image_width: u32,
    pub image_height: u32,
    pub export_results: Option<PathBuf>,
    pub export_plot: Option<PathBuf>,
    pub export_fit: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            plot: true,
            plot_width: 80,
            plot_height: 20,
            image_width: 1200,
            image_height: 900,
            export_results: None,
            export_plot: None,
            export_fit: None,
        }
    }
}
