//! Error types.
//!
//! `AppError` is what the binary reports: a message plus a process exit code.
//! The numeric core uses typed errors (`FitError`, `InputError`) so callers can
//! tell an "add more data" situation apart from a bad submission.

use thiserror::Error;

/// Why a regression (or the age derived from it) could not be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// Fewer than two observations in the session.
    #[error("Insufficient data: need at least 2 observations to fit, have {n}.")]
    InsufficientData { n: usize },

    /// Every observation sits at the same distance, so the slope is undefined.
    #[error("Degenerate fit: all observations have the same distance.")]
    ZeroDistanceVariance,

    /// The fitted Hubble constant is zero or negative; no age can be implied.
    #[error("Degenerate fit: non-positive Hubble constant ({slope:.4} km/s/Mpc), age of universe unavailable.")]
    NonPositiveSlope { slope: f64 },

    /// The least-squares solve failed to produce finite coefficients.
    #[error("Degenerate fit: least-squares solve did not converge.")]
    Solver,
}

impl FitError {
    /// True for every variant other than "not enough data".
    pub fn is_degenerate(&self) -> bool {
        !matches!(self, FitError::InsufficientData { .. })
    }
}

/// A submission rejected before reaching the physics formulas.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be a finite number.")]
    NonFinite { field: &'static str },

    #[error("Apparent magnitude {value} is outside [{min}, {max}].")]
    MagnitudeOutOfRange { value: f64, min: f64, max: f64 },

    #[error("{field} {value} Å is outside [{min}, {max}] Å.")]
    WavelengthOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        AppError::new(2, err.to_string())
    }
}
