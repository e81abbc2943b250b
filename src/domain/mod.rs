//! Domain types used throughout the session.
//!
//! This module defines:
//!
//! - raw form submissions (`ObservationInput`) and their boundary checks
//! - accepted, fully derived records (`Observation`)
//! - fit outputs (`FitResult`, `LinearFit`, `FitQuality`)
//! - run configuration (`SessionConfig`)

pub mod types;

pub use types::*;
