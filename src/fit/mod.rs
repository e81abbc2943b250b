//! Regression over the session's observations.
//!
//! Responsibilities:
//!
//! - least-squares line through `(distance, velocity)`
//! - Hubble constant and implied age, with explicit degenerate cases

pub mod regression;

pub use regression::*;
