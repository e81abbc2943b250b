//! `hubble-fit` library crate.
//!
//! The binary (`hubble`) is a thin wrapper around this library so that:
//!
//! - the physics and the fit are testable without spawning processes
//! - the batch CLI and the TUI share one session workflow
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod physics;
pub mod plot;
pub mod report;
pub mod store;
pub mod tui;
