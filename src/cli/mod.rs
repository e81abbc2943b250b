//! Command-line parsing for the Hubble constant calculator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the physics/fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "hubble", version, about = "Hubble Constant Calculator")]
pub struct Cli {
    /// Log debug events to stderr (overridden by HUBBLE_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors (overridden by HUBBLE_LOG).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Derive distance and velocity for a single observation.
    Derive(DeriveArgs),
    /// Load observations from CSV, fit Hubble's law, print and optionally export.
    Fit(FitArgs),
    /// Redraw a previously exported fit JSON.
    Plot(PlotArgs),
    /// Write a synthetic observation CSV generated from a chosen H0.
    Sample(SampleArgs),
    /// Launch the interactive session (form, table, fit, chart).
    Tui(TuiArgs),
}

/// One observation, as entered on the form.
#[derive(Debug, Args, Clone)]
pub struct DeriveArgs {
    /// Galaxy name.
    #[arg(long, default_value = "")]
    pub galaxy: String,

    /// Object name.
    #[arg(long, default_value = "")]
    pub object: String,

    /// Apparent magnitude.
    #[arg(short, long, default_value_t = 15.0, allow_negative_numbers = true)]
    pub m: f64,

    /// Measured K-line wavelength (Å).
    #[arg(short, long = "k-line", default_value_t = 3950.0)]
    pub k: f64,

    /// Measured H-line wavelength (Å).
    #[arg(long = "h-line", default_value_t = 3985.0)]
    pub h: f64,
}

/// Options for a batch fit.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Observation CSV (raw `galaxy,object,m,k_measured,h_measured` or an exported results table).
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: PathBuf,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the observation table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the Hubble diagram to PNG.
    #[arg(long = "export-plot", value_name = "PNG")]
    pub export_plot: Option<PathBuf>,

    /// Export the fit (H0, age, quality, line) to JSON.
    #[arg(long = "export-fit", value_name = "JSON")]
    pub export_fit: Option<PathBuf>,

    /// PNG width (pixels).
    #[arg(long, default_value_t = 1200)]
    pub image_width: u32,

    /// PNG height (pixels).
    #[arg(long, default_value_t = 900)]
    pub image_height: u32,
}

/// Options for plotting a saved fit.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Fit JSON file produced by `hubble fit --export-fit`.
    #[arg(long, value_name = "JSON")]
    pub fit: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for synthetic sample generation.
#[derive(Debug, Args)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short, long, value_name = "CSV")]
    pub output: PathBuf,

    /// Number of galaxies.
    #[arg(short = 'n', long, default_value_t = 12)]
    pub count: usize,

    /// Hubble constant used to generate velocities (km/s/Mpc).
    #[arg(long, default_value_t = 70.0)]
    pub h0: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Minimum distance (Mpc).
    #[arg(long, default_value_t = 10.0)]
    pub distance_min: f64,

    /// Maximum distance (Mpc).
    #[arg(long, default_value_t = 400.0)]
    pub distance_max: f64,

    /// Peculiar velocity scatter (km/s, one sigma).
    #[arg(long, default_value_t = 300.0)]
    pub velocity_noise: f64,

    /// Apparent magnitude scatter (one sigma).
    #[arg(long, default_value_t = 0.05)]
    pub magnitude_noise: f64,
}

/// Options for the interactive session.
#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Preload observations from CSV before the session starts.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Directory for CSV/PNG exports.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub export_dir: PathBuf,
}
