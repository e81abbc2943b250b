//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - runs a batch session (CSV in, table + fit + plot out)
//! - derives single observations
//! - writes synthetic samples
//! - launches the interactive session

use std::path::Path;

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command, DeriveArgs, FitArgs, PlotArgs, SampleArgs};
use crate::data::SampleConfig;
use crate::domain::{ObservationInput, SessionConfig};
use crate::error::AppError;

pub mod session;

pub use session::{Session, SessionState};

/// Entry point for the `hubble` binary.
pub fn run() -> Result<(), AppError> {
    // An absent .env is the normal case.
    let _ = dotenvy::dotenv();

    // We want `hubble` and `hubble -f obs.csv` to behave like `hubble tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    let interactive = matches!(cli.command, Command::Tui(_));
    init_tracing(cli.quiet, cli.verbose, interactive)?;

    match cli.command {
        Command::Derive(args) => handle_derive(&args),
        Command::Fit(args) => handle_fit(&args),
        Command::Plot(args) => handle_plot(&args),
        Command::Sample(args) => handle_sample(&args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

/// Install the stderr subscriber.
///
/// `HUBBLE_LOG` takes precedence over the flags. The TUI owns the terminal, so
/// logging is off there unless `HUBBLE_LOG` asks for it.
fn init_tracing(quiet: bool, verbose: bool, interactive: bool) -> Result<(), AppError> {
    let level = if interactive {
        "off"
    } else if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("HUBBLE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))
}

fn handle_derive(args: &DeriveArgs) -> Result<(), AppError> {
    let input = ObservationInput {
        galaxy: args.galaxy.clone(),
        object: args.object.clone(),
        m: args.m,
        k_measured: args.k,
        h_measured: args.h,
    };

    let mut session = Session::new();
    let obs = session.submit(&input)?;

    println!("{}", crate::report::format_observation_table(std::slice::from_ref(obs), None));
    println!("{}", crate::report::format_submission(obs));
    Ok(())
}

fn handle_fit(args: &FitArgs) -> Result<(), AppError> {
    let config = session_config_from_args(args);
    let mut session = load_session(&args.file)?;

    if session.store().is_empty() {
        return Err(AppError::new(3, "No valid observations in the input file."));
    }

    let fit = session.compute_fit();
    let residuals = fit.as_ref().ok().map(|f| f.residuals.as_slice());

    println!(
        "{}",
        crate::report::format_observation_table(session.observations(), residuals)
    );

    match &fit {
        Ok(f) => println!("{}", crate::report::format_fit_summary(f)),
        Err(e) => println!("{}\n", crate::report::format_fit_error(e)),
    }

    let series = crate::plot::plot_series(session.observations(), fit.as_ref().ok());
    if config.plot {
        println!(
            "{}",
            crate::plot::render_ascii_plot(&series, config.plot_width, config.plot_height)
        );
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::write_results_csv(path, session.observations())?;
        info!(path = %path.display(), "wrote results CSV");
        println!("Wrote results CSV to {}", path.display());
    }
    if let Some(path) = &config.export_plot {
        crate::io::write_plot_png(path, &series, config.image_width, config.image_height)?;
        info!(path = %path.display(), "wrote plot PNG");
        println!("Wrote plot PNG to {}", path.display());
    }
    if let Some(path) = &config.export_fit {
        // A fit file without a fit is meaningless; surface the reason instead.
        let fit = fit.as_ref().map_err(|e| AppError::from(e.clone()))?;
        crate::io::write_fit_json(path, fit, session.observations())?;
        info!(path = %path.display(), "wrote fit JSON");
        println!("Wrote fit JSON to {}", path.display());
    }

    Ok(())
}

fn handle_plot(args: &PlotArgs) -> Result<(), AppError> {
    let record = crate::io::read_fit_json(&args.fit)?;

    let line = record.line();
    println!(
        "H0 = {:.2} km/s/Mpc, intercept = {:.2} km/s (n={})",
        line.slope, line.intercept, record.quality.n
    );
    let plot = crate::plot::render_ascii_plot(&record.plot_series(), args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_sample(args: &SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        count: args.count,
        seed: args.seed,
        h0: args.h0,
        distance_min: args.distance_min,
        distance_max: args.distance_max,
        velocity_noise: args.velocity_noise,
        magnitude_noise: args.magnitude_noise,
    };
    let inputs = crate::data::generate_sample(&config)?;
    crate::io::write_raw_csv(&args.output, &inputs)?;
    println!("Wrote {} synthetic observations to {}", inputs.len(), args.output.display());
    Ok(())
}

/// Build a session from a CSV file, submitting rows in file order.
///
/// Rows that fail parsing or range checks are reported on stderr and skipped.
pub fn load_session(path: &Path) -> Result<Session, AppError> {
    let data = crate::io::load_observations(path)?;

    let skipped = crate::report::format_row_errors(&data.row_errors);
    if !skipped.is_empty() {
        eprint!("{skipped}");
    }

    let mut session = Session::new();
    for input in &data.inputs {
        session.submit(input)?;
    }
    info!(
        rows_read = data.rows_read,
        accepted = session.store().len(),
        layout = ?data.layout,
        "loaded observations"
    );
    Ok(session)
}

pub fn session_config_from_args(args: &FitArgs) -> SessionConfig {
    SessionConfig {
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        image_width: args.image_width,
        image_height: args.image_height,
        export_results: args.export.clone(),
        export_plot: args.export_plot.clone(),
        export_fit: args.export_fit.clone(),
    }
}

/// Rewrite argv so `hubble` defaults to `hubble tui`.
///
/// Rules:
/// - `hubble`                     -> `hubble tui`
/// - `hubble -f obs.csv ...`      -> `hubble tui -f obs.csv ...`
/// - `hubble --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "derive" | "fit" | "plot" | "sample" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(args(&["hubble"])), args(&["hubble", "tui"]));
    }

    #[test]
    fn leading_flag_goes_to_tui() {
        assert_eq!(
            rewrite_args(args(&["hubble", "-f", "obs.csv"])),
            args(&["hubble", "tui", "-f", "obs.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_untouched() {
        for v in [&["hubble", "fit", "-f", "x.csv"][..], &["hubble", "--help"], &["hubble", "-V"]] {
            assert_eq!(rewrite_args(args(v)), args(v));
        }
    }

    #[test]
    fn rewritten_args_parse() {
        let cli = Cli::parse_from(rewrite_args(args(&["hubble", "-f", "obs.csv"])));
        match cli.command {
            Command::Tui(t) => assert_eq!(t.file.as_deref(), Some(Path::new("obs.csv"))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn derive_accepts_negative_magnitude() {
        let cli = Cli::parse_from(args(&["hubble", "derive", "-m", "-3.5", "--k-line", "3940"]));
        match cli.command {
            Command::Derive(d) => {
                assert_eq!(d.m, -3.5);
                assert_eq!(d.k, 3940.0);
                assert_eq!(d.h, 3985.0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_plot_wins() {
        let cli = Cli::parse_from(args(&["hubble", "fit", "-f", "x.csv", "--no-plot", "--export", "out.csv"]));
        let Command::Fit(fit) = cli.command else {
            panic!("expected fit");
        };
        let config = session_config_from_args(&fit);
        assert!(!config.plot);
        assert_eq!(config.export_results.as_deref(), Some(Path::new("out.csv")));
        assert!(config.export_plot.is_none());
    }

    #[test]
    fn fit_command_writes_png_and_fit_json() {
        let dir = std::env::temp_dir();
        let id = std::process::id();
        let raw = dir.join(format!("hubble_app_fit_{id}.csv"));
        let png = dir.join(format!("hubble_app_fit_{id}.png"));
        let json = dir.join(format!("hubble_app_fit_{id}.json"));

        let inputs = crate::data::generate_sample(&SampleConfig::default()).unwrap();
        crate::io::write_raw_csv(&raw, &inputs).unwrap();

        let argv: Vec<std::ffi::OsString> = vec![
            "hubble".into(),
            "fit".into(),
            "--no-plot".into(),
            "-f".into(),
            raw.clone().into(),
            "--export-plot".into(),
            png.clone().into(),
            "--export-fit".into(),
            json.clone().into(),
            "--image-width".into(),
            "400".into(),
            "--image-height".into(),
            "300".into(),
        ];
        let cli = Cli::parse_from(argv);
        let Command::Fit(fit) = cli.command else {
            panic!("expected fit");
        };
        let result = handle_fit(&fit);

        let bytes = std::fs::read(&png);
        let record = crate::io::read_fit_json(&json);
        for path in [&raw, &png, &json] {
            let _ = std::fs::remove_file(path);
        }

        result.unwrap();
        assert_eq!(&bytes.unwrap()[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(record.unwrap().quality.n, inputs.len());
    }

    #[test]
    fn batch_session_round_trips_through_export() {
        let dir = std::env::temp_dir();
        let raw = dir.join(format!("hubble_app_raw_{}.csv", std::process::id()));
        let exported = dir.join(format!("hubble_app_results_{}.csv", std::process::id()));

        let inputs = crate::data::generate_sample(&SampleConfig::default()).unwrap();
        crate::io::write_raw_csv(&raw, &inputs).unwrap();

        let mut first = load_session(&raw).unwrap();
        crate::io::write_results_csv(&exported, first.observations()).unwrap();
        let mut second = load_session(&exported).unwrap();

        let _ = std::fs::remove_file(&raw);
        let _ = std::fs::remove_file(&exported);

        assert_eq!(first.observations().len(), inputs.len());
        assert_eq!(second.observations().len(), inputs.len());
        let a = first.compute_fit().unwrap();
        let b = second.compute_fit().unwrap();
        assert!((a.hubble_constant() - b.hubble_constant()).abs() < 1e-6);
    }
}
