//! Formatted terminal output: submissions, the observation table, fit summaries.
//!
//! We keep formatting code in one place so:
//! - the physics/fitting code stays clean and testable
//! - output changes are localized (golden tests below)

use crate::domain::{FitResult, Observation};
use crate::error::FitError;
use crate::io::ingest::RowError;

/// One-line confirmation for an accepted submission.
pub fn format_submission(obs: &Observation) -> String {
    format!(
        "Submitted: Distance= {:.2} Mpc, Velocity= {:.2} km/s",
        obs.distance, obs.velocity
    )
}

/// The observation table, optionally with a residual column from a fit.
pub fn format_observation_table(observations: &[Observation], residuals: Option<&[f64]>) -> String {
    let mut out = String::new();

    let header = format!(
        "{:>3} {:<16} {:<12} {:>7} {:>9} {:>9} {:>12} {:>12}",
        "#", "galaxy", "object", "m", "dK(Å)", "dH(Å)", "v(km/s)", "d(Mpc)"
    );
    out.push_str(header.trim_end());
    if residuals.is_some() {
        out.push_str(&format!(" {:>12}", "resid(km/s)"));
    }
    out.push('\n');

    let rule = format!(
        "{:-<3} {:-<16} {:-<12} {:-<7} {:-<9} {:-<9} {:-<12} {:-<12}",
        "", "", "", "", "", "", "", ""
    );
    out.push_str(&rule);
    if residuals.is_some() {
        out.push_str(&format!(" {:-<12}", ""));
    }
    out.push('\n');

    for (i, o) in observations.iter().enumerate() {
        let mut row = format!(
            "{:>3} {:<16} {:<12} {:>7.2} {:>9.2} {:>9.2} {:>12.2} {:>12.2}",
            i + 1,
            truncate(&o.galaxy, 16),
            truncate(&o.object, 12),
            o.m,
            o.delta_k,
            o.delta_h,
            o.velocity,
            o.distance,
        );
        if let Some(r) = residuals.and_then(|r| r.get(i)) {
            row.push_str(&format!(" {r:>12.2}"));
        }
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out
}

/// Hubble constant, intercept, age (or the warning withholding it) and quality.
pub fn format_fit_summary(fit: &FitResult) -> String {
    let mut out = String::new();

    out.push_str("=== Hubble's law fit ===\n");
    out.push_str(&format!(
        "Hubble Constant= {:.2} km/s/Mpc (intercept {:.2} km/s)\n",
        fit.line.slope, fit.line.intercept
    ));
    match &fit.age_years {
        Ok(years) => out.push_str(&format!("Age of Universe= {}\n", format_age(*years))),
        Err(err) => out.push_str(&format!("Warning: {err}\n")),
    }

    let r2 = fit
        .quality
        .r_squared
        .map(|v| format!("{v:.4}"))
        .unwrap_or_else(|| "n/a".to_string());
    out.push_str(&format!(
        "n={} | RMSE={:.2} km/s | R²={r2}\n",
        fit.quality.n, fit.quality.rmse
    ));

    out
}

/// User-facing text for a fit that could not be produced.
pub fn format_fit_error(err: &FitError) -> String {
    match err {
        FitError::InsufficientData { .. } => format!("{err} Add more observations and try again."),
        _ => format!("Warning: {err}"),
    }
}

/// `1.3977e10` -> `"13.98 Gyr (13977167000 years)"`.
pub fn format_age(years: f64) -> String {
    format!("{:.2} Gyr ({years:.0} years)", years / 1e9)
}

/// Summary of rows skipped during CSV ingest.
pub fn format_row_errors(errors: &[RowError]) -> String {
    let mut out = String::new();
    if errors.is_empty() {
        return out;
    }
    out.push_str(&format!("Skipped {} row(s):\n", errors.len()));
    for e in errors {
        out.push_str(&format!("  line {}: {}\n", e.line, e.message));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
