//! Plot data shared by the ASCII renderer, the PNG export and the TUI chart.
//!
//! Series and bounds are computed here once so every renderer shows the same
//! picture: observed `(distance, velocity)` points plus the fitted line across
//! the observed distance range.

pub mod ascii;

pub use ascii::*;

use crate::domain::{FitResult, Observation};

/// Render-ready series and axis bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub points: Vec<(f64, f64)>,
    /// Endpoints of the fitted line, when a fit is available.
    pub line: Option<[(f64, f64); 2]>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// Build the plot series for the current table and (optional) fit.
pub fn plot_series(observations: &[Observation], fit: Option<&FitResult>) -> PlotSeries {
    let points: Vec<(f64, f64)> = observations.iter().map(Observation::point).collect();

    let line = fit.map(|f| {
        let (d0, d1) = f.distance_range;
        [(d0, f.line.predict(d0)), (d1, f.line.predict(d1))]
    });

    let xs = points.iter().map(|p| p.0);
    let mut ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    if let Some(l) = &line {
        ys.extend(l.iter().map(|p| p.1));
    }

    let x_bounds = padded_bounds(xs, 0.05);
    let y_bounds = padded_bounds(ys.into_iter(), 0.05);

    PlotSeries {
        points,
        line,
        x_bounds,
        y_bounds,
    }
}

/// Min/max of `values` padded by `frac` of the span.
///
/// Empty or non-finite input falls back to `[0, 1]`; a zero span is widened
/// around the single value so the axis is never empty.
pub fn padded_bounds(values: impl Iterator<Item = f64>, frac: f64) -> [f64; 2] {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values.filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }

    if !(lo.is_finite() && hi.is_finite()) {
        return [0.0, 1.0];
    }
    if hi <= lo {
        let pad = (lo.abs() * 0.1).max(1.0);
        return [lo - pad, hi + pad];
    }

    let pad = ((hi - lo) * frac).max(1e-12);
    [lo - pad, hi + pad]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, LinearFit};

    fn obs(distance: f64, velocity: f64) -> Observation {
        Observation {
            galaxy: String::new(),
            object: String::new(),
            m: 0.0,
            k_measured: 0.0,
            h_measured: 0.0,
            delta_k: 0.0,
            delta_h: 0.0,
            velocity,
            distance,
        }
    }

    #[test]
    fn bounds_cover_points_and_line() {
        let table = vec![obs(10.0, 700.0), obs(110.0, 7700.0)];
        let fit = FitResult {
            line: LinearFit { slope: 80.0, intercept: 0.0 },
            age_years: Ok(1.2e10),
            quality: FitQuality { n: 2, sse: 0.0, rmse: 0.0, r_squared: Some(1.0) },
            residuals: vec![0.0, 0.0],
            distance_range: (10.0, 110.0),
        };

        let series = plot_series(&table, Some(&fit));
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.line, Some([(10.0, 800.0), (110.0, 8800.0)]));
        assert!((series.x_bounds[0] - 5.0).abs() < 1e-9);
        assert!((series.x_bounds[1] - 115.0).abs() < 1e-9);
        assert!(series.y_bounds[0] < 700.0);
        assert!(series.y_bounds[1] > 8800.0);
    }

    #[test]
    fn degenerate_bounds_are_widened() {
        assert_eq!(padded_bounds(std::iter::empty(), 0.05), [0.0, 1.0]);
        assert_eq!(padded_bounds([5.0].into_iter(), 0.05), [4.0, 6.0]);
        assert_eq!(padded_bounds([100.0, 100.0].into_iter(), 0.05), [90.0, 110.0]);
    }
}
