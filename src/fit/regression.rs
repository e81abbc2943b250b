//! Hubble's law regression.
//!
//! `velocity = H0 * distance + intercept`, fitted by ordinary least squares
//! over every observation in the session, then turned into an implied age.
//!
//! Guards (each returns a `FitError` instead of a non-finite number):
//! - fewer than two points
//! - distances identical, or closer than `f64` can resolve (slope undefined)
//! - zero or negative slope when asking for an age

use nalgebra::DVector;
use tracing::{debug, warn};

use crate::domain::{FitQuality, FitResult, LinearFit, Observation};
use crate::error::FitError;
use crate::math::{linear_design, mean, solve_least_squares, sum_squared_deviation};
use crate::physics::AGE_CONVERSION;

/// Ordinary least-squares line through `(x, y)` points.
pub fn fit_line(points: &[(f64, f64)]) -> Result<LinearFit, FitError> {
    if points.len() < 2 {
        return Err(FitError::InsufficientData { n: points.len() });
    }

    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(x, _)| (lo.min(x), hi.max(x)));
    if !(hi - lo > RESOLVABLE_ULPS * f64::EPSILON * lo.abs().max(hi.abs())) {
        return Err(FitError::ZeroDistanceVariance);
    }

    // Shift by the first distance before centring: nearby large distances
    // subtract exactly, so their spread survives.
    let origin = points[0].0;
    let shifted: Vec<f64> = points.iter().map(|&(x, _)| x - origin).collect();
    let offset = mean(&shifted).unwrap_or_default();
    let centred: Vec<f64> = shifted.iter().map(|x| x - offset).collect();

    let design = linear_design(&centred);
    let target = DVector::from_iterator(points.len(), points.iter().map(|&(_, y)| y));
    let beta = solve_least_squares(&design, &target).ok_or(FitError::Solver)?;

    let slope = beta[1];
    Ok(LinearFit {
        slope,
        intercept: beta[0] - slope * (origin + offset),
    })
}

/// Distance spreads within this many ulps of the largest distance count as zero.
const RESOLVABLE_ULPS: f64 = 4.0;

/// Hubble time in years for a Hubble constant in km/s/Mpc.
pub fn age_of_universe(slope: f64) -> Result<f64, FitError> {
    if !(slope > 0.0) {
        return Err(FitError::NonPositiveSlope { slope });
    }
    Ok((1.0 / slope) * AGE_CONVERSION)
}

/// Fit Hubble's law over `observations` (store order).
///
/// A line that fits but has a non-positive slope still returns `Ok`; the
/// problem is carried in `age_years` so the line can be displayed with a
/// warning instead of an age.
pub fn fit_hubble(observations: &[Observation]) -> Result<FitResult, FitError> {
    let points: Vec<(f64, f64)> = observations.iter().map(Observation::point).collect();
    let line = fit_line(&points)?;

    let residuals: Vec<f64> = points.iter().map(|&(d, v)| v - line.predict(d)).collect();
    let quality = fit_quality(&points, &residuals);

    let age_years = age_of_universe(line.slope);
    match &age_years {
        Ok(age) => debug!(h0 = line.slope, intercept = line.intercept, age, n = points.len(), "fit computed"),
        Err(err) => warn!(h0 = line.slope, n = points.len(), "{err}"),
    }

    let distance_range = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(d, _)| {
        (lo.min(d), hi.max(d))
    });

    Ok(FitResult {
        line,
        age_years,
        quality,
        residuals,
        distance_range,
    })
}

fn fit_quality(points: &[(f64, f64)], residuals: &[f64]) -> FitQuality {
    let n = points.len();
    let sse: f64 = residuals.iter().map(|r| r * r).sum();
    let rmse = (sse / n as f64).sqrt();

    let ys: Vec<f64> = points.iter().map(|&(_, y)| y).collect();
    let sst = sum_squared_deviation(&ys);
    let r_squared = if sst > 0.0 { Some(1.0 - sse / sst) } else { None };

    FitQuality { n, sse, rmse, r_squared }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObservationInput;
    use crate::physics::{apparent_magnitude_for, line_wavelengths_for, observe};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    fn synthetic(distance: f64, velocity: f64) -> Observation {
        let (k, h) = line_wavelengths_for(velocity);
        observe(&ObservationInput {
            galaxy: format!("G{distance}"),
            object: "x".to_string(),
            m: apparent_magnitude_for(distance),
            k_measured: k,
            h_measured: h,
        })
    }

    #[test]
    fn two_points_give_exact_line() {
        let (d1, v1, d2, v2) = (10.0, 900.0, 40.0, 2700.0);
        let line = fit_line(&[(d1, v1), (d2, v2)]).unwrap();
        assert!(close(line.slope, (v2 - v1) / (d2 - d1)));
        assert!(close(line.intercept, v1 - line.slope * d1));
    }

    #[test]
    fn matches_closed_form_on_noisy_points() {
        let pts = [(10.0, 740.0), (20.0, 1350.0), (35.0, 2480.0), (50.0, 3600.0), (80.0, 5520.0)];
        let line = fit_line(&pts).unwrap();

        let n = pts.len() as f64;
        let mx = pts.iter().map(|p| p.0).sum::<f64>() / n;
        let my = pts.iter().map(|p| p.1).sum::<f64>() / n;
        let cov: f64 = pts.iter().map(|p| (p.0 - mx) * (p.1 - my)).sum();
        let var: f64 = pts.iter().map(|p| (p.0 - mx) * (p.0 - mx)).sum();
        let slope = cov / var;
        let intercept = my - slope * mx;

        assert!(close(line.slope, slope));
        assert!(close(line.intercept, intercept));
    }

    #[test]
    fn fewer_than_two_points_is_an_error() {
        assert_eq!(fit_line(&[]), Err(FitError::InsufficientData { n: 0 }));
        assert_eq!(fit_line(&[(10.0, 700.0)]), Err(FitError::InsufficientData { n: 1 }));
    }

    #[test]
    fn identical_distances_are_degenerate() {
        let err = fit_line(&[(25.0, 1000.0), (25.0, 2000.0), (25.0, 1500.0)]).unwrap_err();
        assert_eq!(err, FitError::ZeroDistanceVariance);
    }

    #[test]
    fn distances_below_float_resolution_are_degenerate() {
        let d: f64 = 1.0e9;
        let next = f64::from_bits(d.to_bits() + 1);
        let err = fit_line(&[(d, 1000.0), (next, 2000.0)]).unwrap_err();
        assert_eq!(err, FitError::ZeroDistanceVariance);
    }

    #[test]
    fn nearby_far_distances_give_exact_two_point_line() {
        use crate::physics::distance_mpc;

        let (d1, d2) = (distance_mpc(50.0), distance_mpc(50.0 - 1e-12));
        assert!(d1 != d2);

        let line = fit_line(&[(d1, 1000.0), (d2, 2000.0)]).unwrap();
        let exact = (2000.0 - 1000.0) / (d2 - d1);
        assert!(line.slope < 0.0);
        assert!((line.slope - exact).abs() <= 1e-6 * exact.abs());
        assert!(age_of_universe(line.slope).is_err());
    }

    #[test]
    fn offset_distances_match_unshifted_fit() {
        let base = [(10.0, 700.0), (20.0, 1450.0), (30.0, 2080.0)];
        let shifted: Vec<(f64, f64)> = base.iter().map(|&(x, y)| (x + 1.0e6, y)).collect();

        let a = fit_line(&base).unwrap();
        let b = fit_line(&shifted).unwrap();
        assert!((a.slope - b.slope).abs() < 1e-6);
        assert!((b.predict(1.0e6 + 20.0) - a.predict(20.0)).abs() < 1e-3);
    }

    #[test]
    fn age_requires_positive_slope() {
        assert!(matches!(age_of_universe(0.0), Err(FitError::NonPositiveSlope { .. })));
        assert!(matches!(age_of_universe(-70.0), Err(FitError::NonPositiveSlope { .. })));
        assert!(matches!(age_of_universe(f64::NAN), Err(FitError::NonPositiveSlope { .. })));

        let age = age_of_universe(70.0).unwrap();
        assert!(close(age, AGE_CONVERSION / 70.0));
    }

    #[test]
    fn recovers_h0_from_synthetic_observations() {
        let obs: Vec<Observation> = [20.0, 45.0, 80.0, 150.0, 300.0]
            .iter()
            .map(|&d| synthetic(d, 70.0 * d))
            .collect();

        let fit = fit_hubble(&obs).unwrap();
        assert!((fit.hubble_constant() - 70.0).abs() < 1e-6);
        assert!(fit.line.intercept.abs() < 1e-4);
        assert!(fit.age_years.is_ok());
        assert_eq!(fit.quality.n, 5);
        assert!(fit.quality.rmse < 1e-4);
        assert!(fit.quality.r_squared.unwrap() > 0.999_999);
        assert_eq!(fit.residuals.len(), 5);
        assert!((fit.distance_range.0 - 20.0).abs() < 1e-9);
        assert!((fit.distance_range.1 - 300.0).abs() < 1e-9);
    }

    #[test]
    fn negative_slope_fits_but_withholds_age() {
        let obs = vec![synthetic(50.0, 5000.0), synthetic(100.0, 2000.0)];
        let fit = fit_hubble(&obs).unwrap();
        assert!(fit.hubble_constant() < 0.0);
        let err = fit.age_years.unwrap_err();
        assert!(err.is_degenerate());
    }

    #[test]
    fn constant_velocity_has_no_r_squared() {
        let obs = vec![synthetic(50.0, 3000.0), synthetic(100.0, 3000.0)];
        let fit = fit_hubble(&obs).unwrap();
        assert!(fit.hubble_constant().abs() < 1e-6);
        assert_eq!(fit.quality.r_squared, None);
    }

    #[test]
    fn refit_reflects_new_data() {
        let mut obs = vec![synthetic(10.0, 700.0), synthetic(20.0, 1400.0)];
        let first = fit_hubble(&obs).unwrap();

        obs.push(synthetic(30.0, 3000.0));
        let second = fit_hubble(&obs).unwrap();

        assert_eq!(second.quality.n, 3);
        assert!(second.hubble_constant() > first.hubble_constant());
    }
}
