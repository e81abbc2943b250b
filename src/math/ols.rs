//! Least squares solver and the summary statistics around it.
//!
//! Hubble's law is fitted as the two-column problem
//!
//! ```text
//! minimize Σ (v_i - (b0 + b1 d_i))^2
//! ```
//!
//! Implementation choices:
//! - The design matrix is built with an intercept column first, from distances
//!   centred on their mean so the columns stay well conditioned.
//! - We solve with SVD and a tolerance relative to the largest singular value;
//!   a rank-deficient matrix is reported instead of a minimum-norm guess.
//! - The result matches the closed form `b1 = cov(d, v) / var(d)`,
//!   `b0 = mean(v) - b1 mean(d)`, and is exact for two points.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if `x` is rank deficient at `eps * max(rows, cols) * σ_max`
/// or the solution is not finite.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    let sigma_max = svd.singular_values.max();
    let tol = f64::EPSILON * x.nrows().max(x.ncols()) as f64 * sigma_max;
    if !(sigma_max > 0.0) || svd.rank(tol) < x.ncols() {
        return None;
    }

    let beta = svd.solve(y, tol).ok()?;
    beta.iter().all(|v| v.is_finite()).then_some(beta)
}

/// Intercept + slope design matrix for `xs`.
pub fn linear_design(xs: &[f64]) -> DMatrix<f64> {
    DMatrix::from_fn(xs.len(), 2, |r, c| if c == 0 { 1.0 } else { xs[r] })
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sum of squared deviations from the mean.
pub fn sum_squared_deviation(values: &[f64]) -> f64 {
    let Some(mu) = mean(values) else {
        return 0.0;
    };
    values.iter().map(|v| (v - mu) * (v - mu)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = linear_design(&[0.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn rank_deficient_system_is_refused() {
        let x = linear_design(&[3.0, 3.0, 3.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert!(solve_least_squares(&x, &y).is_none());
    }

    #[test]
    fn design_has_intercept_column() {
        let x = linear_design(&[4.0, 7.0]);
        assert_eq!(x.nrows(), 2);
        assert_eq!(x.ncols(), 2);
        assert_eq!(x[(0, 0)], 1.0);
        assert_eq!(x[(1, 0)], 1.0);
        assert_eq!(x[(0, 1)], 4.0);
        assert_eq!(x[(1, 1)], 7.0);
    }

    #[test]
    fn summary_stats() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
        assert!((sum_squared_deviation(&[1.0, 2.0, 3.0]) - 2.0).abs() < 1e-12);
        assert_eq!(sum_squared_deviation(&[5.0, 5.0]), 0.0);
    }
}
