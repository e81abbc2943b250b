//! Shared session logic used by both the batch CLI and the TUI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate -> derive -> append, and (on request) fit over the whole table.
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::debug;

use crate::domain::{FitResult, Observation, ObservationInput};
use crate::error::{FitError, InputError};
use crate::store::ObservationStore;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    HasData,
    /// A fit succeeded since the last submission.
    FitComputed,
}

/// One user's working set of observations.
///
/// Owns its store outright; separate sessions never share data.
#[derive(Debug, Default)]
pub struct Session {
    store: ObservationStore,
    fit_current: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, derive and append one submission.
    ///
    /// A rejected submission leaves the table untouched.
    pub fn submit(&mut self, input: &ObservationInput) -> Result<&Observation, InputError> {
        input.validate()?;
        let record = crate::physics::observe(input);
        debug!(
            galaxy = %record.galaxy,
            object = %record.object,
            distance = record.distance,
            velocity = record.velocity,
            "observation submitted"
        );
        self.fit_current = false;
        Ok(self.store.append(record))
    }

    /// Fit Hubble's law over every observation currently in the table.
    ///
    /// Recomputed from scratch on every call.
    pub fn compute_fit(&mut self) -> Result<FitResult, FitError> {
        let fit = crate::fit::fit_hubble(self.store.all());
        self.fit_current = fit.is_ok();
        fit
    }

    pub fn observations(&self) -> &[Observation] {
        self.store.all()
    }

    pub fn store(&self) -> &ObservationStore {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        if self.store.is_empty() {
            SessionState::Empty
        } else if self.fit_current {
            SessionState::FitComputed
        } else {
            SessionState::HasData
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(galaxy: &str, m: f64, k: f64, h: f64) -> ObservationInput {
        ObservationInput {
            galaxy: galaxy.to_string(),
            object: "nucleus".to_string(),
            m,
            k_measured: k,
            h_measured: h,
        }
    }

    #[test]
    fn lifecycle_moves_through_states() {
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::Empty);

        session.submit(&input("NGC 1", 12.0, 3940.0, 3975.0)).unwrap();
        assert_eq!(session.state(), SessionState::HasData);

        // One point is not enough; no fit, so the state stays put.
        assert_eq!(session.compute_fit(), Err(FitError::InsufficientData { n: 1 }));
        assert_eq!(session.state(), SessionState::HasData);

        session.submit(&input("NGC 2", 14.0, 3960.0, 3995.0)).unwrap();
        assert_eq!(session.state(), SessionState::HasData);

        let fit = session.compute_fit().unwrap();
        assert_eq!(fit.quality.n, 2);
        assert_eq!(session.state(), SessionState::FitComputed);
    }

    #[test]
    fn degenerate_fit_does_not_count_as_computed() {
        // Same magnitude, same distance.
        let mut flat = Session::new();
        flat.submit(&input("A", 13.0, 3940.0, 3975.0)).unwrap();
        flat.submit(&input("B", 13.0, 3960.0, 3995.0)).unwrap();
        assert_eq!(flat.compute_fit(), Err(FitError::ZeroDistanceVariance));
        assert_eq!(flat.state(), SessionState::HasData);
    }

    #[test]
    fn rejected_submission_leaves_table_unchanged() {
        let mut session = Session::new();
        session.submit(&input("NGC 1", 12.0, 3940.0, 3975.0)).unwrap();

        let err = session.submit(&input("bad", 99.0, 3940.0, 3975.0)).unwrap_err();
        assert!(matches!(err, InputError::MagnitudeOutOfRange { .. }));
        assert_eq!(session.observations().len(), 1);

        // Still usable afterwards.
        session.submit(&input("NGC 2", 13.0, 3950.0, 3985.0)).unwrap();
        assert_eq!(session.observations().len(), 2);
    }

    #[test]
    fn submit_returns_derived_record() {
        let mut session = Session::new();
        let obs = session.submit(&input("M87", 15.0, 3950.0, 3985.0)).unwrap();
        assert!((obs.distance - 251.19).abs() < 0.01);
        assert!((obs.delta_k - 16.3).abs() < 1e-9);
    }

    #[test]
    fn sessions_are_independent() {
        let mut a = Session::new();
        let b = Session::new();
        a.submit(&input("NGC 1", 12.0, 3940.0, 3975.0)).unwrap();
        assert_eq!(a.observations().len(), 1);
        assert!(b.store().is_empty());
    }
}
