//! Observation physics: line shifts, recession velocity and distance.
//!
//! Everything here is a pure function of its arguments and the constants in
//! [`constants`]. No validation happens here; callers check ranges first
//! (see `ObservationInput::validate`).
//!
//! - `velocity = c * (ΔK/K_rest + ΔH/H_rest) / 2`: the two fractional Doppler
//!   shifts are averaged with equal weight.
//! - `distance = 10^((m - M + 5) / 5) / 1e6`: the distance modulus, in Mpc.

pub mod constants;

pub use constants::*;

use crate::domain::{Observation, ObservationInput};

/// Quantities derived from one set of raw measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    pub delta_k: f64,
    pub delta_h: f64,
    pub velocity: f64,
    pub distance: f64,
}

/// Derive line shifts, velocity (km/s) and distance (Mpc).
pub fn derive(m: f64, k_measured: f64, h_measured: f64) -> Derived {
    let delta_k = k_measured - K_REST;
    let delta_h = h_measured - H_REST;
    Derived {
        delta_k,
        delta_h,
        velocity: recession_velocity(delta_k, delta_h),
        distance: distance_mpc(m),
    }
}

/// Mean fractional shift of both lines, scaled to km/s.
pub fn recession_velocity(delta_k: f64, delta_h: f64) -> f64 {
    C_KMS * (delta_k / K_REST + delta_h / H_REST) / 2.0
}

/// Distance modulus solved for distance, converted from pc to Mpc.
pub fn distance_mpc(m: f64) -> f64 {
    10f64.powf((m - ABSOLUTE_MAGNITUDE + 5.0) / 5.0) / PC_PER_MPC
}

/// Build the immutable record for a submission.
pub fn observe(input: &ObservationInput) -> Observation {
    let d = derive(input.m, input.k_measured, input.h_measured);
    Observation {
        galaxy: input.galaxy.clone(),
        object: input.object.clone(),
        m: input.m,
        k_measured: input.k_measured,
        h_measured: input.h_measured,
        delta_k: d.delta_k,
        delta_h: d.delta_h,
        velocity: d.velocity,
        distance: d.distance,
    }
}

/// Apparent magnitude an object at `distance` (Mpc) would show.
///
/// Inverse of [`distance_mpc`]; only defined for positive distances.
pub fn apparent_magnitude_for(distance: f64) -> f64 {
    5.0 * (distance * PC_PER_MPC).log10() - 5.0 + ABSOLUTE_MAGNITUDE
}

/// Measured `(K, H)` wavelengths for a source receding at `velocity` (km/s),
/// assuming both lines share the same fractional shift.
pub fn line_wavelengths_for(velocity: f64) -> (f64, f64) {
    let z = velocity / C_KMS;
    (K_REST * (1.0 + z), H_REST * (1.0 + z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_reference_observation() {
        let d = derive(15.0, 3950.0, 3985.0);
        assert!((d.delta_k - 16.3).abs() < 1e-9);
        assert!((d.delta_h - 16.53).abs() < 1e-9);

        let expected_v = 300_000.0 * (16.3 / 3933.7 + 16.53 / 3968.47) / 2.0;
        assert!((d.velocity - expected_v).abs() < 1e-9);
        assert!((d.velocity - 1246.35).abs() < 0.01);

        assert!((d.distance - 251.188_643).abs() < 1e-4);
    }

    #[test]
    fn derive_is_deterministic() {
        let a = derive(12.3, 4012.5, 4047.9);
        let b = derive(12.3, 4012.5, 4047.9);
        assert_eq!(a, b);
    }

    #[test]
    fn rest_wavelengths_mean_no_recession() {
        let d = derive(10.0, K_REST, H_REST);
        assert_eq!(d.velocity, 0.0);
    }

    #[test]
    fn blueshift_gives_negative_velocity() {
        let d = derive(10.0, K_REST - 5.0, H_REST - 5.0);
        assert!(d.velocity < 0.0);
    }

    #[test]
    fn distance_modulus_anchor() {
        // m - M = -5 puts the object at 1 pc.
        let d = distance_mpc(ABSOLUTE_MAGNITUDE - 5.0);
        assert!((d - 1e-6).abs() < 1e-15);
    }

    #[test]
    fn inverse_helpers_round_trip_through_derive() {
        let distance = 120.0;
        let velocity = 8400.0;
        let m = apparent_magnitude_for(distance);
        let (k, h) = line_wavelengths_for(velocity);
        let d = derive(m, k, h);
        assert!((d.distance - distance).abs() < 1e-9);
        assert!((d.velocity - velocity).abs() < 1e-9);
    }

    #[test]
    fn observe_copies_raw_fields() {
        let input = ObservationInput {
            galaxy: "M87".to_string(),
            object: "nucleus".to_string(),
            m: 15.0,
            k_measured: 3950.0,
            h_measured: 3985.0,
        };
        let obs = observe(&input);
        assert_eq!(obs.galaxy, "M87");
        assert_eq!(obs.object, "nucleus");
        assert_eq!(obs.m, 15.0);
        assert_eq!(obs.point(), (obs.distance, obs.velocity));
    }

    #[test]
    fn age_conversion_matches_hubble_time() {
        // H0 = 70 km/s/Mpc gives roughly 14 Gyr.
        let age = AGE_CONVERSION / 70.0;
        assert!((age - 1.3977e10).abs() < 1e7);
    }
}
