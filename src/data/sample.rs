//! Synthetic galaxy observations drawn from a chosen Hubble constant.
//!
//! Each galaxy gets a uniform random distance, a velocity from Hubble's law plus
//! Gaussian peculiar-velocity noise, and a Gaussian magnitude scatter. The
//! physics is then inverted to produce what the form would have received:
//! apparent magnitude and measured K/H wavelengths.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::ObservationInput;
use crate::error::AppError;
use crate::physics::{apparent_magnitude_for, line_wavelengths_for};

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub count: usize,
    pub seed: u64,
    /// Hubble constant used to generate velocities (km/s/Mpc).
    pub h0: f64,
    pub distance_min: f64,
    pub distance_max: f64,
    /// Standard deviation of peculiar velocities (km/s).
    pub velocity_noise: f64,
    /// Standard deviation of magnitude scatter.
    pub magnitude_noise: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 12,
            seed: 42,
            h0: 70.0,
            distance_min: 10.0,
            distance_max: 400.0,
            velocity_noise: 300.0,
            magnitude_noise: 0.05,
        }
    }
}

pub fn generate_sample(config: &SampleConfig) -> Result<Vec<ObservationInput>, AppError> {
    if config.count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }
    if !(config.distance_min.is_finite()
        && config.distance_max.is_finite()
        && config.distance_min > 0.0
        && config.distance_max > config.distance_min)
    {
        return Err(AppError::new(2, "Invalid distance range for sample generation."));
    }
    if !(config.h0.is_finite() && config.h0 > 0.0) {
        return Err(AppError::new(2, "Sample H0 must be a positive number."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let v_noise = Normal::new(0.0, config.velocity_noise)
        .map_err(|e| AppError::new(2, format!("Velocity noise distribution error: {e}")))?;
    let m_noise = Normal::new(0.0, config.magnitude_noise)
        .map_err(|e| AppError::new(2, format!("Magnitude noise distribution error: {e}")))?;

    let mut out = Vec::with_capacity(config.count);
    for i in 0..config.count {
        let distance = rng.gen_range(config.distance_min..=config.distance_max);
        let velocity = config.h0 * distance + v_noise.sample(&mut rng);
        let m = apparent_magnitude_for(distance) + m_noise.sample(&mut rng);
        let (k_measured, h_measured) = line_wavelengths_for(velocity);

        let input = ObservationInput {
            galaxy: format!("SYN-{:03}", i + 1),
            object: "nucleus".to_string(),
            m,
            k_measured,
            h_measured,
        };
        input.validate().map_err(|e| {
            AppError::new(2, format!("Generated galaxy {} is out of range: {e}", input.galaxy))
        })?;
        out.push(input);
    }

    Ok(out)
}
