//! Fixed physical constants.

/// Absolute magnitude assumed for every observed object.
pub const ABSOLUTE_MAGNITUDE: f64 = -22.0;

/// Rest wavelength of the Ca II K-line (Å).
pub const K_REST: f64 = 3933.7;

/// Rest wavelength of the Ca II H-line (Å).
pub const H_REST: f64 = 3968.47;

/// Speed of light (km/s), rounded.
pub const C_KMS: f64 = 3e5;

/// Parsecs per megaparsec.
pub const PC_PER_MPC: f64 = 1e6;

/// Converts `1 / H0` with H0 in km/s/Mpc into years.
///
/// 1 Mpc / (1 km/s) = 3.0857e19 s ≈ 3.171e-8 yr/s × 1 / 3.241e-20 Mpc/km.
pub const AGE_CONVERSION: f64 = (3.171 / 3.241) * 1e12;
