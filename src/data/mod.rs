//! Data sources other than manual entry.

pub mod sample;

pub use sample::{SampleConfig, generate_sample};
