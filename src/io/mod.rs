//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - results table export (`export`)
//! - fit JSON read/write (`fit_file`)
//! - PNG plot export (`image`)

pub mod export;
pub mod fit_file;
pub mod image;
pub mod ingest;

pub use export::*;
pub use fit_file::*;
pub use image::*;
pub use ingest::*;
