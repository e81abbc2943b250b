//! Reporting utilities: text tables and fit summaries for the terminal.

pub mod format;

pub use format::*;
