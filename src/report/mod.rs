//! Reporting utilities: formatted terminal output for estimates and models.

pub mod format;

pub use format::*;
