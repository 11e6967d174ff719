//! Pre-fitted cost models.
//!
//! Models are loaded from artifacts rather than trained here; this module only
//! knows how to validate them and evaluate a single aligned row.

pub mod artifact;
pub mod estimator;

pub use artifact::*;
pub use estimator::*;
