//! Feature derivation.
//!
//! Responsibilities:
//!
//! - canonical feature names and the boolean column renaming (`names`)
//! - the per-product-line derivation table and `FeatureSet` (`derive`)

pub mod derive;
pub mod names;

pub use derive::*;
pub use names::*;
