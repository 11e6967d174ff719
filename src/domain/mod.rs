//! Domain types used throughout the estimator.
//!
//! This module defines:
//!
//! - the product-line code enum (`ProductLineCode`)
//! - raw per-request inputs (`RawInputs`)
//! - the estimation output (`PredictionResult`)

pub mod types;

pub use types::*;
