//! Mathematical utilities: target transforms.

pub mod transform;

pub use transform::*;
