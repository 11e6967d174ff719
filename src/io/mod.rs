//! Input/output helpers.
//!
//! - batch CSV ingest + results export (`batch`)
//! - JSON prediction reports (`export`)

pub mod batch;
pub mod export;

pub use batch::*;
pub use export::*;
