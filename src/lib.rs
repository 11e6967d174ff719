//! `cylcost` library crate.
//!
//! Estimates the manufacturing cost of a cylinder from its dimensions and
//! options using a pre-trained regression model per product line.
//!
//! The binary (`cylcost`) is a thin wrapper around this library so that:
//!
//! - the feature pipeline is testable without spawning processes
//! - other front-ends can call `pipeline::CostEstimator` directly

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod features;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod pipeline;
pub mod registry;
pub mod report;
