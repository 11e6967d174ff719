//! Command-line parsing for the cylinder cost estimator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the feature/inference code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ProductLineCode, RawInputs, YesNo};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cylcost", version, about = "Cylinder cost estimator (pre-trained regression models)")]
pub struct Cli {
    /// Directory holding `<CODE>_model.json` artifacts (default: next to the binary).
    #[arg(long, global = true, value_name = "DIR")]
    pub model_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate the cost of one cylinder.
    Predict(PredictArgs),
    /// Estimate costs for every row of a CSV file.
    Batch(BatchArgs),
    /// List product-line codes and the features each one derives.
    Codes,
    /// Show a model's declared columns and where each value comes from.
    Inspect(InspectArgs),
}

/// Options for a single estimate.
#[derive(Debug, Parser, Clone)]
pub struct PredictArgs {
    /// Product-line code. Prompts for one when omitted.
    #[arg(short = 'c', long, value_enum)]
    pub code: Option<ProductLineCode>,

    #[command(flatten)]
    pub inputs: InputArgs,

    /// Print the JSON report instead of the text summary.
    #[arg(long)]
    pub json: bool,

    /// Write the JSON report to a file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Measurements and options for one cylinder.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Bore length.
    #[arg(long, default_value_t = 100.0)]
    pub bore: f64,

    /// Stroke length.
    #[arg(long, default_value_t = 50.0)]
    pub stroke: f64,

    /// Reciprocating-part count.
    #[arg(long, default_value_t = 20.0)]
    pub rpc: f64,

    /// Rod length (must not exceed bore).
    #[arg(long, default_value_t = 30.0)]
    pub rod: f64,

    /// Rear bearing present.
    #[arg(long, value_enum, default_value_t = YesNo::Yes)]
    pub r_bearing: YesNo,

    /// Block bearing present.
    #[arg(long, value_enum, default_value_t = YesNo::Yes)]
    pub b_bearing: YesNo,

    /// Valve A present.
    #[arg(long, value_enum, default_value_t = YesNo::Yes)]
    pub val_a: YesNo,

    /// Block present.
    #[arg(long, value_enum, default_value_t = YesNo::Yes)]
    pub block: YesNo,

    /// Valve B present (only for models trained with it).
    #[arg(long, value_enum)]
    pub val_b: Option<YesNo>,
}

impl InputArgs {
    pub fn to_raw_inputs(&self) -> RawInputs {
        RawInputs {
            bore: self.bore,
            stroke: self.stroke,
            rpc: self.rpc,
            rod: self.rod,
            r_bearing: self.r_bearing.into(),
            b_bearing: self.b_bearing.into(),
            val_a: self.val_a.into(),
            block: self.block.into(),
            val_b: self.val_b.map(bool::from),
        }
    }
}

/// Options for batch estimation.
#[derive(Debug, Parser, Clone)]
pub struct BatchArgs {
    /// Input CSV (columns: code,bore,stroke,rpc,rod,r_bearing,b_bearing,val_a,block,val_b).
    #[arg(short = 'f', long, value_name = "CSV")]
    pub input: PathBuf,

    /// Output CSV (stdout when omitted).
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

/// Options for inspecting a model artifact.
#[derive(Debug, Parser, Clone)]
pub struct InspectArgs {
    #[arg(short = 'c', long, value_enum)]
    pub code: ProductLineCode,
}
