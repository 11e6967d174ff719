//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the CLI, batch reader, and estimation core
//! - exported to JSON/CSV reports

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Product line, selecting both the derivation rule set and the model artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum ProductLineCode {
    #[serde(rename = "HD")]
    #[value(name = "HD")]
    Hd,
    #[serde(rename = "HDE")]
    #[value(name = "HDE")]
    Hde,
    #[serde(rename = "HDI")]
    #[value(name = "HDI")]
    Hdi,
    #[serde(rename = "LD")]
    #[value(name = "LD")]
    Ld,
    #[serde(rename = "LDH")]
    #[value(name = "LDH")]
    Ldh,
    #[serde(rename = "MD")]
    #[value(name = "MD")]
    Md,
    #[serde(rename = "NR")]
    #[value(name = "NR")]
    Nr,
    #[serde(rename = "H")]
    #[value(name = "H")]
    H,
    #[serde(rename = "L")]
    #[value(name = "L")]
    L,
    #[serde(rename = "M")]
    #[value(name = "M")]
    M,
    #[serde(rename = "N")]
    #[value(name = "N")]
    N,
}

impl ProductLineCode {
    /// All codes, in the order the product catalogue lists them.
    pub const ALL: [ProductLineCode; 11] = [
        ProductLineCode::Hd,
        ProductLineCode::Hde,
        ProductLineCode::Hdi,
        ProductLineCode::Ld,
        ProductLineCode::Ldh,
        ProductLineCode::Md,
        ProductLineCode::Nr,
        ProductLineCode::H,
        ProductLineCode::L,
        ProductLineCode::M,
        ProductLineCode::N,
    ];

    /// Canonical upper-case spelling (also the artifact file prefix).
    pub fn as_str(self) -> &'static str {
        match self {
            ProductLineCode::Hd => "HD",
            ProductLineCode::Hde => "HDE",
            ProductLineCode::Hdi => "HDI",
            ProductLineCode::Ld => "LD",
            ProductLineCode::Ldh => "LDH",
            ProductLineCode::Md => "MD",
            ProductLineCode::Nr => "NR",
            ProductLineCode::H => "H",
            ProductLineCode::L => "L",
            ProductLineCode::M => "M",
            ProductLineCode::N => "N",
        }
    }

    /// Comma-separated list of every code, for error messages and help text.
    pub fn list() -> String {
        Self::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for ProductLineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductLineCode {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| PredictError::UnknownProductLineCode(s.to_string()))
    }
}

/// Radio-style yes/no answer used by the CLI for boolean options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum YesNo {
    Yes,
    No,
}

impl From<YesNo> for bool {
    fn from(value: YesNo) -> Self {
        value == YesNo::Yes
    }
}

/// Raw measurements and options for one cylinder.
///
/// Built fresh per request; the pipeline never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInputs {
    pub bore: f64,
    pub stroke: f64,
    /// Reciprocating-part count.
    pub rpc: f64,
    pub rod: f64,

    pub r_bearing: bool,
    pub b_bearing: bool,
    pub val_a: bool,
    pub block: bool,
    /// Only meaningful for models trained with a `Val B_Y` column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val_b: Option<bool>,
}

impl RawInputs {
    /// Reject measurements that cannot describe a real cylinder.
    ///
    /// Rules:
    /// - every continuous value must be finite and non-negative
    /// - rod length must not exceed bore length
    pub fn validate(&self) -> Result<(), PredictError> {
        for (field, value) in [
            ("bore", self.bore),
            ("stroke", self.stroke),
            ("rpc", self.rpc),
            ("rod", self.rod),
        ] {
            if !value.is_finite() {
                return Err(PredictError::InvalidInput {
                    field,
                    reason: format!("must be a finite number, got {value}"),
                });
            }
            if value < 0.0 {
                return Err(PredictError::InvalidInput {
                    field,
                    reason: format!("must not be negative, got {value}"),
                });
            }
        }

        if self.rod > self.bore {
            return Err(PredictError::InvalidInput {
                field: "rod",
                reason: format!("rod length {} exceeds bore length {}", self.rod, self.bore),
            });
        }

        Ok(())
    }
}

/// Output of one estimation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub code: ProductLineCode,
    /// Estimated cost in currency units (`expm1` of the model output).
    pub cost: f64,
    /// Model output before the inverse transform (log1p scale).
    pub raw_prediction: f64,
    /// Values sent to the model, aligned with `declared_columns`.
    pub feature_vector: Vec<f64>,
    pub declared_columns: Vec<String>,
    /// Declared columns with no derived value; these were sent as `0.0`.
    pub defaulted_columns: Vec<String>,
}

impl PredictionResult {
    /// `(column, value)` pairs in the order they were sent to the model.
    pub fn columns_with_values(&self) -> impl Iterator<Item = (&str, f64)> {
        self.declared_columns
            .iter()
            .map(String::as_str)
            .zip(self.feature_vector.iter().copied())
    }
}
