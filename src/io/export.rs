//! JSON prediction reports.
//!
//! A report records everything needed to audit one estimate: the raw inputs,
//! the exact vector sent to the model, and any zero-filled columns.

use std::fs::File;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::domain::{PredictionResult, ProductLineCode, RawInputs};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub tool: String,
    /// RFC 3339 local timestamp.
    pub generated_at: String,
    pub code: ProductLineCode,
    pub inputs: RawInputs,
    pub cost: f64,
    pub raw_prediction: f64,
    pub declared_columns: Vec<String>,
    pub feature_vector: Vec<f64>,
    pub defaulted_columns: Vec<String>,
}

impl PredictionReport {
    pub fn new(inputs: &RawInputs, result: &PredictionResult) -> Self {
        Self {
            tool: "cylcost".to_string(),
            generated_at: Local::now().to_rfc3339(),
            code: result.code,
            inputs: inputs.clone(),
            cost: result.cost,
            raw_prediction: result.raw_prediction,
            declared_columns: result.declared_columns.clone(),
            feature_vector: result.feature_vector.clone(),
            defaulted_columns: result.defaulted_columns.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AppError::new(4, format!("Failed to serialize report: {e}")))
    }
}

/// Write a report JSON file.
pub fn write_report_json(path: &Path, report: &PredictionReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;

    Ok(())
}
