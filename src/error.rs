//! Error types.
//!
//! - `PredictError`: structured failures of the estimation core (library API)
//! - `AppError`: what the binary reports, carrying a process exit code
//!
//! Exit codes used by the binary:
//! - 2: usage / input errors (unknown code, invalid measurements, bad files)
//! - 3: model artifact unavailable
//! - 4: prediction failure

use thiserror::Error;

use crate::domain::ProductLineCode;

/// Failures of a single estimation request.
///
/// All variants are fatal to the request. Missing declared columns are not an
/// error; they are reported on the result as `defaulted_columns`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("Unknown product-line code '{0}' (expected one of: {})", ProductLineCode::list())]
    UnknownProductLineCode(String),

    #[error("Model artifact for {code} unavailable at '{location}': {reason}")]
    ArtifactUnavailable {
        code: ProductLineCode,
        location: String,
        reason: String,
    },

    #[error("Invalid input '{field}': {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Feature vector has {actual} values but the model expects {expected}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    #[error("Non-finite prediction for {code}: {value}")]
    NonFinitePrediction { code: ProductLineCode, value: f64 },
}

impl PredictError {
    /// Exit code the binary uses when this error ends a run.
    pub fn exit_code(&self) -> u8 {
        match self {
            PredictError::UnknownProductLineCode(_) | PredictError::InvalidInput { .. } => 2,
            PredictError::ArtifactUnavailable { .. } => 3,
            PredictError::ColumnCountMismatch { .. } | PredictError::NonFinitePrediction { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_errors_map_to_exit_codes() {
        let unknown: AppError = PredictError::UnknownProductLineCode("ZZZ".into()).into();
        assert_eq!(unknown.exit_code(), 2);
        assert!(unknown.to_string().contains("ZZZ"));

        let missing: AppError = PredictError::ArtifactUnavailable {
            code: ProductLineCode::Hd,
            location: "models/HD_model.json".into(),
            reason: "not found".into(),
        }
        .into();
        assert_eq!(missing.exit_code(), 3);
        assert!(missing.to_string().contains("models/HD_model.json"));
    }
}
