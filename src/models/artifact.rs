//! Model artifacts: a fitted estimator plus the ordered columns it expects.
//!
//! Artifact JSON schema:
//!
//! ```text
//! {
//!   "feature_names_":    ["Bore", "Stroke", ...],   // or "feature_names_in_"
//!   "estimator":         { "kind": "linear" | "tree_ensemble", ... }
//! }
//! ```
//!
//! Exporters disagree on where the column list lives (`feature_names_` for
//! boosted models, `feature_names_in_` for scikit-learn style ones). Both are
//! accepted and normalized into a single `declared_columns` list at load time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::ProductLineCode;
use crate::error::PredictError;
use crate::models::estimator::Estimator;

/// On-disk shape of an artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFile {
    #[serde(rename = "feature_names_", default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(rename = "feature_names_in_", default, skip_serializing_if = "Option::is_none")]
    pub feature_names_in: Option<Vec<String>>,
    pub estimator: Estimator,
}

impl ArtifactFile {
    /// Resolve the declared column list from whichever attribute is present.
    pub fn declared_columns(&self) -> Result<&[String], String> {
        match (&self.feature_names, &self.feature_names_in) {
            (Some(a), Some(b)) if a != b => {
                Err("'feature_names_' and 'feature_names_in_' disagree".to_string())
            }
            (Some(cols), _) | (None, Some(cols)) => Ok(cols.as_slice()),
            (None, None) => Err("artifact declares no feature names".to_string()),
        }
    }
}

/// A validated, read-only model artifact for one product line.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifact {
    code: ProductLineCode,
    declared_columns: Vec<String>,
    estimator: Estimator,
}

impl ModelArtifact {
    /// Build an artifact, checking the column list and estimator agree.
    pub fn new(
        code: ProductLineCode,
        declared_columns: Vec<String>,
        estimator: Estimator,
    ) -> Result<Self, String> {
        if declared_columns.is_empty() {
            return Err("declared column list is empty".to_string());
        }
        let mut seen = HashSet::new();
        for col in &declared_columns {
            if !seen.insert(col.as_str()) {
                return Err(format!("duplicate declared column '{col}'"));
            }
        }
        estimator.validate(declared_columns.len())?;

        Ok(Self {
            code,
            declared_columns,
            estimator,
        })
    }

    /// Parse and validate artifact JSON.
    pub fn from_json_slice(code: ProductLineCode, bytes: &[u8]) -> Result<Self, String> {
        let file: ArtifactFile =
            serde_json::from_slice(bytes).map_err(|e| format!("invalid artifact JSON: {e}"))?;
        let columns = file.declared_columns()?.to_vec();
        Self::new(code, columns, file.estimator)
    }

    pub fn code(&self) -> ProductLineCode {
        self.code
    }

    /// Column names the model expects, in order.
    pub fn declared_columns(&self) -> &[String] {
        &self.declared_columns
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    /// Predict on one aligned row (log1p scale).
    pub fn predict(&self, row: &[f64]) -> Result<f64, PredictError> {
        if row.len() != self.declared_columns.len() {
            return Err(PredictError::ColumnCountMismatch {
                expected: self.declared_columns.len(),
                actual: row.len(),
            });
        }
        Ok(self.estimator.predict(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::estimator::LinearModel;

    fn linear(n: usize) -> Estimator {
        Estimator::Linear(LinearModel {
            intercept: 0.5,
            coefficients: vec![0.1; n],
        })
    }

    #[test]
    fn accepts_either_feature_name_attribute() {
        let catboost = br#"{"feature_names_": ["Bore", "Rod"],
            "estimator": {"kind": "linear", "intercept": 0.0, "coefficients": [1.0, 2.0]}}"#;
        let sklearn = br#"{"feature_names_in_": ["Bore", "Rod"],
            "estimator": {"kind": "linear", "intercept": 0.0, "coefficients": [1.0, 2.0]}}"#;

        let a = ModelArtifact::from_json_slice(ProductLineCode::Hd, catboost).unwrap();
        let b = ModelArtifact::from_json_slice(ProductLineCode::Hd, sklearn).unwrap();
        assert_eq!(a.declared_columns(), ["Bore", "Rod"]);
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_missing_or_conflicting_feature_names() {
        let none = br#"{"estimator": {"kind": "linear", "intercept": 0.0, "coefficients": []}}"#;
        let err = ModelArtifact::from_json_slice(ProductLineCode::Hd, none).unwrap_err();
        assert!(err.contains("no feature names"), "{err}");

        let both = br#"{"feature_names_": ["Bore"], "feature_names_in_": ["Rod"],
            "estimator": {"kind": "linear", "intercept": 0.0, "coefficients": [1.0]}}"#;
        assert!(ModelArtifact::from_json_slice(ProductLineCode::Hd, both).is_err());
    }

    #[test]
    fn rejects_duplicate_and_empty_columns() {
        let dup = vec!["Bore".to_string(), "Bore".to_string()];
        assert!(ModelArtifact::new(ProductLineCode::Ld, dup, linear(2)).is_err());
        assert!(ModelArtifact::new(ProductLineCode::Ld, vec![], linear(0)).is_err());
    }

    #[test]
    fn predict_checks_row_length() {
        let artifact =
            ModelArtifact::new(ProductLineCode::Ld, vec!["Bore".into(), "Rod".into()], linear(2)).unwrap();
        assert_eq!(
            artifact.predict(&[1.0]),
            Err(PredictError::ColumnCountMismatch { expected: 2, actual: 1 })
        );
        assert!((artifact.predict(&[1.0, 1.0]).unwrap() - 0.7).abs() < 1e-12);
    }
}
