//! Cost estimation pipeline.
//!
//! One request flows through:
//! validate -> derive features -> rename booleans -> reject non-finite features
//! -> load artifact -> align to declared columns -> predict -> `expm1` inverse transform
//!
//! Everything except the registry's artifact cache is per-request, so a single
//! `CostEstimator` can be shared across threads.

pub mod align;

pub use align::*;

use tracing::debug;

use crate::domain::{PredictionResult, ProductLineCode, RawInputs};
use crate::error::PredictError;
use crate::features::FeatureSet;
use crate::math::expm1;
use crate::registry::ModelRegistry;

#[derive(Debug)]
pub struct CostEstimator {
    registry: ModelRegistry,
}

impl CostEstimator {
    pub fn new(registry: ModelRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Parse `code` and estimate. An unknown code fails before any artifact load.
    pub fn predict_code(&self, code: &str, raw: &RawInputs) -> Result<PredictionResult, PredictError> {
        let code: ProductLineCode = code.parse()?;
        self.predict(code, raw)
    }

    /// Estimate the cost of one cylinder.
    pub fn predict(&self, code: ProductLineCode, raw: &RawInputs) -> Result<PredictionResult, PredictError> {
        raw.validate()?;

        let features = FeatureSet::derive(code, raw).renamed();
        ensure_finite(&features)?;
        debug!(%code, features = features.iter().count(), "derived feature set");

        let artifact = self.registry.get(code)?;

        let declared = artifact.declared_columns();
        let row = align(code, &features, declared);

        let raw_prediction = artifact.predict(&row.values)?;
        let cost = expm1(raw_prediction);
        if !cost.is_finite() {
            return Err(PredictError::NonFinitePrediction {
                code,
                value: raw_prediction,
            });
        }

        Ok(PredictionResult {
            code,
            cost,
            raw_prediction,
            feature_vector: row.values,
            declared_columns: declared.to_vec(),
            defaulted_columns: row.defaulted,
        })
    }
}

/// Finite raw inputs can still overflow once squared or multiplied.
fn ensure_finite(features: &FeatureSet) -> Result<(), PredictError> {
    match features.iter().find(|(_, v)| !v.is_finite()) {
        Some((column, value)) => Err(PredictError::InvalidInput {
            field: column,
            reason: format!("derived value {value} is not finite"),
        }),
        None => Ok(()),
    }
}
