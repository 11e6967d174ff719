//! Shared estimation workflow used by the CLI handlers.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! build estimator -> estimate (single or batch) -> report
//!
//! The handlers can then focus on presentation (printing vs files).

use std::path::Path;

use rayon::prelude::*;
use tracing::info;

use crate::domain::{PredictionResult, ProductLineCode, RawInputs};
use crate::error::AppError;
use crate::io::batch::{BatchOutcome, BatchRequest};
use crate::pipeline::CostEstimator;
use crate::registry::ModelRegistry;

/// Estimator backed by `<CODE>_model.json` files in `model_dir`.
pub fn estimator_for_dir(model_dir: &Path) -> CostEstimator {
    CostEstimator::new(ModelRegistry::from_dir(model_dir))
}

/// Estimate one cylinder.
pub fn run_predict(
    estimator: &CostEstimator,
    code: ProductLineCode,
    inputs: &RawInputs,
) -> Result<PredictionResult, AppError> {
    Ok(estimator.predict(code, inputs)?)
}

/// Estimate every batch row in parallel.
///
/// Output order matches input order. Failures stay on their row.
pub fn run_batch(estimator: &CostEstimator, requests: &[BatchRequest]) -> Vec<BatchOutcome> {
    let outcomes: Vec<BatchOutcome> = requests
        .par_iter()
        .map(|req| {
            let result = match &req.inputs {
                Ok(inputs) => estimator
                    .predict_code(&req.code, inputs)
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.clone()),
            };
            BatchOutcome {
                line: req.line,
                code: req.code.clone(),
                result,
            }
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(rows = outcomes.len(), failed, "batch estimation finished");
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryStore;

    const HD_JSON: &str = r#"{
        "feature_names_in_": ["Bore", "Rod", "Bore_Rod", "Block_Y"],
        "estimator": { "kind": "linear", "intercept": 3.0, "coefficients": [0.01, 0.01, 0.0001, 0.5] }
    }"#;

    fn request(line: usize, code: &str, bore: f64, rod: f64) -> BatchRequest {
        BatchRequest {
            line,
            code: code.to_string(),
            inputs: Ok(RawInputs {
                bore,
                stroke: 10.0,
                rpc: 2.0,
                rod,
                r_bearing: true,
                b_bearing: true,
                val_a: true,
                block: true,
                val_b: None,
            }),
        }
    }

    #[test]
    fn batch_preserves_order_and_isolates_failures() {
        let estimator =
            CostEstimator::new(ModelRegistry::new(MemoryStore::new().with_artifact(ProductLineCode::Hd, HD_JSON)));

        let mut requests: Vec<BatchRequest> = (0..32).map(|i| request(i + 2, "HD", 100.0 + i as f64, 10.0)).collect();
        requests.push(request(40, "ZZZ", 100.0, 10.0));
        requests.push(request(41, "HD", 10.0, 20.0));
        requests.push(BatchRequest {
            line: 42,
            code: "HD".into(),
            inputs: Err("CSV parse error: bad float".into()),
        });
        requests.push(request(43, "LD", 100.0, 10.0));

        let outcomes = run_batch(&estimator, &requests);
        assert_eq!(outcomes.len(), requests.len());
        for (req, out) in requests.iter().zip(&outcomes) {
            assert_eq!(req.line, out.line);
        }
        assert!(outcomes[..32].iter().all(|o| o.result.is_ok()));

        let tail: Vec<&String> = outcomes[32..].iter().map(|o| o.result.as_ref().unwrap_err()).collect();
        assert!(tail[0].contains("Unknown product-line code 'ZZZ'"));
        assert!(tail[1].contains("Invalid input 'rod'"));
        assert!(tail[2].contains("bad float"));
        assert!(tail[3].contains("unavailable"));
    }

    #[test]
    fn batch_matches_single_predictions() {
        let estimator =
            CostEstimator::new(ModelRegistry::new(MemoryStore::new().with_artifact(ProductLineCode::Hd, HD_JSON)));
        let req = request(2, "HD", 120.0, 40.0);

        let single = run_predict(&estimator, ProductLineCode::Hd, req.inputs.as_ref().unwrap()).unwrap();
        let batch = run_batch(&estimator, std::slice::from_ref(&req));
        assert_eq!(batch[0].result.as_ref().unwrap(), &single);
    }
}
