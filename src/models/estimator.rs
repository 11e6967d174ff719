//! Pre-fitted regressors.
//!
//! Two estimator families are supported:
//! - `linear`: `intercept + coefficients · x`
//! - `tree_ensemble`: `base_score + Σ leaf(tree, x)` over additive regression trees
//!
//! Both operate on a row already aligned to the artifact's declared columns and
//! return a value on the training target's (log1p) scale.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// A fitted estimator, tagged by `kind` in artifact JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    /// One coefficient per declared column, in declared order.
    pub coefficients: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

/// A regression tree stored as a flat node list; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Split(Split),
    Leaf(f64),
}

/// Route left when `x[feature] < threshold`, otherwise right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub feature: usize,
    pub threshold: f64,
    pub left: usize,
    pub right: usize,
}

impl Estimator {
    /// Check the estimator is consistent with `n_features` declared columns.
    ///
    /// After this succeeds, `predict` cannot index out of bounds or loop for any
    /// row of length `n_features`.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        match self {
            Estimator::Linear(m) => m.validate(n_features),
            Estimator::TreeEnsemble(m) => m.validate(n_features),
        }
    }

    /// Predict for one aligned row.
    ///
    /// # Panics
    /// Panics if the estimator was not validated against `row.len()` features.
    pub fn predict(&self, row: &[f64]) -> f64 {
        match self {
            Estimator::Linear(m) => m.predict(row),
            Estimator::TreeEnsemble(m) => m.predict(row),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Estimator::Linear(_) => "linear",
            Estimator::TreeEnsemble(_) => "tree_ensemble",
        }
    }
}

impl LinearModel {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.coefficients.len() != n_features {
            return Err(format!(
                "linear model has {} coefficients for {} declared columns",
                self.coefficients.len(),
                n_features
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("linear model has non-finite parameters".to_string());
        }
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> f64 {
        let beta = DVector::from_row_slice(&self.coefficients);
        let x = DVector::from_row_slice(row);
        self.intercept + beta.dot(&x)
    }
}

impl TreeEnsemble {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if !self.base_score.is_finite() {
            return Err("tree ensemble has a non-finite base score".to_string());
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features).map_err(|e| format!("tree {t}: {e}"))?;
        }
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> f64 {
        self.base_score + self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>()
    }
}

impl Tree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".to_string());
        }
        let n_nodes = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf(value) if !value.is_finite() => {
                    return Err(format!("node {idx}: non-finite leaf value"));
                }
                Node::Leaf(_) => {}
                Node::Split(split) => {
                    if split.feature >= n_features {
                        return Err(format!(
                            "node {idx}: feature index {} out of range ({n_features} columns)",
                            split.feature
                        ));
                    }
                    if split.threshold.is_nan() {
                        return Err(format!("node {idx}: NaN threshold"));
                    }
                    // Children must point forward so traversal always terminates.
                    for child in [split.left, split.right] {
                        if child <= idx || child >= n_nodes {
                            return Err(format!("node {idx}: invalid child index {child}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf(value) => return *value,
                Node::Split(split) => {
                    idx = if row[split.feature] < split.threshold {
                        split.left
                    } else {
                        split.right
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> Tree {
        Tree {
            nodes: vec![
                Node::Split(Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                }),
                Node::Leaf(left),
                Node::Leaf(right),
            ],
        }
    }

    #[test]
    fn linear_predict_is_intercept_plus_dot() {
        let m = Estimator::Linear(LinearModel {
            intercept: 1.5,
            coefficients: vec![2.0, -1.0, 0.5],
        });
        m.validate(3).unwrap();
        assert!((m.predict(&[1.0, 2.0, 4.0]) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn linear_rejects_wrong_coefficient_count() {
        let m = Estimator::Linear(LinearModel {
            intercept: 0.0,
            coefficients: vec![1.0, 2.0],
        });
        assert!(m.validate(3).is_err());
    }

    #[test]
    fn tree_ensemble_routes_and_sums_leaves() {
        let m = Estimator::TreeEnsemble(TreeEnsemble {
            base_score: 5.0,
            trees: vec![stump(0, 10.0, -1.0, 1.0), stump(1, 0.5, 0.25, 0.75)],
        });
        m.validate(2).unwrap();
        assert!((m.predict(&[3.0, 1.0]) - (5.0 - 1.0 + 0.75)).abs() < 1e-12);
        assert!((m.predict(&[10.0, 0.0]) - (5.0 + 1.0 + 0.25)).abs() < 1e-12);
    }

    #[test]
    fn tree_rejects_backward_children_and_bad_features() {
        let cyclic = Tree {
            nodes: vec![Node::Split(Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 0,
            })],
        };
        assert!(cyclic.validate(1).is_err());
        assert!(stump(3, 1.0, 0.0, 0.0).validate(2).is_err());
        assert!(Tree { nodes: vec![] }.validate(2).is_err());
    }

    #[test]
    fn estimator_json_is_tagged_by_kind() {
        let json = r#"{
            "kind": "tree_ensemble",
            "base_score": 1.0,
            "trees": [{ "nodes": [
                { "split": { "feature": 0, "threshold": 2.0, "left": 1, "right": 2 } },
                { "leaf": 0.5 },
                { "leaf": -0.5 }
            ] }]
        }"#;
        let m: Estimator = serde_json::from_str(json).unwrap();
        assert_eq!(m.kind_name(), "tree_ensemble");
        assert!((m.predict(&[1.0]) - 1.5).abs() < 1e-12);
    }
}
