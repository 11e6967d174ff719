//! Target transforms.
//!
//! Cost targets are heavily right-skewed, so the models were trained on
//! `log1p(cost)`. Predictions therefore come back on that scale and must be
//! mapped back with the inverse `expm1`.
//!
//! Numerical notes:
//! - For small `y`, `exp(y) - 1` suffers from catastrophic cancellation.
//!   `f64::exp_m1` computes the same quantity without the precision loss.

/// Inverse transform applied to model output: `exp(y) - 1`.
pub fn expm1(y: f64) -> f64 {
    y.exp_m1()
}
