//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the feature/inference code stays clean and testable
//! - output changes are localized

use crate::domain::{PredictionResult, ProductLineCode};
use crate::features::{ColumnOrigin, column_origin, derived_terms, form_features};
use crate::models::ModelArtifact;

/// Format a single estimate: cost, the columns and values sent, and warnings.
pub fn format_prediction(result: &PredictionResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== cylcost - {} ===\n", result.code));
    out.push_str(&format!("Predicted Cost: $ {:.2}\n", result.cost));
    out.push_str(&format!("Model output (log1p): {:.6}\n", result.raw_prediction));

    out.push_str("\nInputs sent to model:\n");
    out.push_str(&format!("{:<16} {:>14}\n", "column", "value"));
    out.push_str(&format!("{:-<16} {:-<14}\n", "", ""));
    for (column, value) in result.columns_with_values() {
        let mark = if result.defaulted_columns.iter().any(|d| d == column) { " *" } else { "" };
        out.push_str(&format!("{:<16} {:>14}{mark}\n", truncate(column, 16), fmt_value(value)));
    }

    if !result.defaulted_columns.is_empty() {
        out.push('\n');
        for column in &result.defaulted_columns {
            out.push_str(&format!("warning: feature missing from inputs: {column} (defaulted to 0)\n"));
        }
    }

    out
}

/// Format the code catalogue: derived columns and form inputs per code.
pub fn format_codes() -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<5} {:<48} {}\n", "code", "derived columns", "form inputs"));
    out.push_str(&format!("{:-<5} {:-<48} {:-<11}\n", "", "", ""));

    for code in ProductLineCode::ALL {
        let terms = derived_terms(code);
        let derived = if terms.is_empty() {
            "(none)".to_string()
        } else {
            terms
                .iter()
                .map(|t| format!("{}={}", t.column, t.formula()))
                .collect::<Vec<_>>()
                .join(", ")
        };
        out.push_str(
            format!("{:<5} {:<48} {}\n", code.as_str(), derived, form_features(code).join(", ")).as_str(),
        );
    }

    out
}

/// Format an artifact's declared columns with where each value comes from.
pub fn format_inspection(artifact: &ModelArtifact, location: &str) -> String {
    let code = artifact.code();
    let mut out = String::new();

    out.push_str(&format!("Model: {code} ({})\n", artifact.estimator().kind_name()));
    out.push_str(&format!("Artifact: {location}\n"));
    out.push_str(&format!("Declared columns: {}\n\n", artifact.declared_columns().len()));

    let mut unproduced = 0usize;
    for (idx, column) in artifact.declared_columns().iter().enumerate() {
        let origin = match column_origin(code, column) {
            ColumnOrigin::Raw => "raw input".to_string(),
            ColumnOrigin::Boolean(f) => format!("yes/no option '{}'", f.base_name()),
            ColumnOrigin::Derived(t) => format!("derived {}", t.formula()),
            ColumnOrigin::Unproduced => {
                unproduced += 1;
                "NOT PRODUCED (zero-filled)".to_string()
            }
        };
        out.push_str(&format!("{:>3}. {:<16} {origin}\n", idx + 1, truncate(column, 16)));
    }

    if unproduced > 0 {
        out.push_str(&format!(
            "\nwarning: {unproduced} column(s) will always be sent as 0 for {code}\n"
        ));
    }

    out
}

fn fmt_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.4}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
