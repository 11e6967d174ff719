//! Align a feature set to a model's declared column order.

use tracing::debug;

use crate::domain::ProductLineCode;
use crate::features::FeatureSet;

/// Feature vector in declared order, plus the columns that had to be zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub values: Vec<f64>,
    pub defaulted: Vec<String>,
}

/// Build the model input row.
///
/// Each declared column takes its value from `features`; a column with no value
/// is sent as `0.0` and recorded in `defaulted`. Extra features the model does
/// not declare are dropped.
///
/// Callers surface `defaulted` to the user; the log event is for diagnostics
/// only and stays at `debug`.
pub fn align(code: ProductLineCode, features: &FeatureSet, declared: &[String]) -> AlignedRow {
    let mut values = Vec::with_capacity(declared.len());
    let mut defaulted = Vec::new();

    for column in declared {
        match features.get(column) {
            Some(v) => values.push(v),
            None => {
                debug!(%code, column = %column, "feature missing from inputs, defaulting to 0");
                values.push(0.0);
                defaulted.push(column.clone());
            }
        }
    }

    AlignedRow { values, defaulted }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::RawInputs;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn follows_declared_order_and_zero_fills() {
        let raw = RawInputs {
            bore: 4.0,
            stroke: 2.0,
            rpc: 1.0,
            rod: 3.0,
            r_bearing: true,
            b_bearing: false,
            val_a: false,
            block: true,
            val_b: None,
        };
        let features = FeatureSet::derive(ProductLineCode::Hd, &raw).renamed();
        let declared = cols(&["Bore_Rod", "Block_Y", "Val B_Y", "Bore", "R bearing_Y"]);

        let row = align(ProductLineCode::Hd, &features, &declared);
        assert_eq!(row.values, vec![12.0, 1.0, 0.0, 4.0, 1.0]);
        assert_eq!(row.defaulted, cols(&["Val B_Y"]));
    }

    #[test]
    fn unrenamed_boolean_column_is_defaulted() {
        let features = FeatureSet::default();
        let row = align(ProductLineCode::Ld, &features, &cols(&["Block"]));
        assert_eq!(row.values, vec![0.0]);
        assert_eq!(row.defaulted, cols(&["Block"]));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn logged_while_aligning(filter: &str) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            align(ProductLineCode::Hd, &FeatureSet::default(), &cols(&["Val B_Y"]));
        });
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn defaulted_column_is_quiet_at_default_filter() {
        assert!(logged_while_aligning("warn").is_empty());
        assert!(logged_while_aligning("debug").contains("Val B_Y"));
    }
}
