//! Batch CSV ingest and results export.
//!
//! Input schema (header row required):
//!
//! ```text
//! code,bore,stroke,rpc,rod,r_bearing,b_bearing,val_a,block,val_b
//! HD,100,50,20,30,yes,no,yes,yes,
//! ```
//!
//! Design goals:
//! - **Row-level validation**: a bad row is reported, never aborts the batch
//! - **Stable output**: one output row per input row, in input order

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::domain::{PredictionResult, RawInputs};
use crate::error::{AppError, PredictError};

#[derive(Debug, Clone, Deserialize)]
struct CsvRow {
    code: String,
    bore: f64,
    stroke: f64,
    rpc: f64,
    rod: f64,
    r_bearing: String,
    b_bearing: String,
    val_a: String,
    block: String,
    #[serde(default)]
    val_b: Option<String>,
}

/// One parsed input row, or why it could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    /// 1-based file line (header is line 1).
    pub line: usize,
    pub code: String,
    pub inputs: Result<RawInputs, String>,
}

/// Outcome of one batch row.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub line: usize,
    pub code: String,
    pub result: Result<PredictionResult, String>,
}

#[derive(Debug, Serialize)]
struct CsvOutRow<'a> {
    line: usize,
    code: &'a str,
    cost: Option<f64>,
    raw_prediction: Option<f64>,
    defaulted_columns: String,
    error: &'a str,
}

/// Parse batch requests from CSV.
///
/// Only a missing/unreadable header is fatal; every other problem is kept on
/// the affected row.
pub fn read_batch_requests(reader: impl Read) -> Result<Vec<BatchRequest>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    if !headers.iter().any(|h| h == "code") {
        return Err(AppError::new(2, "Batch CSV is missing the required 'code' column."));
    }

    let mut out = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let line = idx + 2;
        let request = match record {
            Ok(record) => match record.deserialize::<CsvRow>(Some(&headers)) {
                Ok(row) => BatchRequest {
                    line,
                    code: row.code.clone(),
                    inputs: row_to_inputs(&row).map_err(|e| e.to_string()),
                },
                Err(e) => BatchRequest {
                    line,
                    code: record.get(code_index(&headers)).unwrap_or_default().to_string(),
                    inputs: Err(format!("CSV parse error: {e}")),
                },
            },
            Err(e) => BatchRequest {
                line,
                code: String::new(),
                inputs: Err(format!("CSV parse error: {e}")),
            },
        };
        out.push(request);
    }

    Ok(out)
}

/// Write one CSV row per outcome.
pub fn write_batch_results(writer: impl Write, outcomes: &[BatchOutcome]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);

    for outcome in outcomes {
        let row = match &outcome.result {
            Ok(result) => CsvOutRow {
                line: outcome.line,
                code: &outcome.code,
                cost: Some(result.cost),
                raw_prediction: Some(result.raw_prediction),
                defaulted_columns: result.defaulted_columns.join(";"),
                error: "",
            },
            Err(err) => CsvOutRow {
                line: outcome.line,
                code: &outcome.code,
                cost: None,
                raw_prediction: None,
                defaulted_columns: String::new(),
                error: err,
            },
        };
        writer
            .serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write batch CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush batch CSV: {e}")))?;
    Ok(())
}

fn code_index(headers: &csv::StringRecord) -> usize {
    headers.iter().position(|h| h == "code").unwrap_or(0)
}

fn row_to_inputs(row: &CsvRow) -> Result<RawInputs, PredictError> {
    let val_b = match row.val_b.as_deref() {
        None | Some("") => None,
        Some(v) => Some(parse_flag("val_b", v)?),
    };

    Ok(RawInputs {
        bore: row.bore,
        stroke: row.stroke,
        rpc: row.rpc,
        rod: row.rod,
        r_bearing: parse_flag("r_bearing", &row.r_bearing)?,
        b_bearing: parse_flag("b_bearing", &row.b_bearing)?,
        val_a: parse_flag("val_a", &row.val_a)?,
        block: parse_flag("block", &row.block)?,
        val_b,
    })
}

/// Parse a yes/no cell (`yes/no/y/n/true/false/1/0`, case-insensitive).
pub fn parse_flag(field: &'static str, value: &str) -> Result<bool, PredictError> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Ok(true),
        "no" | "n" | "false" | "0" => Ok(false),
        other => Err(PredictError::InvalidInput {
            field,
            reason: format!("expected yes/no, got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductLineCode;

    const CSV: &str = "\
code,bore,stroke,rpc,rod,r_bearing,b_bearing,val_a,block,val_b
HD,100,50,20,30,yes,no,Y,0,
NR, 80, 40, 10, 20, true, false, no, yes, yes
LD,abc,1,1,1,yes,yes,yes,yes,
MD,100,50,20,30,maybe,no,no,no,
";

    #[test]
    fn parses_rows_and_keeps_errors_row_local() {
        let rows = read_batch_requests(CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);

        let hd = rows[0].inputs.as_ref().unwrap();
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].code, "HD");
        assert!(hd.r_bearing && !hd.b_bearing && hd.val_a && !hd.block);
        assert_eq!(hd.val_b, None);

        let nr = rows[1].inputs.as_ref().unwrap();
        assert_eq!(nr.bore, 80.0);
        assert_eq!(nr.val_b, Some(true));

        assert_eq!(rows[2].code, "LD");
        assert!(rows[2].inputs.as_ref().unwrap_err().contains("CSV parse error"));

        let err = rows[3].inputs.as_ref().unwrap_err();
        assert!(err.contains("r_bearing"), "{err}");
    }

    #[test]
    fn missing_code_column_is_fatal() {
        let err = read_batch_requests("bore,stroke\n1,2\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn writes_costs_and_errors() {
        let ok = PredictionResult {
            code: ProductLineCode::Hd,
            cost: 1234.5,
            raw_prediction: 7.119,
            feature_vector: vec![1.0, 0.0],
            declared_columns: vec!["Bore".into(), "Extra".into()],
            defaulted_columns: vec!["Extra".into()],
        };
        let outcomes = vec![
            BatchOutcome {
                line: 2,
                code: "HD".into(),
                result: Ok(ok),
            },
            BatchOutcome {
                line: 3,
                code: "ZZZ".into(),
                result: Err("unknown code".into()),
            },
        ];

        let mut buf = Vec::new();
        write_batch_results(&mut buf, &outcomes).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "line,code,cost,raw_prediction,defaulted_columns,error");
        assert_eq!(lines[1], "2,HD,1234.5,7.119,Extra,");
        assert_eq!(lines[2], "3,ZZZ,,,,unknown code");
    }

    #[test]
    fn flags_accept_common_spellings() {
        for v in ["YES", "y", "True", "1"] {
            assert_eq!(parse_flag("block", v), Ok(true));
        }
        for v in ["No", "n", "FALSE", "0"] {
            assert_eq!(parse_flag("block", v), Ok(false));
        }
        assert!(parse_flag("block", "").is_err());
    }
}
