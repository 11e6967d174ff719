//! Interactive product-line picker.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `cylcost predict` and choose a model" UX
//!
//! The picker lists the codes that have an artifact in the model directory.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::domain::ProductLineCode;
use crate::error::AppError;
use crate::registry::artifact_file_name;

/// Prompt on stdin/stdout for a product-line code.
pub fn prompt_for_code(available: &[ProductLineCode]) -> Result<ProductLineCode, AppError> {
    let stdin = io::stdin();
    prompt_for_code_with(stdin.lock(), io::stdout(), available)
}

/// Prompt for a product-line code using the given input/output streams.
///
/// Behavior:
/// - list codes with an artifact on disk
/// - accept either a number (from the list) or a code spelled out
/// - `q` cancels
pub fn prompt_for_code_with(
    mut input: impl BufRead,
    mut out: impl Write,
    available: &[ProductLineCode],
) -> Result<ProductLineCode, AppError> {
    let write_err = |e: io::Error| AppError::new(2, format!("Failed to write prompt: {e}"));

    if available.is_empty() {
        return Err(AppError::new(
            2,
            "No model artifacts found. Pass --model-dir or put <CODE>_model.json next to the binary.",
        ));
    }

    writeln!(out, "Found {} model(s):", available.len()).map_err(write_err)?;
    for (idx, code) in available.iter().enumerate() {
        writeln!(out, "{:>3}) {}", idx + 1, code).map_err(write_err)?;
    }

    loop {
        write!(out, "Select a model by number (1-{}) or code (q to quit): ", available.len())
            .map_err(write_err)?;
        out.flush().map_err(write_err)?;

        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::new(
                2,
                "No input received. Provide a model with `cylcost predict --code <CODE>`.",
            ));
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(choice) = line.parse::<usize>() {
            if (1..=available.len()).contains(&choice) {
                return Ok(available[choice - 1]);
            }
            writeln!(out, "Invalid choice: {choice}. Enter a number between 1 and {}.", available.len())
                .map_err(write_err)?;
            continue;
        }

        match line.to_ascii_uppercase().parse::<ProductLineCode>() {
            Ok(code) if available.contains(&code) => return Ok(code),
            Ok(code) => {
                writeln!(out, "No artifact for {code} in the model directory.").map_err(write_err)?;
            }
            Err(err) => {
                writeln!(out, "{err}").map_err(write_err)?;
            }
        }
    }
}

/// Codes that have a `<CODE>_model.json` file in `dir` (catalogue order).
pub fn discover_artifacts(dir: &Path) -> Vec<ProductLineCode> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let names: Vec<String> = entries
        .flatten()
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();

    ProductLineCode::ALL
        .into_iter()
        .filter(|code| names.contains(&artifact_file_name(*code)))
        .collect()
}

/// Validate the provided path points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(2, format!("CSV file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::new(
            2,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        != Some(true)
    {
        return Err(AppError::new(
            2,
            format!("Expected a .csv file (got: {}).", path.display()),
        ));
    }

    Ok(path.to_path_buf())
}
