//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the model directory
//! - runs single or batch estimation
//! - prints reports and writes optional exports

use std::fs::File;
use std::path::PathBuf;

use clap::Parser;

use crate::cli::{BatchArgs, Command, InspectArgs, PredictArgs};
use crate::error::AppError;

pub mod pipeline;

/// A run's configuration as understood by the handlers.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateConfig {
    pub model_dir: PathBuf,
    pub json: bool,
    pub export: Option<PathBuf>,
}

/// Entry point for the `cylcost` binary.
pub fn run() -> Result<(), AppError> {
    crate::logging::init();

    let cli = crate::cli::Cli::parse();
    let model_dir = resolve_model_dir(cli.model_dir);

    match cli.command {
        Command::Predict(args) => handle_predict(&estimate_config_from_args(&args, model_dir), args),
        Command::Batch(args) => handle_batch(&model_dir, args),
        Command::Codes => {
            print!("{}", crate::report::format_codes());
            Ok(())
        }
        Command::Inspect(args) => handle_inspect(&model_dir, args),
    }
}

fn handle_predict(config: &EstimateConfig, args: PredictArgs) -> Result<(), AppError> {
    let code = match args.code {
        Some(code) => code,
        None => {
            let available = crate::cli::picker::discover_artifacts(&config.model_dir);
            crate::cli::picker::prompt_for_code(&available)?
        }
    };

    let inputs = args.inputs.to_raw_inputs();
    let estimator = pipeline::estimator_for_dir(&config.model_dir);
    let result = pipeline::run_predict(&estimator, code, &inputs)?;
    let report = crate::io::export::PredictionReport::new(&inputs, &result);

    if config.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        print!("{}", crate::report::format_prediction(&result));
    }

    if let Some(path) = &config.export {
        crate::io::export::write_report_json(path, &report)?;
    }

    Ok(())
}

fn handle_batch(model_dir: &std::path::Path, args: BatchArgs) -> Result<(), AppError> {
    let input = crate::cli::picker::validate_csv_path(&args.input)?;
    let file = File::open(&input)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", input.display())))?;
    let requests = crate::io::batch::read_batch_requests(file)?;

    let estimator = pipeline::estimator_for_dir(model_dir);
    let outcomes = pipeline::run_batch(&estimator, &requests);

    match &args.output {
        Some(path) => {
            let out = File::create(path).map_err(|e| {
                AppError::new(2, format!("Failed to create output CSV '{}': {e}", path.display()))
            })?;
            crate::io::batch::write_batch_results(out, &outcomes)?;
        }
        None => crate::io::batch::write_batch_results(std::io::stdout().lock(), &outcomes)?,
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        eprintln!("{failed} of {} row(s) failed; see the error column.", outcomes.len());
    }
    Ok(())
}

fn handle_inspect(model_dir: &std::path::Path, args: InspectArgs) -> Result<(), AppError> {
    let estimator = pipeline::estimator_for_dir(model_dir);
    let registry = estimator.registry();
    let artifact = registry.get(args.code)?;

    print!(
        "{}",
        crate::report::format_inspection(&artifact, &registry.location(args.code))
    );
    Ok(())
}

pub fn estimate_config_from_args(args: &PredictArgs, model_dir: PathBuf) -> EstimateConfig {
    EstimateConfig {
        model_dir,
        json: args.json,
        export: args.export.clone(),
    }
}

/// Resolve where model artifacts live.
///
/// Order: explicit `--model-dir`, then the directory holding the executable,
/// then the current directory.
pub fn resolve_model_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}
