//! CLI entry point for the listing cleaning pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use listing_cleaner::{
    CleaningConfig, CleaningReport, CleaningResult, Pipeline, ReportGenerator, loader,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Real-estate listing cleaning pipeline",
    long_about = "Cleans a table of real-estate listings: drops duplicates and irrelevant \
                  columns, removes rows without a price and imputes missing values.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  RUST_LOG    Overrides --log-level\n\n\
                  EXAMPLES:\n  \
                  # Clean with the standard stages and print remaining missing values\n  \
                  listing-cleaner -i datasets/Kangaroo.csv\n\n  \
                  # Also derive room counts and encode strings and booleans\n  \
                  listing-cleaner -i datasets/Kangaroo.csv --encode -o cleaned.csv\n\n  \
                  # Custom stage list\n  \
                  listing-cleaner -i datasets/Kangaroo.csv -c stages.json --json"
)]
struct Args {
    /// Path to the CSV or Parquet file to clean
    #[arg(short, long)]
    input: PathBuf,

    /// Write the cleaned table to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with the stage list
    ///
    /// If not specified, the built-in real-estate stages are used
    #[arg(short, long, conflicts_with = "encode")]
    config: Option<PathBuf>,

    /// Append room-count derivation, string normalization and boolean encoding
    #[arg(long)]
    encode: bool,

    /// Write a JSON run report to this directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the run summary as JSON to stdout
    ///
    /// Disables all logs; only the JSON is written.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let config = match (&args.config, args.encode) {
        (Some(path), _) => CleaningConfig::from_json_file(path)?,
        (None, true) => CleaningConfig::real_estate_encoded(),
        (None, false) => CleaningConfig::real_estate(),
    };
    info!("Stages: {}", config.stage_names().join(" -> "));

    let pipeline = Pipeline::from_config(&config)?;
    let listings = loader::load_table(&args.input)?;

    let result = match pipeline.process(&listings) {
        Ok(result) => result,
        Err(e) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            }
            let stage = e.failed_stage().unwrap_or("<none>").to_string();
            error!("Pipeline failed in stage '{}': {}", stage, e.root());
            return Err(anyhow!("Cleaning failed in stage '{}': {}", stage, e.root()));
        }
    };

    if let Some(ref output) = args.output {
        loader::write_csv(&result.table, output)?;
    }

    let report = CleaningReport::new(&args.input, args.output.as_deref(), result.summary.clone());

    if let Some(ref dir) = args.report_dir {
        let report_path = ReportGenerator::new(dir).write_report(&report, &file_stem(&args.input))?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_human_readable_summary(&result, &args);
    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Print the run summary and the per-column missing-value counts.
///
/// Uses `println!` rather than logging: this is the command's output and is
/// shown regardless of log level.
fn print_human_readable_summary(result: &CleaningResult, args: &Args) {
    let summary = &result.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        args.input.display(),
        summary.rows_before,
        summary.columns_before
    );
    if let Some(ref output) = args.output {
        println!(
            "Output: {} ({} rows x {} columns)",
            output.display(),
            summary.rows_after,
            summary.columns_after
        );
    }
    println!();

    println!("Stages:");
    for stage in &summary.stages {
        println!(
            "  {:<26} {:>8} -> {:<8} rows  {:>4} -> {:<4} columns",
            stage.name, stage.rows_before, stage.rows_after, stage.columns_before, stage.columns_after
        );
    }
    println!(
        "  Duration: {}ms, {} rows removed ({:.1}%)",
        summary.duration_ms,
        summary.rows_removed(),
        summary.rows_removed_percentage()
    );
    println!();

    println!("Missing values per column:");
    print!("{}", summary.missing_after);
    println!("{}", "=".repeat(80));
}
