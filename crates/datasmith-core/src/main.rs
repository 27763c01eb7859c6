//! CLI entry point for dataset cleaning and profiling.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use datasmith_core::{
    Cleaner, CleaningConfig, CleaningOutcome, DataProfiler, infer_column_types, io,
};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean and profile tabular datasets",
    long_about = "Automated cleaning and exploratory profiling for CSV and spreadsheet datasets.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  DATASMITH_STORAGE_ROOT    Root directory for cleaned data and reports\n  \
                  RUST_LOG                  Overrides --log-level\n\n\
                  EXAMPLES:\n  \
                  datasmith clean data.csv\n  \
                  datasmith profile data.csv --json | jq .overview\n  \
                  datasmith infer data.csv"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Root directory for cleaned datasets and reports
    #[arg(long, env = "DATASMITH_STORAGE_ROOT", default_value = "storage", global = true)]
    storage_root: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON to stdout instead of a human-readable summary
    ///
    /// Disables all logging so stdout only carries JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Multiplier for the IQR outlier fence
    #[arg(long, default_value = "1.5", global = true)]
    iqr_multiplier: f64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill missing values and remove outliers, then save the result
    Clean {
        /// Path to the CSV or spreadsheet file to clean
        input: PathBuf,
    },
    /// Print the profile of a dataset as JSON
    Profile {
        /// Path to the CSV or spreadsheet file to profile
        input: PathBuf,
    },
    /// Show the inferred semantic type of every column
    Infer {
        /// Path to the CSV or spreadsheet file to inspect
        input: PathBuf,
    },
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
    // .env first so clap can see DATASMITH_STORAGE_ROOT
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = CleaningConfig::builder()
        .iqr_multiplier(args.iqr_multiplier)
        .storage_root(args.storage_root.clone())
        .build()
        .context("Invalid configuration")?;

    match &args.command {
        Command::Clean { input } => run_clean(input, config, args.json),
        Command::Profile { input } => run_profile(input, config),
        Command::Infer { input } => run_infer(input, &config, args.json),
    }
}

fn run_clean(input: &Path, config: CleaningConfig, json: bool) -> Result<()> {
    let raw = io::load_table(input)?;
    let storage = config.storage.clone();
    let outcome = Cleaner::new(config).clean(&raw)?;

    let csv_path = io::save_cleaned(&outcome.dataset, &storage)?;
    let report_path = io::write_report(outcome.dataset.id(), &outcome.report, &storage)?;
    info!("Cleaning finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.summary())?);
    } else {
        print_clean_summary(&outcome, &csv_path, &report_path);
    }
    Ok(())
}

fn run_profile(input: &Path, config: CleaningConfig) -> Result<()> {
    let dataset = io::load_table(input)?;
    let profile = DataProfiler::new(config).profile(&dataset)?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

fn run_infer(input: &Path, config: &CleaningConfig, json: bool) -> Result<()> {
    let dataset = io::load_table(input)?;
    let types = infer_column_types(dataset.frame(), config)?;

    if json {
        let map: serde_json::Map<String, serde_json::Value> = types
            .iter()
            .map(|(name, semantic)| (name.clone(), semantic.as_str().into()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    println!("{:<30} {:<12} {:<12}", "COLUMN", "STORAGE", "SEMANTIC");
    println!("{}", "-".repeat(56));
    for (name, semantic) in &types {
        let dtype = dataset
            .frame()
            .column(name)
            .map(|c| format!("{:?}", c.dtype()))
            .unwrap_or_default();
        println!("{:<30} {:<12} {:<12}", name, dtype, semantic);
    }
    Ok(())
}

/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn print_clean_summary(outcome: &CleaningOutcome, csv_path: &Path, report_path: &Path) {
    println!("\n{}", "=".repeat(60));
    println!("CLEANING SUMMARY");
    println!("{}", "=".repeat(60));
    println!("  Cleaned dataset: {}", outcome.dataset.id());
    println!("  Rows: {} -> {}", outcome.rows_before, outcome.rows_after);
    println!("  Values filled: {}", outcome.report.total_filled());
    println!("  Duration: {}ms", outcome.duration_ms);
    println!();

    if !outcome.report.missing_values_filled.is_empty() {
        println!("MISSING VALUES FILLED");
        println!("{}", "-".repeat(40));
        for (column, filled) in &outcome.report.missing_values_filled {
            println!("  {:<30} {}", column, filled.filled_values);
        }
        println!();
    }

    if !outcome.report.outliers_removed.is_empty() {
        println!("OUTLIER ROWS REMOVED");
        println!("{}", "-".repeat(40));
        for (column, removed) in &outcome.report.outliers_removed {
            println!("  {:<30} {}", column, removed);
        }
        println!();
    }

    println!("  Data:   {}", csv_path.display());
    println!("  Report: {}", report_path.display());
}
