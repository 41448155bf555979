use std::path::PathBuf;

use clap::Parser;
use sku_dupe_finder::run::{RunOptions, run_analysis};
use sku_dupe_finder::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;

    let options = RunOptions {
        recursive: cli.recursive,
        sku_columns: cli.sku_columns,
        sku_col_patterns: cli.sku_col_patterns,
        include_within_workbook: cli.include_within_workbook_dupes,
    };

    let analysis = run_analysis(&cli.inputs, &options, &cli.out)?;

    println!("Wrote report to: {}", cli.out.display());
    if !analysis.read_errors.is_empty() {
        println!("Some files had issues:");
        for error in &analysis.read_errors {
            println!(" - {}: {}", error.workbook, error.reason);
        }
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Find SKUs that appear in more than one Excel workbook."
)]
struct Cli {
    /// One or more paths to .xlsx files or directories to scan.
    #[arg(long, num_args = 1.., required = true)]
    inputs: Vec<PathBuf>,

    /// Recurse into subfolders when an input is a directory.
    #[arg(long)]
    recursive: bool,

    /// Explicit column names to treat as SKU columns (case-insensitive, exact match).
    #[arg(long, num_args = 1..)]
    sku_columns: Option<Vec<String>>,

    /// Regex patterns to detect SKU columns (override the defaults).
    #[arg(long, num_args = 1..)]
    sku_col_patterns: Option<Vec<String>>,

    /// Path to write the Excel report.
    #[arg(long, default_value = "sku_crossworkbook_duplicates.xlsx")]
    out: PathBuf,

    /// Also include duplicates within the same workbook (by default only
    /// cross-workbook duplicates are reported).
    #[arg(long)]
    include_within_workbook_dupes: bool,
}
