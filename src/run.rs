use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::aggregate::{self, ColumnSelection};
use crate::error::{Result, ToolError};
use crate::io::{discover, excel_write};
use crate::model::Analysis;
use crate::report;

/// Knobs for one analysis run, mirroring the CLI flags.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Recurse into subdirectories of directory inputs.
    pub recursive: bool,
    /// Explicit SKU column names; disables pattern detection when set.
    pub sku_columns: Option<Vec<String>>,
    /// Custom detection patterns replacing the built-in defaults.
    pub sku_col_patterns: Option<Vec<String>>,
    /// Widen the report from cross-workbook duplicates to all detected SKUs.
    pub include_within_workbook: bool,
}

/// Runs the whole pipeline: discover inputs, scan them, select the
/// reportable SKUs, and write the report workbook.
///
/// Fails hard only when no eligible input file exists, a detection pattern is
/// invalid, or the report cannot be written; unreadable workbooks merely end
/// up on the report's `Read_Issues` sheet. The returned [`Analysis`] lets the
/// caller surface those issues.
#[instrument(level = "info", skip_all, fields(output = %output.display()))]
pub fn run_analysis(inputs: &[PathBuf], options: &RunOptions, output: &Path) -> Result<Analysis> {
    let files = discover::find_excel_files(inputs, options.recursive);
    if files.is_empty() {
        return Err(ToolError::NoInputFiles);
    }
    info!(file_count = files.len(), "discovered input workbooks");

    let selection = ColumnSelection::new(
        options.sku_columns.clone(),
        options.sku_col_patterns.clone(),
    )?;
    let analysis = aggregate::analyze_files(&files, &selection);
    info!(
        record_count = analysis.records.len(),
        read_error_count = analysis.read_errors.len(),
        "scan complete"
    );

    let duplicates = report::select_duplicates(&analysis, options.include_within_workbook);
    let sheets = report::build_report(&analysis, &duplicates);
    debug!(
        duplicate_count = duplicates.skus.len(),
        sheet_count = sheets.len(),
        "report constructed"
    );

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    excel_write::write_report(output, &sheets)?;
    Ok(analysis)
}
