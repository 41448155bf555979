use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use crate::detect::{compile_patterns, detect_sku_columns};
use crate::error::Result;
use crate::io::excel_read;
use crate::model::{Analysis, DetectedColumns, PresenceMatrix, ReadError, Record, Table};
use crate::normalize::normalize_sku;

/// Spreadsheet row number of the first data row (row 1 is the header).
const FIRST_DATA_ROW: u32 = 2;

/// The column-detection mode for a run: explicit names, custom patterns, or
/// neither (built-in defaults). Compiled once so pattern errors surface
/// before any file is touched.
#[derive(Debug)]
pub struct ColumnSelection {
    explicit: Option<Vec<String>>,
    patterns: Option<Vec<Regex>>,
}

impl ColumnSelection {
    pub fn new(explicit: Option<Vec<String>>, patterns: Option<Vec<String>>) -> Result<Self> {
        let patterns = match patterns.filter(|list| !list.is_empty()) {
            Some(list) => Some(compile_patterns(&list)?),
            None => None,
        };
        Ok(Self {
            explicit: explicit.filter(|list| !list.is_empty()),
            patterns,
        })
    }

    fn detect(&self, columns: &[String], rows: &[Vec<String>]) -> Vec<String> {
        detect_sku_columns(
            columns,
            self.explicit.as_deref(),
            self.patterns.as_deref(),
            rows,
        )
    }
}

/// Scans workbook files in input order. Each unreadable workbook becomes a
/// [`ReadError`] entry and the scan moves on; one corrupt file never aborts
/// the batch.
pub fn analyze_files(files: &[PathBuf], selection: &ColumnSelection) -> Analysis {
    let mut scan = Scan::default();
    for path in files {
        let workbook = workbook_display_name(path);
        match excel_read::read_workbook(path, &workbook) {
            Ok(tables) => {
                for table in &tables {
                    scan.table(table, selection);
                }
            }
            Err(error) => {
                warn!(workbook = %workbook, %error, "workbook could not be read");
                scan.read_errors.push(ReadError {
                    workbook,
                    reason: format!("Failed to read: {error}"),
                });
            }
        }
    }
    scan.finish()
}

/// Pure variant over already-materialised tables; the file-reading path and
/// the tests share the same accumulation logic through it.
pub fn aggregate<I>(tables: I, selection: &ColumnSelection) -> Analysis
where
    I: IntoIterator<Item = Table>,
{
    let mut scan = Scan::default();
    for table in tables {
        scan.table(&table, selection);
    }
    scan.finish()
}

/// Name a workbook is reported under: its file basename.
pub fn workbook_display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Mutable accumulator threaded through one scan; consumed by [`Scan::finish`]
/// so partial state never escapes.
#[derive(Default)]
struct Scan {
    records: Vec<Record>,
    detected: Vec<DetectedColumns>,
    read_errors: Vec<ReadError>,
}

impl Scan {
    fn table(&mut self, table: &Table, selection: &ColumnSelection) {
        if table.rows.is_empty() {
            return;
        }

        let columns: Vec<String> = table
            .columns
            .iter()
            .map(|name| name.trim().to_string())
            .collect();
        let detected = selection.detect(&columns, &table.rows);
        if detected.is_empty() {
            debug!(
                workbook = %table.workbook,
                sheet = %table.sheet,
                "no SKU columns detected, sheet skipped"
            );
            return;
        }

        for column in &detected {
            let Some(column_index) = columns.iter().position(|name| name == column) else {
                continue;
            };
            for (row_index, row) in table.rows.iter().enumerate() {
                let cell = row.get(column_index).map(String::as_str).unwrap_or("");
                if let Some(sku) = normalize_sku(cell) {
                    self.records.push(Record {
                        sku,
                        workbook: table.workbook.clone(),
                        sheet: table.sheet.clone(),
                        column: column.clone(),
                        row: u32::try_from(row_index)
                            .ok()
                            .map(|ordinal| ordinal + FIRST_DATA_ROW),
                    });
                }
            }
        }

        self.detected.push(DetectedColumns {
            workbook: table.workbook.clone(),
            sheet: table.sheet.clone(),
            columns: detected,
        });
    }

    fn finish(self) -> Analysis {
        let presence = PresenceMatrix::from_records(&self.records);
        Analysis {
            records: self.records,
            presence,
            detected: self.detected,
            read_errors: self.read_errors,
        }
    }
}
