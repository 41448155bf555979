use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::model::{Analysis, Record};

pub const SUMMARY_SHEET: &str = "Summary";
pub const COUNTS_SHEET: &str = "Counts_by_File";
pub const PRESENCE_SHEET: &str = "Presence_by_File";
pub const DETAILS_SHEET: &str = "Details";
pub const DETECTED_COLUMNS_SHEET: &str = "Detected_Columns";
pub const READ_ISSUES_SHEET: &str = "Read_Issues";

const NO_DATA_MESSAGE: &str = "No SKU-like data found in the provided files.";

/// The reportable subset of an analysis: qualifying SKUs plus their detail
/// records in final output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateReport {
    pub skus: BTreeSet<String>,
    pub details: Vec<Record>,
}

/// Derives the qualifying SKU set and sorted detail rows.
///
/// Default policy: a SKU qualifies iff it occurs in more than one workbook.
/// With `include_within_workbook` set, every detected SKU qualifies. Note the
/// widened mode does not compute per-workbook multiplicity at all, so a SKU
/// occurring once in a single workbook is reported too; that matches the
/// long-standing observable behaviour and is pinned by a test rather than
/// silently changed.
pub fn select_duplicates(analysis: &Analysis, include_within_workbook: bool) -> DuplicateReport {
    let skus: BTreeSet<String> = analysis
        .presence
        .skus()
        .filter(|sku| include_within_workbook || analysis.presence.workbook_count(sku) > 1)
        .map(str::to_string)
        .collect();

    let mut details: Vec<Record> = analysis
        .records
        .iter()
        .filter(|record| skus.contains(&record.sku))
        .cloned()
        .collect();
    details.sort_by(detail_order);

    DuplicateReport { skus, details }
}

fn detail_order(lhs: &Record, rhs: &Record) -> Ordering {
    lhs.sku
        .cmp(&rhs.sku)
        .then_with(|| lhs.workbook.cmp(&rhs.workbook))
        .then_with(|| lhs.sheet.cmp(&rhs.sheet))
        .then_with(|| row_sort_key(lhs.row).cmp(&row_sort_key(rhs.row)))
}

/// Absent row numbers order after every concrete one.
fn row_sort_key(row: Option<u32>) -> (bool, u32) {
    (row.is_none(), row.unwrap_or(0))
}

/// A typed cell so the Excel writer can emit native numbers and booleans.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

/// A table that will be materialised as one worksheet of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Renders the analysis into the report's sheet-shaped views.
///
/// With no records at all the result is a lone `Summary` message (plus
/// `Read_Issues` when reads failed). Otherwise: dense per-workbook counts and
/// boolean presence for the qualifying SKUs (rows SKU-ascending, workbook
/// columns name-ascending), the sorted detail rows, the detected columns per
/// scanned table, and any read issues.
pub fn build_report(analysis: &Analysis, report: &DuplicateReport) -> Vec<ReportSheet> {
    if analysis.is_empty() {
        let mut sheets = vec![ReportSheet {
            name: SUMMARY_SHEET.to_string(),
            columns: vec!["Message".to_string()],
            rows: vec![vec![CellValue::Text(NO_DATA_MESSAGE.to_string())]],
        }];
        if !analysis.read_errors.is_empty() {
            sheets.push(read_issues_sheet(analysis));
        }
        return sheets;
    }

    let workbooks = analysis.presence.workbooks();
    let mut sheets = vec![
        counts_sheet(analysis, report, &workbooks),
        presence_sheet(analysis, report, &workbooks),
        details_sheet(report),
        detected_columns_sheet(analysis),
    ];
    if !analysis.read_errors.is_empty() {
        sheets.push(read_issues_sheet(analysis));
    }
    sheets
}

fn counts_sheet(analysis: &Analysis, report: &DuplicateReport, workbooks: &[String]) -> ReportSheet {
    let mut columns = vec!["SKU".to_string()];
    columns.extend(workbooks.iter().cloned());

    let rows = report
        .skus
        .iter()
        .map(|sku| {
            let mut row = vec![CellValue::Text(sku.clone())];
            row.extend(
                workbooks
                    .iter()
                    .map(|workbook| CellValue::Number(analysis.presence.count(sku, workbook) as f64)),
            );
            row
        })
        .collect();

    ReportSheet {
        name: COUNTS_SHEET.to_string(),
        columns,
        rows,
    }
}

fn presence_sheet(
    analysis: &Analysis,
    report: &DuplicateReport,
    workbooks: &[String],
) -> ReportSheet {
    let mut columns = vec!["SKU".to_string()];
    columns.extend(workbooks.iter().cloned());
    columns.push("WorkbooksCount".to_string());

    let rows = report
        .skus
        .iter()
        .map(|sku| {
            let mut row = vec![CellValue::Text(sku.clone())];
            row.extend(
                workbooks
                    .iter()
                    .map(|workbook| CellValue::Bool(analysis.presence.count(sku, workbook) > 0)),
            );
            row.push(CellValue::Number(
                analysis.presence.workbook_count(sku) as f64,
            ));
            row
        })
        .collect();

    ReportSheet {
        name: PRESENCE_SHEET.to_string(),
        columns,
        rows,
    }
}

fn details_sheet(report: &DuplicateReport) -> ReportSheet {
    let rows = report
        .details
        .iter()
        .map(|record| {
            vec![
                CellValue::Text(record.sku.clone()),
                CellValue::Text(record.workbook.clone()),
                CellValue::Text(record.sheet.clone()),
                CellValue::Text(record.column.clone()),
                record
                    .row
                    .map(|row| CellValue::Number(row as f64))
                    .unwrap_or(CellValue::Empty),
            ]
        })
        .collect();

    ReportSheet {
        name: DETAILS_SHEET.to_string(),
        columns: ["SKU", "File", "Sheet", "Column", "RowNumber"]
            .iter()
            .map(|name| name.to_string())
            .collect(),
        rows,
    }
}

fn detected_columns_sheet(analysis: &Analysis) -> ReportSheet {
    let rows = analysis
        .detected
        .iter()
        .map(|entry| {
            vec![
                CellValue::Text(entry.workbook.clone()),
                CellValue::Text(entry.sheet.clone()),
                CellValue::Text(entry.columns.join(", ")),
            ]
        })
        .collect();

    ReportSheet {
        name: DETECTED_COLUMNS_SHEET.to_string(),
        columns: ["File", "Sheet", "Detected_SKU_Columns"]
            .iter()
            .map(|name| name.to_string())
            .collect(),
        rows,
    }
}

fn read_issues_sheet(analysis: &Analysis) -> ReportSheet {
    let rows = analysis
        .read_errors
        .iter()
        .map(|error| {
            vec![
                CellValue::Text(error.workbook.clone()),
                CellValue::Text(error.reason.clone()),
            ]
        })
        .collect();

    ReportSheet {
        name: READ_ISSUES_SHEET.to_string(),
        columns: vec!["File".to_string(), "Issue".to_string()],
        rows,
    }
}
